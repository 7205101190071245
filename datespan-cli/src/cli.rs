use clap::Parser;
use std::ffi::OsString;

/// Prints the earliest and latest date mentioned in a text as JSON.
///
/// There are no flags: whatever single argument is given is the text, even
/// when it starts with `-`.
#[derive(Parser, Debug)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Text to scan for dates (e.g. `datespan "明日から8月31日まで"`).
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    pub text: Vec<String>,
}

impl Cli {
    /// The text argument, or `None` unless the command line holds exactly one
    /// valid UTF-8 argument after the program name.
    ///
    /// Arguments are counted as given, so a lone `--` is text and
    /// `-- x` is two arguments.
    pub fn text_from<I, T>(args: I) -> Option<String>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let [program, text]: [OsString; 2] = args.try_into().ok()?;
        let cli = Cli::try_parse_from([program, OsString::from("--"), text]).ok()?;
        let [text]: [String; 1] = cli.text.try_into().ok()?;
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_argument() {
        assert_eq!(
            Cli::text_from(["datespan", "tomorrow"]),
            Some("tomorrow".to_string())
        );
    }

    #[test]
    fn zero_or_many_arguments() {
        assert_eq!(Cli::text_from(["datespan"]), None);
        assert_eq!(Cli::text_from(["datespan", "a", "b"]), None);
    }

    #[test]
    fn hyphenated_text_is_not_a_flag() {
        assert_eq!(
            Cli::text_from(["datespan", "-3 days"]),
            Some("-3 days".to_string())
        );
        assert_eq!(Cli::text_from(["datespan", "--help"]), Some("--help".to_string()));
    }

    #[test]
    fn double_dash_is_counted_like_any_other_argument() {
        assert_eq!(Cli::text_from(["datespan", "--", "2025-08-01"]), None);
        assert_eq!(Cli::text_from(["datespan", "--"]), Some("--".to_string()));
        assert_eq!(
            Cli::text_from(["datespan", "-- 2025-08-01"]),
            Some("-- 2025-08-01".to_string())
        );
    }

    #[test]
    fn empty_text_is_still_one_argument() {
        assert_eq!(Cli::text_from(["datespan", ""]), Some(String::new()));
    }
}
