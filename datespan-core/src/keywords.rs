use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Canonical temporal words. The `AsRef<str>` form is the English word users write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Keyword {
    At,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Today,
    Yesterday,
    Tomorrow,
    #[strum(serialize = "day before yesterday")]
    DayBeforeYesterday,
    #[strum(serialize = "day after tomorrow")]
    DayAfterTomorrow,
    Morning,
    Noon,
    Evening,
    Night,
    Midnight,
    #[strum(serialize = "last week")]
    LastWeek,
    #[strum(serialize = "last month")]
    LastMonth,
    #[strum(serialize = "last year")]
    LastYear,
    #[strum(serialize = "this week")]
    ThisWeek,
    #[strum(serialize = "this month")]
    ThisMonth,
    #[strum(serialize = "this year")]
    ThisYear,
    #[strum(serialize = "next week")]
    NextWeek,
    #[strum(serialize = "next month")]
    NextMonth,
    #[strum(serialize = "next year")]
    NextYear,
    #[strum(serialize = "every day")]
    EveryDay,
    #[strum(serialize = "every week")]
    EveryWeek,
    #[strum(serialize = "every month")]
    EveryMonth,
    #[strum(serialize = "every year")]
    EveryYear,
}

/// What a keyword denotes once found in running text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordClass {
    /// A day at a fixed offset from the reference date.
    DayOffset(i64),
    Weekday(chrono::Weekday),
    /// A time of day, given as (hour, minute).
    TimeOfDay(u32, u32),
    /// A week, month or year without a single anchored day.
    Period,
    Recurrence,
    Connective,
}

impl Keyword {
    pub fn class(self) -> KeywordClass {
        use chrono::Weekday::*;
        match self {
            Keyword::At => KeywordClass::Connective,
            Keyword::Monday => KeywordClass::Weekday(Mon),
            Keyword::Tuesday => KeywordClass::Weekday(Tue),
            Keyword::Wednesday => KeywordClass::Weekday(Wed),
            Keyword::Thursday => KeywordClass::Weekday(Thu),
            Keyword::Friday => KeywordClass::Weekday(Fri),
            Keyword::Saturday => KeywordClass::Weekday(Sat),
            Keyword::Sunday => KeywordClass::Weekday(Sun),
            Keyword::Today => KeywordClass::DayOffset(0),
            Keyword::Yesterday => KeywordClass::DayOffset(-1),
            Keyword::Tomorrow => KeywordClass::DayOffset(1),
            Keyword::DayBeforeYesterday => KeywordClass::DayOffset(-2),
            Keyword::DayAfterTomorrow => KeywordClass::DayOffset(2),
            Keyword::Morning => KeywordClass::TimeOfDay(8, 0),
            Keyword::Noon => KeywordClass::TimeOfDay(12, 0),
            Keyword::Evening => KeywordClass::TimeOfDay(18, 0),
            Keyword::Night => KeywordClass::TimeOfDay(21, 0),
            Keyword::Midnight => KeywordClass::TimeOfDay(0, 0),
            Keyword::LastWeek
            | Keyword::LastMonth
            | Keyword::LastYear
            | Keyword::ThisWeek
            | Keyword::ThisMonth
            | Keyword::ThisYear
            | Keyword::NextWeek
            | Keyword::NextMonth
            | Keyword::NextYear => KeywordClass::Period,
            Keyword::EveryDay | Keyword::EveryWeek | Keyword::EveryMonth | Keyword::EveryYear => {
                KeywordClass::Recurrence
            }
        }
    }
}

/// Japanese words seeded next to the English canonical ones.
const JAPANESE_ALIASES: &[(&str, Keyword)] = &[
    ("月曜日", Keyword::Monday),
    ("月曜", Keyword::Monday),
    ("火曜日", Keyword::Tuesday),
    ("火曜", Keyword::Tuesday),
    ("水曜日", Keyword::Wednesday),
    ("水曜", Keyword::Wednesday),
    ("木曜日", Keyword::Thursday),
    ("木曜", Keyword::Thursday),
    ("金曜日", Keyword::Friday),
    ("金曜", Keyword::Friday),
    ("土曜日", Keyword::Saturday),
    ("土曜", Keyword::Saturday),
    ("日曜日", Keyword::Sunday),
    ("日曜", Keyword::Sunday),
    ("今日", Keyword::Today),
    ("本日", Keyword::Today),
    ("昨日", Keyword::Yesterday),
    ("明日", Keyword::Tomorrow),
    ("一昨日", Keyword::DayBeforeYesterday),
    ("おととい", Keyword::DayBeforeYesterday),
    ("明後日", Keyword::DayAfterTomorrow),
    ("あさって", Keyword::DayAfterTomorrow),
    ("正午", Keyword::Noon),
    ("夕方", Keyword::Evening),
    ("真夜中", Keyword::Midnight),
    ("先週", Keyword::LastWeek),
    ("先月", Keyword::LastMonth),
    ("去年", Keyword::LastYear),
    ("昨年", Keyword::LastYear),
    ("今週", Keyword::ThisWeek),
    ("今月", Keyword::ThisMonth),
    ("今年", Keyword::ThisYear),
    ("来週", Keyword::NextWeek),
    ("来月", Keyword::NextMonth),
    ("来年", Keyword::NextYear),
    ("毎日", Keyword::EveryDay),
    ("毎週", Keyword::EveryWeek),
    ("毎月", Keyword::EveryMonth),
    ("毎年", Keyword::EveryYear),
];

const ENGLISH_ALIASES: &[(&str, Keyword)] = &[
    ("daily", Keyword::EveryDay),
    ("weekly", Keyword::EveryWeek),
    ("monthly", Keyword::EveryMonth),
    ("yearly", Keyword::EveryYear),
    ("tonight", Keyword::Night),
];

pub struct Keywords;

impl Keywords {
    /// Returns the **global keyword registry** (input → canonical).
    ///
    /// The registry is:
    /// - **Initialized once** on first access (via [`once_cell::sync::Lazy`]).
    /// - **Thread-safe** (wrapped in [`RwLock`]): many readers or one writer.
    /// - **Lowercased**: all keys are stored lowercased for case-insensitive lookups.
    ///
    /// Seeded with every canonical English word, a few English aliases
    /// (`daily`, `tonight`, ...) and the Japanese words in `JAPANESE_ALIASES`.
    fn registry() -> &'static RwLock<HashMap<String, Keyword>> {
        static REGISTRY: Lazy<RwLock<HashMap<String, Keyword>>> = Lazy::new(|| {
            let mut m: HashMap<String, Keyword> = Keyword::iter()
                .map(|key| (key.as_ref().to_string(), key))
                .collect();
            for (alias, key) in ENGLISH_ALIASES.iter().chain(JAPANESE_ALIASES) {
                m.insert(alias.to_string(), *key);
            }
            RwLock::new(m)
        });
        &REGISTRY
    }

    /// Extends the global registry with user-defined **synonyms**.
    ///
    /// Each pair is `(alias, target)`. The `target` must already be known to the
    /// registry (a canonical word or an existing alias); unknown targets are
    /// ignored silently. Keys are lowercased to keep lookups case-insensitive.
    ///
    /// Typical call site is `Config::load()`, after reading `[synonyms]`:
    ///
    /// ```toml
    /// [synonyms]
    /// tmrw = "tomorrow"
    /// ayer = "yesterday"
    /// ```
    pub fn extend(synonyms: &[(String, String)]) {
        let mut reg = Self::registry()
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for (alias, target) in synonyms {
            if let Some(&canonical) = reg.get(&target.to_lowercase()) {
                reg.insert(alias.to_lowercase(), canonical);
            }
        }
    }

    /// Returns `true` if `word` is a canonical word (eg "today").
    pub fn is_canonical(word: &str) -> bool {
        let word = word.to_lowercase();
        Keyword::iter().any(|key| key.as_ref() == word)
    }

    /// Returns `true` if `input` equals (case-insensitively) the given **canonical keyword**
    /// or any of its registered synonyms.
    ///
    /// ```
    /// # use datespan_core::keywords::{Keyword, Keywords};
    /// assert!(Keywords::matches(Keyword::Yesterday, "YESTERDAY"));
    /// assert!(Keywords::matches(Keyword::Yesterday, "昨日"));
    /// assert!(!Keywords::matches(Keyword::Yesterday, "today"));
    /// ```
    pub fn matches(keyword: Keyword, input: &str) -> bool {
        Self::lookup(input).is_some_and(|canon| canon == keyword)
    }

    /// Canonical keyword registered for `input`, if any.
    pub fn lookup(input: &str) -> Option<Keyword> {
        let reg = Self::registry()
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        reg.get(input.trim().to_lowercase().as_str()).copied()
    }

    /// Builds one alternation matching every registered word.
    ///
    /// Longer words come first so `一昨日` wins over `昨日` and `月曜日` over `月曜`.
    /// ASCII words are bounded by `\b`; Japanese words are not, since
    /// CJK text has no spaces between words.
    pub fn pattern() -> Result<Regex, regex::Error> {
        let mut words: Vec<String> = {
            let reg = Self::registry()
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            reg.keys()
                .filter(|w| Self::lookup_class(&reg, w) != Some(KeywordClass::Connective))
                .cloned()
                .collect()
        };
        words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        let alternatives: Vec<String> = words
            .iter()
            .map(|w| {
                let escaped = regex::escape(w).replace(' ', r"\s+");
                if w.is_ascii() {
                    format!(r"\b{escaped}\b")
                } else {
                    escaped
                }
            })
            .collect();
        Regex::new(&format!("(?i)(?:{})", alternatives.join("|")))
    }

    fn lookup_class(reg: &HashMap<String, Keyword>, word: &str) -> Option<KeywordClass> {
        reg.get(word).map(|k| k.class())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constants() {
        assert!(Keywords::matches(Keyword::Today, "today"));
        assert!(Keywords::matches(Keyword::Yesterday, "yesterday"));
        assert!(Keywords::matches(Keyword::LastWeek, "last week"));
        assert!(Keywords::matches(Keyword::DayAfterTomorrow, "明後日"));
        assert!(Keywords::matches(Keyword::Friday, "金曜日"));
    }

    #[test]
    fn synonyms_extend() {
        Keywords::extend(&[
            ("ytd".into(), "yesterday".into()),
            ("ayer".into(), "yesterday".into()),
            ("tmrw".into(), "tomorrow".into()),
        ]);
        assert!(Keywords::matches(Keyword::Yesterday, "ytd"));
        assert!(Keywords::matches(Keyword::Yesterday, "AYER"));
        assert!(Keywords::matches(Keyword::Tomorrow, "tmrw"));
    }

    #[test]
    fn synonyms_with_unknown_target_are_ignored() {
        Keywords::extend(&[("someday".into(), "not a keyword".into())]);
        assert_eq!(Keywords::lookup("someday"), None);
    }

    #[test]
    fn unknown_word_in_matches_returns_false() {
        assert!(!Keywords::matches(Keyword::Tomorrow, "not in registry"));
    }

    #[test]
    fn canonical_words_are_recognized() {
        assert!(Keywords::is_canonical("today"));
        assert!(Keywords::is_canonical("Last Week"));
        assert!(!Keywords::is_canonical("ytd"));
    }

    #[test]
    fn classes() {
        assert_eq!(Keyword::Tomorrow.class(), KeywordClass::DayOffset(1));
        assert_eq!(
            Keyword::Friday.class(),
            KeywordClass::Weekday(chrono::Weekday::Fri)
        );
        assert_eq!(Keyword::Noon.class(), KeywordClass::TimeOfDay(12, 0));
        assert_eq!(Keyword::ThisMonth.class(), KeywordClass::Period);
        assert_eq!(Keyword::EveryDay.class(), KeywordClass::Recurrence);
    }

    #[test]
    fn pattern_prefers_longer_words() {
        let re = Keywords::pattern().unwrap();
        let found: Vec<&str> = re.find_iter("一昨日と月曜日").map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["一昨日", "月曜日"]);
    }

    #[test]
    fn pattern_respects_word_boundaries() {
        let re = Keywords::pattern().unwrap();
        assert!(re.find("todays").is_none());
        assert_eq!(re.find("see you Tomorrow!").map(|m| m.as_str()), Some("Tomorrow"));
        assert_eq!(
            re.find("since last   week").map(|m| m.as_str()),
            Some("last   week")
        );
    }
}
