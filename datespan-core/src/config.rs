use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::BaseDirs;
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::keywords::Keywords;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Day that relative words (`tomorrow`, `3日後`, `friday`) are anchored to.
    /// `None` means today's local date at the time of the call.
    pub reference_date: Option<NaiveDate>,
    /// Extra `chrono` formats for numeric dates, tried before the built-in ones.
    pub input_date_formats: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    reference_date: Option<String>,
    input_date_formats: Option<Vec<String>>,
    /// Optional table:
    /// [synonyms]
    /// tmrw = "tomorrow"
    /// ayer = "yesterday"
    synonyms: Option<HashMap<String, String>>,
}

impl Config {
    /// Public entrypoint: load config from disk (first XDG path, then native), apply defaults,
    /// and extend the global Keywords registry with user-defined synonyms if present.
    ///
    /// A missing or broken file never fails the program; it only means defaults.
    pub fn load() -> Self {
        match Self::read_file_config() {
            Ok(file_config) => Self::apply(file_config),
            Err(err) => {
                let error = format!("{err:#}");
                tracing::warn!(%error, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Load from one explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let file_config =
            Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()))?;
        Ok(Self::apply(file_config))
    }

    fn apply(file_config: FileConfig) -> Self {
        let reference_date = file_config
            .reference_date
            .as_deref()
            .and_then(Self::parse_reference_date);

        // Extend global keyword registry once at startup.
        Self::load_synonyms(&file_config.synonyms);

        Self {
            reference_date,
            input_date_formats: file_config.input_date_formats.unwrap_or_default(),
        }
    }

    /// Parse a "%Y-%m-%d" string into NaiveDate.
    fn parse_reference_date(date: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
    }

    fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            let xdg = b
                .home_dir()
                .join(".config")
                .join("datespan")
                .join("config.toml");
            v.push(xdg);
            let native = b.config_dir().join("datespan").join("config.toml");
            v.push(native);
        }
        v
    }

    /// Read the first existing config file and parse it.
    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            tracing::debug!(path = %path.display(), "loading config");
            let s =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            return Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()));
        }
        Ok(FileConfig::default())
    }

    /// Parse a TOML string into `FileConfig`.
    fn parse_file(s: &str) -> Result<FileConfig> {
        Ok(toml::from_str::<FileConfig>(s)?)
    }

    /// Merge `[synonyms]` into the global Keywords registry.
    /// Omits synonyms that collide with a canonical Keyword (eg. "today").
    fn load_synonyms(synonyms: &Option<HashMap<String, String>>) {
        match synonyms {
            Some(map) if !map.is_empty() => {
                let pairs: Vec<(String, String)> = map
                    .iter()
                    .filter(|(alias, _)| !Keywords::is_canonical(alias))
                    .map(|(a, t)| (a.clone(), t.clone()))
                    .collect();

                if !pairs.is_empty() {
                    Keywords::extend(&pairs);
                }
            }
            _ => {}
        }
    }
}
