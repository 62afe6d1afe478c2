use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::lang::Language;

pub const DEFAULT_ASSET_BASE_URL: &str = "https://unpkg.com";
pub const LOCAL_CONFIG_FILE: &str = ".lintspell.toml";

/// Where ignore words live once a check registers them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreScope {
    /// Ignore words only apply to the check that supplied them.
    #[default]
    Invocation,
    /// Ignore words are added to the shared speller and stay for the
    /// rest of the process, for every later check of that language.
    Shared,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub language: Language,
    pub asset_base_url: String,
    pub fetch_timeout_secs: u64,

    #[serde(default)]
    pub ignore_words: Vec<String>,

    pub personal_dictionary: Option<PathBuf>,

    #[serde(default)]
    pub ignore_scope: IgnoreScope,

    pub max_suggestions: Option<usize>,
}

/// On-disk layer; every field is optional so layers only override what they set.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    language: Option<Language>,
    asset_base_url: Option<String>,
    fetch_timeout_secs: Option<u64>,
    #[serde(default)]
    ignore_words: Vec<String>,
    personal_dictionary: Option<PathBuf>,
    ignore_scope: Option<IgnoreScope>,
    max_suggestions: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::En,
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            fetch_timeout_secs: 30,
            ignore_words: Vec::new(),
            personal_dictionary: None,
            ignore_scope: IgnoreScope::Invocation,
            max_suggestions: None,
        }
    }
}

impl Config {
    /// Load configuration with priority: explicit file > local config > global config > defaults.
    /// CLI flags are applied by the caller on the returned value.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.merge(Self::read_layer(&global_path)?);
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            config.merge(Self::read_layer(&local_path)?);
        }

        if let Some(path) = explicit {
            config.merge(Self::read_layer(path)?);
        }

        Ok(config)
    }

    fn read_layer(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(&mut self, layer: ConfigFile) {
        if let Some(language) = layer.language {
            self.language = language;
        }
        if let Some(url) = layer.asset_base_url {
            self.asset_base_url = url;
        }
        if let Some(secs) = layer.fetch_timeout_secs {
            self.fetch_timeout_secs = secs;
        }
        self.ignore_words.extend(layer.ignore_words);
        if layer.personal_dictionary.is_some() {
            self.personal_dictionary = layer.personal_dictionary;
        }
        if let Some(scope) = layer.ignore_scope {
            self.ignore_scope = scope;
        }
        if layer.max_suggestions.is_some() {
            self.max_suggestions = layer.max_suggestions;
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Words from the personal dictionary file, one per line, `#` starts a comment line.
    /// A missing file yields no words.
    pub fn personal_words(&self) -> Result<Vec<String>> {
        let Some(path) = &self.personal_dictionary else {
            return Ok(Vec::new());
        };
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read personal dictionary: {}", path.display()))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|word| !word.is_empty() && !word.starts_with('#'))
            .map(str::to_string)
            .collect())
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "lintspell").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_personal_dict_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "lintspell").map(|dirs| dirs.config_dir().join("personal.txt"))
    }
}
