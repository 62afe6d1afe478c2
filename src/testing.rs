//! In-memory loader and speller used by unit tests.

use dashmap::DashSet;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::checker::engine::SpellEngine;
use crate::dict::loader::{asset_url, AssetKind, DictionaryLoader};
use crate::error::{DictionaryError, FetchError};
use crate::lang::Language;

/// Serves canned assets, counting every fetch.
#[derive(Default)]
pub struct FakeLoader {
    assets: HashMap<Language, (String, String)>,
    delay: Duration,
    failures: AtomicUsize,
    fetches: AtomicUsize,
}

impl FakeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, lang: Language, aff: &str, dic: &str) -> Self {
        self.assets.insert(lang, (aff.to_string(), dic.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make the next `count` fetches fail.
    pub fn failing(self, count: usize) -> Self {
        self.failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DictionaryLoader for FakeLoader {
    async fn fetch(&self, lang: Language, kind: AssetKind) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let url = asset_url("fake://assets", lang, kind);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FetchError::Unavailable {
                url,
                reason: "simulated network error".to_string(),
            });
        }

        let Some((aff, dic)) = self.assets.get(&lang) else {
            return Err(FetchError::Status {
                url,
                status: reqwest::StatusCode::NOT_FOUND,
            });
        };
        Ok(match kind {
            AssetKind::Affix => aff.clone(),
            AssetKind::Dictionary => dic.clone(),
        })
    }
}

/// Speller driven by a tiny word list: `word` is correct, `word:a,b` is
/// misspelled with suggestions `a` and `b`, `word:` is misspelled with none.
/// An affix file reading `broken` fails construction.
pub struct FakeEngine {
    correct: HashSet<String>,
    suggestions: HashMap<String, Vec<String>>,
    added: DashSet<String>,
}

impl SpellEngine for FakeEngine {
    fn from_assets(aff: &str, dic: &str) -> Result<Self, DictionaryError> {
        if aff.trim() == "broken" {
            return Err(DictionaryError::affix(1, "broken affix file"));
        }

        let mut correct = HashSet::new();
        let mut suggestions = HashMap::new();
        for line in dic.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match line.split_once(':') {
                Some((word, list)) => {
                    let list = list
                        .split(',')
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                    suggestions.insert(word.to_string(), list);
                }
                None => {
                    correct.insert(line.to_string());
                }
            }
        }

        Ok(Self {
            correct,
            suggestions,
            added: DashSet::new(),
        })
    }

    fn is_correct(&self, word: &str) -> bool {
        self.correct.contains(word) || self.added.contains(word)
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        self.suggestions.get(word).cloned().unwrap_or_default()
    }

    fn add_word(&self, word: &str) {
        self.added.insert(word.to_string());
    }
}
