use dashmap::DashSet;
use fst::{Automaton, IntoStreamer, Set, Streamer};
use std::collections::{BTreeSet, HashSet};

use super::affix::{AffixFile, Flag};
use super::engine::SpellEngine;
use super::suggestions;
use crate::error::DictionaryError;

/// Upper bound on suggestions returned for one word.
pub const MAX_SUGGESTIONS: usize = 10;

/// Speller built from an affix file and a word list. Every word form the
/// affix rules can derive is expanded up front into an FST.
pub struct HunspellDictionary {
    set: Set<Vec<u8>>,
    forbidden: HashSet<String>,
    no_suggest: HashSet<String>,
    added: DashSet<String>,
    try_chars: Vec<char>,
    replacements: Vec<(String, String)>,
}

#[derive(Default)]
struct Forms {
    accepted: BTreeSet<String>,
    forbidden: HashSet<String>,
    no_suggest: HashSet<String>,
}

impl Forms {
    fn push(&mut self, word: String, no_suggest: bool) {
        if no_suggest {
            self.no_suggest.insert(word.clone());
        }
        self.accepted.insert(word);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Casing {
    Lower,
    Capitalized,
    Upper,
    Mixed,
}

impl Casing {
    pub(crate) fn of(word: &str) -> Self {
        let mut letters = word.chars().filter(|c| c.is_alphabetic());
        let Some(first) = letters.next() else {
            return Casing::Lower;
        };
        let rest: Vec<char> = letters.collect();
        let rest_upper = rest.iter().filter(|c| c.is_uppercase()).count();

        match (first.is_uppercase(), rest_upper) {
            (false, 0) => Casing::Lower,
            (true, 0) => Casing::Capitalized,
            (true, n) if n == rest.len() => Casing::Upper,
            _ => Casing::Mixed,
        }
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl HunspellDictionary {
    pub fn parse(aff: &str, dic: &str) -> Result<Self, DictionaryError> {
        let affixes = AffixFile::parse(aff)?;
        let mut forms = Forms::default();

        for (idx, raw_line) in dic.lines().enumerate() {
            let line_no = idx + 1;
            // Tab-indented lines are comments.
            if raw_line.starts_with('\t') {
                continue;
            }
            let line = raw_line.trim_start_matches('\u{feff}').trim();
            if line.is_empty() || (idx == 0 && line.parse::<usize>().is_ok()) {
                continue;
            }

            let (stem, raw_flags) = split_entry(line);
            if stem.is_empty() {
                continue;
            }
            let flags = match raw_flags {
                Some(raw) => affixes
                    .decode_flags(raw)
                    .map_err(|reason| DictionaryError::WordList {
                        line: line_no,
                        reason,
                    })?,
                None => Vec::new(),
            };

            expand(&affixes, &stem, &flags, &mut forms);
        }

        let set = Set::from_iter(forms.accepted.iter())?;
        log::debug!(
            "indexed {} word forms ({} forbidden)",
            set.len(),
            forms.forbidden.len()
        );

        Ok(Self {
            set,
            forbidden: forms.forbidden,
            no_suggest: forms.no_suggest,
            added: DashSet::new(),
            try_chars: affixes.try_chars,
            replacements: affixes.replacements,
        })
    }

    /// Number of distinct word forms, not counting added words.
    pub fn word_count(&self) -> usize {
        self.set.len()
    }

    fn lookup(&self, word: &str) -> bool {
        !self.forbidden.contains(word) && (self.set.contains(word) || self.added.contains(word))
    }

    /// Check a word, accepting capitalised and all-caps forms of known words.
    pub fn check(&self, word: &str) -> bool {
        if self.lookup(word) {
            return true;
        }
        if self.forbidden.contains(word) {
            return false;
        }

        match Casing::of(word) {
            Casing::Capitalized => self.lookup(&word.to_lowercase()),
            Casing::Upper => {
                let lower = word.to_lowercase();
                self.lookup(&lower) || self.lookup(&capitalize(&lower))
            }
            Casing::Lower | Casing::Mixed => false,
        }
    }

    pub(crate) fn suggestable(&self, word: &str) -> bool {
        !self.no_suggest.contains(word)
    }

    /// Indexed words starting with `prefix`, in byte order, at most `limit`.
    pub fn words_with_prefix(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        while let Some(key) = stream.next() {
            if results.len() >= limit {
                break;
            }
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                results.push(word);
            }
        }

        results
    }

    pub fn try_chars(&self) -> &[char] {
        &self.try_chars
    }

    pub fn replacements(&self) -> &[(String, String)] {
        &self.replacements
    }
}

impl SpellEngine for HunspellDictionary {
    fn from_assets(aff: &str, dic: &str) -> Result<Self, DictionaryError> {
        Self::parse(aff, dic)
    }

    fn is_correct(&self, word: &str) -> bool {
        self.check(word)
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        suggestions::generate(word, self, MAX_SUGGESTIONS)
    }

    fn add_word(&self, word: &str) {
        self.added.insert(word.to_string());
    }
}

/// Split `word/flags` (followed by optional morphology fields) into the
/// word, with `\/` unescaped, and its raw flags.
fn split_entry(line: &str) -> (String, Option<&str>) {
    let entry = line.split_whitespace().next().unwrap_or_default();
    let mut escaped = false;

    for (idx, ch) in entry.char_indices() {
        match ch {
            '\\' => escaped = !escaped,
            '/' if !escaped && idx > 0 => {
                return (entry[..idx].replace("\\/", "/"), Some(&entry[idx + 1..]));
            }
            _ => escaped = false,
        }
    }

    (entry.replace("\\/", "/"), None)
}

fn expand(affixes: &AffixFile, stem: &str, flags: &[Flag], forms: &mut Forms) {
    let has = |flag: Option<Flag>| flag.is_some_and(|f| flags.contains(&f));

    if has(affixes.forbidden) {
        forms.forbidden.insert(stem.to_string());
        return;
    }
    let no_suggest = has(affixes.no_suggest);

    if !has(affixes.need_affix) && !has(affixes.only_in_compound) {
        forms.push(stem.to_string(), no_suggest);
    }

    for suffix in affixes.suffixes_with(flags) {
        let Some(derived) = suffix.apply(stem) else {
            continue;
        };

        for next in affixes.suffixes_with(&suffix.continuation) {
            if let Some(twice) = next.apply(&derived) {
                forms.push(twice, no_suggest);
            }
        }

        if suffix.cross_product {
            for prefix in affixes.prefixes_with(flags).filter(|r| r.cross_product) {
                if let Some(both) = prefix.apply(&derived) {
                    forms.push(both, no_suggest);
                }
            }
        }

        let bound = affixes
            .need_affix
            .is_some_and(|f| suffix.continuation.contains(&f));
        if !bound {
            forms.push(derived, no_suggest);
        }
    }

    for prefix in affixes.prefixes_with(flags) {
        if let Some(derived) = prefix.apply(stem) {
            forms.push(derived, no_suggest);
        }
    }
}
