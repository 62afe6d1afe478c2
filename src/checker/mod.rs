pub mod affix;
pub mod dictionary;
pub mod engine;
pub mod suggestions;
pub mod tokenizer;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::{Config, IgnoreScope};
use crate::dict::cache::EngineCache;
use crate::dict::loader::{DictionaryLoader, HttpLoader};
use crate::error::{Error, Result};
use crate::lang::Language;
use crate::{CheckResultItem, JsonPath, RuleContext};
use dictionary::{capitalize, Casing, HunspellDictionary};
use engine::SpellEngine;
use tokenizer::tokenize;

/// Options of one spell-check invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpellCheckOptions {
    pub lang: Language,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_words: Vec<String>,
}

impl SpellCheckOptions {
    pub fn new(lang: Language) -> Self {
        Self {
            lang,
            ignore_words: Vec::new(),
        }
    }

    pub fn with_ignore_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_words.extend(words.into_iter().map(Into::into));
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(idx) = self.ignore_words.iter().position(String::is_empty) {
            return Err(Error::InvalidOptions(format!(
                "ignoreWords[{idx}] must not be empty"
            )));
        }
        Ok(())
    }
}

/// Render the report for a misspelled word. Suggestions are quoted and
/// escaped like JSON strings.
pub fn misspelled_message(word: &str, suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return format!("\"{word}\" is misspelled.");
    }

    let rendered = suggestions
        .iter()
        .map(|s| serde_json::Value::from(s.as_str()).to_string())
        .collect::<Vec<_>>()
        .join(" or ");
    format!("\"{word}\" is misspelled. Did you mean {rendered}?")
}

pub struct SpellChecker<E = HunspellDictionary, L = HttpLoader> {
    cache: EngineCache<E, L>,
    ignore_scope: IgnoreScope,
    max_suggestions: Option<usize>,
}

impl SpellChecker {
    /// A checker fetching dictionaries over HTTP as configured.
    pub fn new(config: &Config) -> Result<Self> {
        let loader = HttpLoader::new(config)?;
        Ok(Self::with_loader(config, loader))
    }
}

impl<E: SpellEngine, L: DictionaryLoader> SpellChecker<E, L> {
    pub fn with_loader(config: &Config, loader: L) -> Self {
        Self {
            cache: EngineCache::new(loader),
            ignore_scope: config.ignore_scope,
            max_suggestions: config.max_suggestions,
        }
    }

    pub fn cache(&self) -> &EngineCache<E, L> {
        &self.cache
    }

    /// Report every misspelled word of `input`, in order of appearance.
    ///
    /// Never fails: any error (dictionary fetch, dictionary build, invalid
    /// options) becomes a single item carrying the error text and no path.
    pub async fn check(
        &self,
        input: &str,
        options: &SpellCheckOptions,
        ctx: &RuleContext,
    ) -> Vec<CheckResultItem> {
        let result = self.try_check(input, options, &ctx.path).await;
        into_items(result)
    }

    /// Like [`check`](Self::check), for options that have not been
    /// deserialised yet. Malformed options are reported like any other error.
    pub async fn check_value(
        &self,
        input: &str,
        options: &serde_json::Value,
        ctx: &RuleContext,
    ) -> Vec<CheckResultItem> {
        let result = match SpellCheckOptions::deserialize(options) {
            Ok(options) => self.try_check(input, &options, &ctx.path).await,
            Err(e) => Err(Error::InvalidOptions(e.to_string())),
        };
        into_items(result)
    }

    async fn try_check(
        &self,
        input: &str,
        options: &SpellCheckOptions,
        path: &JsonPath,
    ) -> Result<Vec<CheckResultItem>> {
        options.validate()?;
        let engine = self.cache.get_or_create(options.lang).await?;

        let overlay: HashSet<&str> = match self.ignore_scope {
            IgnoreScope::Invocation => options.ignore_words.iter().map(String::as_str).collect(),
            IgnoreScope::Shared => {
                for word in &options.ignore_words {
                    engine.add_word(word);
                }
                HashSet::new()
            }
        };

        let items: Vec<CheckResultItem> = tokenize(input)
            .into_iter()
            .filter(|word| !ignored(&overlay, word) && !engine.is_correct(word))
            .map(|word| {
                let mut suggestions = engine.suggest(word);
                if let Some(max) = self.max_suggestions {
                    suggestions.truncate(max);
                }
                CheckResultItem::new(misspelled_message(word, &suggestions), path.clone())
            })
            .collect();

        log::debug!(
            "checked {} chars as {}: {} misspelled",
            input.len(),
            options.lang,
            items.len()
        );
        Ok(items)
    }
}

/// Per-call ignore words follow the speller's casing rules: a lowercase
/// entry also covers its capitalised and all-caps forms.
fn ignored(overlay: &HashSet<&str>, word: &str) -> bool {
    if overlay.is_empty() {
        return false;
    }
    if overlay.contains(word) {
        return true;
    }

    match Casing::of(word) {
        Casing::Capitalized => overlay.contains(word.to_lowercase().as_str()),
        Casing::Upper => {
            let lower = word.to_lowercase();
            overlay.contains(lower.as_str()) || overlay.contains(capitalize(&lower).as_str())
        }
        Casing::Lower | Casing::Mixed => false,
    }
}

fn into_items(result: Result<Vec<CheckResultItem>>) -> Vec<CheckResultItem> {
    result.unwrap_or_else(|err| {
        log::warn!("spell check failed: {err}");
        vec![CheckResultItem::error(err.to_string())]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEngine, FakeLoader};
    use crate::PathSegment;
    use serde_json::json;
    use std::sync::Arc;

    const DIC: &str = "hello
world
good
helo:hello,help
xyzzy:
wrogn:wrong
speling:spelling,spieling,spewing
quot:say \"hi\"
";

    type FakeChecker = SpellChecker<FakeEngine, FakeLoader>;

    fn checker_with(config: Config) -> FakeChecker {
        let loader = FakeLoader::new()
            .with_language(Language::En, "", DIC)
            .with_language(Language::EnGb, "", DIC);
        SpellChecker::with_loader(&config, loader)
    }

    fn checker() -> FakeChecker {
        checker_with(Config::default())
    }

    fn ctx() -> RuleContext {
        RuleContext::new(["paths", "/pets", "get", "description"])
    }

    fn en() -> SpellCheckOptions {
        SpellCheckOptions::new(Language::En)
    }

    #[tokio::test]
    async fn test_misspelling_with_suggestions() {
        let results = checker().check("helo", &en(), &ctx()).await;
        assert_eq!(
            results,
            vec![CheckResultItem {
                message: "\"helo\" is misspelled. Did you mean \"hello\" or \"help\"?".to_string(),
                path: Some(ctx().path),
            }]
        );
    }

    #[tokio::test]
    async fn test_misspelling_without_suggestions() {
        let results = checker().check("xyzzy", &en(), &ctx()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].message, "\"xyzzy\" is misspelled.");
        assert_eq!(results[0].path.as_ref(), Some(&ctx().path));
    }

    #[tokio::test]
    async fn test_results_follow_token_order() {
        let results = checker()
            .check("wrogn: good, xyzzy! hello-world speling 42 a", &en(), &ctx())
            .await;
        let messages: Vec<&str> = results.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "\"wrogn\" is misspelled. Did you mean \"wrong\"?",
                "\"xyzzy\" is misspelled.",
                "\"speling\" is misspelled. Did you mean \"spelling\" or \"spieling\" or \"spewing\"?",
            ]
        );
    }

    #[tokio::test]
    async fn test_suggestions_are_escaped() {
        let results = checker().check("quot", &en(), &ctx()).await;
        assert_eq!(
            results[0].message,
            "\"quot\" is misspelled. Did you mean \"say \\\"hi\\\"\"?"
        );
    }

    #[tokio::test]
    async fn test_max_suggestions() {
        let checker = checker_with(Config {
            max_suggestions: Some(1),
            ..Default::default()
        });
        let results = checker.check("speling", &en(), &ctx()).await;
        assert_eq!(
            results[0].message,
            "\"speling\" is misspelled. Did you mean \"spelling\"?"
        );
    }

    #[tokio::test]
    async fn test_idempotent() {
        let checker = checker();
        assert!(checker.check("hello world", &en(), &ctx()).await.is_empty());
        assert!(checker.check("hello world", &en(), &ctx()).await.is_empty());

        let first = checker.check("helo xyzzy", &en(), &ctx()).await;
        let second = checker.check("helo xyzzy", &en(), &ctx()).await;
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_ignore_words_scoped_to_invocation() {
        let checker = checker();
        let ignoring = en().with_ignore_words(["xyzzy"]);

        assert!(checker.check("xyzzy", &ignoring, &ctx()).await.is_empty());
        assert_eq!(checker.check("xyzzy", &en(), &ctx()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_ignore_words_accept_case_variants() {
        let checker = checker();
        let ignoring = en().with_ignore_words(["xyzzy", "Quux"]);

        assert!(checker
            .check("xyzzy Xyzzy XYZZY Quux QUUX", &ignoring, &ctx())
            .await
            .is_empty());

        let results = checker.check("xYzZy quux", &ignoring, &ctx()).await;
        let messages: Vec<&str> = results.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["\"xYzZy\" is misspelled.", "\"quux\" is misspelled."]
        );
    }

    #[test]
    fn test_ignored_overlay() {
        let overlay: HashSet<&str> = ["hello", "Paris"].into_iter().collect();
        assert!(ignored(&overlay, "hello"));
        assert!(ignored(&overlay, "Hello"));
        assert!(ignored(&overlay, "HELLO"));
        assert!(ignored(&overlay, "PARIS"));
        assert!(!ignored(&overlay, "paris"));
        assert!(!ignored(&overlay, "hELLO"));
        assert!(!ignored(&HashSet::new(), "hello"));
    }

    #[tokio::test]
    async fn test_ignore_words_shared_scope_persists() {
        let checker = checker_with(Config {
            ignore_scope: IgnoreScope::Shared,
            ..Default::default()
        });
        let ignoring = en().with_ignore_words(["xyzzy"]);

        assert!(checker.check("xyzzy", &ignoring, &ctx()).await.is_empty());
        // Registered on the shared speller: later checks without the
        // ignore list still accept the word.
        assert!(checker.check("xyzzy", &en(), &ctx()).await.is_empty());
        // Other languages have their own speller.
        let gb = SpellCheckOptions::new(Language::EnGb);
        assert_eq!(checker.check("xyzzy", &gb, &ctx()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_becomes_single_item() {
        let checker: FakeChecker = SpellChecker::with_loader(
            &Config::default(),
            FakeLoader::new().with_language(Language::En, "", DIC).failing(1),
        );

        let results = checker.check("helo world", &en(), &ctx()).await;
        assert_eq!(results.len(), 1);
        assert!(!results[0].message.is_empty());
        assert!(results[0].message.contains("simulated network error"));
        assert!(results[0].path.is_none());

        // The language was not cached, so the next check retries and succeeds.
        let results = checker.check("helo world", &en(), &ctx()).await;
        assert_eq!(results.len(), 1);
        assert!(results[0].path.is_some());
    }

    #[tokio::test]
    async fn test_unavailable_language() {
        let options = SpellCheckOptions::new(Language::Tlh);
        let results = checker().check("nuqneH", &options, &ctx()).await;
        assert_eq!(results.len(), 1);
        assert!(results[0].message.contains("dictionary-tlh/index."));
        assert!(results[0].path.is_none());
    }

    #[tokio::test]
    async fn test_empty_ignore_word_rejected() {
        let options = en().with_ignore_words([""]);
        let results = checker().check("helo", &options, &ctx()).await;
        assert_eq!(
            results,
            vec![CheckResultItem::error(
                "invalid options: ignoreWords[0] must not be empty"
            )]
        );
    }

    #[tokio::test]
    async fn test_check_value_options() {
        let checker = checker();

        let results = checker
            .check_value("helo", &json!({ "lang": "en", "ignoreWords": ["helo"] }), &ctx())
            .await;
        assert!(results.is_empty());

        for bad in [
            json!({ "lang": "xx" }),
            json!({ "ignoreWords": ["a"] }),
            json!({ "lang": "en", "extra": true }),
            json!("en"),
        ] {
            let results = checker.check_value("helo", &bad, &ctx()).await;
            assert_eq!(results.len(), 1, "{bad}");
            assert!(results[0].message.starts_with("invalid options:"), "{bad}");
            assert!(results[0].path.is_none());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_load_once() {
        let checker = Arc::new(checker());
        let mut handles = Vec::new();
        for i in 0..8 {
            let checker = Arc::clone(&checker);
            handles.push(tokio::spawn(async move {
                let ctx = RuleContext::new([PathSegment::Index(i)]);
                checker.check("helo world", &en(), &ctx).await
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            let results = handle.await.unwrap();
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].path, Some(vec![PathSegment::Index(i)]));
        }
        assert_eq!(checker.cache().loader().fetches(), 2);
    }

    #[test]
    fn test_message_format() {
        assert_eq!(misspelled_message("teh", &[]), "\"teh\" is misspelled.");
        assert_eq!(
            misspelled_message("teh", &["the".to_string(), "tech".to_string()]),
            "\"teh\" is misspelled. Did you mean \"the\" or \"tech\"?"
        );
        assert_eq!(
            misspelled_message("cafe", &["café".to_string()]),
            "\"cafe\" is misspelled. Did you mean \"café\"?"
        );
    }

    #[test]
    fn test_options_serde() {
        let options: SpellCheckOptions =
            serde_json::from_value(json!({ "lang": "de-at", "ignoreWords": ["Jänner"] })).unwrap();
        assert_eq!(options, SpellCheckOptions::new(Language::DeAt).with_ignore_words(["Jänner"]));
        assert_eq!(
            serde_json::to_value(SpellCheckOptions::new(Language::Sv)).unwrap(),
            json!({ "lang": "sv" })
        );
    }
}
