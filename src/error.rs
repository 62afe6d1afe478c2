use thiserror::Error;

use crate::lang::Language;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported language: {0}")]
    UnknownLanguage(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to build dictionary for {lang}: {source}")]
    Dictionary {
        lang: Language,
        #[source]
        source: DictionaryError,
    },

    #[error("dictionary build for {lang} was interrupted: {reason}")]
    BuildAborted { lang: Language, reason: String },
}

/// Failure retrieving a dictionary asset.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {url}: HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("failed to fetch {url}: {reason}")]
    Unavailable { url: String, reason: String },

    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Malformed affix or word-list content.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("affix file line {line}: {reason}")]
    Affix { line: usize, reason: String },

    #[error("word list line {line}: {reason}")]
    WordList { line: usize, reason: String },

    #[error("failed to index word forms: {0}")]
    Index(#[from] fst::Error),
}

impl DictionaryError {
    pub(crate) fn affix(line: usize, reason: impl Into<String>) -> Self {
        DictionaryError::Affix {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Unavailable {
            url: "https://unpkg.com/dictionary-en/index.aff".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch https://unpkg.com/dictionary-en/index.aff: connection refused"
        );
    }

    #[test]
    fn test_dictionary_error_display() {
        let err = Error::Dictionary {
            lang: Language::De,
            source: DictionaryError::affix(12, "bad rule count"),
        };
        assert_eq!(
            err.to_string(),
            "failed to build dictionary for de: affix file line 12: bad rule count"
        );
    }

    #[test]
    fn test_fetch_error_is_transparent() {
        let err: Error = FetchError::Timeout {
            url: "http://localhost/x".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "timed out fetching http://localhost/x");
    }
}
