use std::future::Future;

use crate::config::Config;
use crate::error::FetchError;
use crate::lang::Language;

/// The two files a speller is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Affix,
    Dictionary,
}

impl AssetKind {
    pub fn extension(self) -> &'static str {
        match self {
            AssetKind::Affix => "aff",
            AssetKind::Dictionary => "dic",
        }
    }
}

/// Source of dictionary assets.
pub trait DictionaryLoader: Send + Sync + 'static {
    /// Fetch the raw text of one asset for `lang`.
    fn fetch(
        &self,
        lang: Language,
        kind: AssetKind,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

pub fn asset_url(base_url: &str, lang: Language, kind: AssetKind) -> String {
    format!(
        "{}/dictionary-{}/index.{}",
        base_url.trim_end_matches('/'),
        lang,
        kind.extension()
    )
}

/// Fetches assets over HTTP from a package CDN laid out as
/// `{base}/dictionary-{lang}/index.{aff,dic}`.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLoader {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: config.asset_base_url.clone(),
        })
    }

    pub fn url(&self, lang: Language, kind: AssetKind) -> String {
        asset_url(&self.base_url, lang, kind)
    }
}

fn transport_error(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source,
        }
    }
}

impl DictionaryLoader for HttpLoader {
    async fn fetch(&self, lang: Language, kind: AssetKind) -> Result<String, FetchError> {
        let url = self.url(lang, kind);
        log::debug!("fetching {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = response.text().await.map_err(|e| transport_error(&url, e))?;
        if body.trim().is_empty() {
            return Err(FetchError::Unavailable {
                url,
                reason: "empty response body".to_string(),
            });
        }

        log::debug!("fetched {url} ({} bytes)", body.len());
        Ok(body)
    }
}
