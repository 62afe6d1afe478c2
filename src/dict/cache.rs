use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;

use super::loader::{AssetKind, DictionaryLoader};
use crate::checker::engine::SpellEngine;
use crate::error::{Error, Result};
use crate::lang::Language;

/// Process-wide map from language to its speller.
///
/// Each language gets a cell that is either empty (nothing loaded, or a
/// load is in flight) or holds the built engine. Concurrent requests for
/// the same language wait on the same cell, so assets are fetched and the
/// engine built at most once; different languages load independently.
/// A failed load leaves the cell empty and the next request retries.
///
/// Dropping a pending `get_or_create` future cancels its fetch. If that
/// request was the one loading, another waiting request takes over.
pub struct EngineCache<E, L> {
    loader: L,
    entries: DashMap<Language, Arc<OnceCell<Arc<E>>>>,
}

impl<E: SpellEngine, L: DictionaryLoader> EngineCache<E, L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            entries: DashMap::new(),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// The engine for `lang`, loading it on first use.
    pub async fn get_or_create(&self, lang: Language) -> Result<Arc<E>> {
        // Clone the cell out so no map shard lock is held across the await.
        let cell = Arc::clone(self.entries.entry(lang).or_default().value());

        if let Some(engine) = cell.get() {
            log::trace!("speller cache hit for {lang}");
            return Ok(Arc::clone(engine));
        }

        let engine = cell.get_or_try_init(|| self.build(lang)).await?;
        Ok(Arc::clone(engine))
    }

    pub fn is_cached(&self, lang: Language) -> bool {
        self.entries
            .get(&lang)
            .is_some_and(|cell| cell.initialized())
    }

    /// Languages with a ready engine, sorted.
    pub fn cached_languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self
            .entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .map(|entry| *entry.key())
            .collect();
        languages.sort();
        languages
    }

    async fn build(&self, lang: Language) -> Result<Arc<E>> {
        log::info!("loading dictionary for {lang}");
        let started = Instant::now();

        let (aff, dic) = tokio::try_join!(
            self.loader.fetch(lang, AssetKind::Affix),
            self.loader.fetch(lang, AssetKind::Dictionary),
        )?;

        let engine = tokio::task::spawn_blocking(move || E::from_assets(&aff, &dic))
            .await
            .map_err(|e| Error::BuildAborted {
                lang,
                reason: e.to_string(),
            })?
            .map_err(|source| Error::Dictionary { lang, source })?;

        log::info!(
            "dictionary for {lang} ready in {:.2?}",
            started.elapsed()
        );
        Ok(Arc::new(engine))
    }
}
