use crate::error::DictionaryError;

/// A spell-checking engine for a single language.
///
/// Engines are built once per language and shared behind an `Arc` by every
/// concurrent check, so all methods take `&self`. `add_word` therefore needs
/// interior mutability.
pub trait SpellEngine: Send + Sync + 'static {
    /// Build an engine from the raw affix rules and word list.
    fn from_assets(aff: &str, dic: &str) -> Result<Self, DictionaryError>
    where
        Self: Sized;

    fn is_correct(&self, word: &str) -> bool;

    /// Ordered corrections for `word`, best first. May be empty.
    fn suggest(&self, word: &str) -> Vec<String>;

    /// Accept `word` as correct from now on.
    fn add_word(&self, word: &str);
}
