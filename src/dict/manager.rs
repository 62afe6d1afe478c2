use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use std::time::Duration;

use super::loader::{AssetKind, DictionaryLoader, HttpLoader};
use crate::checker::dictionary::HunspellDictionary;
use crate::config::Config;
use crate::lang::Language;

/// Print every supported language code, several per line.
pub fn list_languages(config: &Config) {
    println!("{}", "Supported languages:".bold());
    println!();

    for row in Language::ALL.chunks(8) {
        let codes: Vec<String> = row
            .iter()
            .map(|lang| {
                let code = format!("{:<12}", lang.as_str());
                if *lang == config.language {
                    code.cyan().bold().to_string()
                } else {
                    code
                }
            })
            .collect();
        println!("  {}", codes.join("").trim_end());
    }

    println!();
    println!(
        "Default language: {}",
        config.language.as_str().cyan().bold()
    );
    println!("Asset source: {}", config.asset_base_url.dimmed());
}

/// Fetch both assets for `lang`, show their size and digest, and build the
/// speller to report how many word forms it knows.
pub async fn show_info(config: &Config, lang: Language) -> Result<()> {
    let loader = HttpLoader::new(config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid progress template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Downloading dictionary for {lang}..."));

    let (aff, dic) = tokio::try_join!(
        loader.fetch(lang, AssetKind::Affix),
        loader.fetch(lang, AssetKind::Dictionary),
    )
    .with_context(|| format!("Failed to download dictionary for {lang}"))?;

    pb.set_message("Building dictionary...");
    let (aff, dic, dictionary) = tokio::task::spawn_blocking(move || {
        let dictionary = HunspellDictionary::parse(&aff, &dic);
        (aff, dic, dictionary)
    })
    .await
    .context("Dictionary build was interrupted")?;
    let dictionary =
        dictionary.with_context(|| format!("Failed to build dictionary for {lang}"))?;
    pb.finish_and_clear();

    println!("{}", format!("Dictionary: {lang}").bold());
    for (kind, body) in [(AssetKind::Affix, &aff), (AssetKind::Dictionary, &dic)] {
        println!("  {}: {}", kind.extension(), loader.url(lang, kind).dimmed());
        println!("    Size: {} KB", body.len() / 1024);
        println!("    SHA-256: {:x}", Sha256::digest(body.as_bytes()));
    }
    println!(
        "  Word forms: {}",
        dictionary.word_count().to_string().yellow()
    );
    println!("  Suggestion alphabet: {}", dictionary.try_chars().len());

    Ok(())
}
