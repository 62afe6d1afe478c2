use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use lintspell::cli::output::{self, FileReport, OutputFormat};
use lintspell::{dict, Config, Language, RuleContext, SpellCheckOptions, SpellChecker};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Parser, Debug)]
#[command(name = "lintspell")]
#[command(version, about = "Spell-check text against Hunspell dictionaries", long_about = None)]
struct Cli {
    /// Files to check (reads stdin when empty or `-`)
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Dictionary language (e.g., en, en-gb, de-ch)
    #[arg(short, long, env = "LINTSPELL_LANG")]
    lang: Option<Language>,

    /// Word to accept as correct (repeatable)
    #[arg(long = "ignore-word", value_name = "WORD")]
    ignore_words: Vec<String>,

    /// Personal dictionary file, one word per line
    #[arg(long)]
    personal_dict: Option<PathBuf>,

    /// Configuration file (overrides global and local config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if problems are found
    #[arg(long)]
    no_fail: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DictCommands {
    /// List supported languages
    List,
    /// Download a dictionary and show its details
    Info {
        /// Language code (e.g., en, fr, pt-pt)
        language: Language,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "lintspell", &mut io::stdout());
        return Ok(());
    }

    // Load configuration, then apply CLI overrides
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(lang) = cli.lang {
        config.language = lang;
    }
    if cli.personal_dict.is_some() {
        config.personal_dictionary = cli.personal_dict.clone();
    } else if config.personal_dictionary.is_none() {
        config.personal_dictionary = Config::default_personal_dict_path();
    }
    config.ignore_words.extend(cli.ignore_words.iter().cloned());

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command, &config).await;
    }

    let use_color = !cli.no_color && io::stdout().is_terminal();
    colored::control::set_override(use_color);

    let mut ignore_words = config.ignore_words.clone();
    ignore_words.extend(config.personal_words()?);
    let options = SpellCheckOptions::new(config.language).with_ignore_words(ignore_words);
    options.validate()?;

    let inputs = read_inputs(&cli.files)?;
    if inputs.is_empty() {
        anyhow::bail!("No readable input. Use --help for usage information.");
    }

    let checker = Arc::new(SpellChecker::new(&config)?);
    let mut tasks = JoinSet::new();
    for (idx, (name, text)) in inputs.into_iter().enumerate() {
        let checker = Arc::clone(&checker);
        let options = options.clone();
        tasks.spawn(async move {
            let ctx = RuleContext::new([name.as_str()]);
            let results = checker.check(&text, &options, &ctx).await;
            (idx, FileReport { file: name, results })
        });
    }

    let mut reports = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        reports.push(joined.context("Check task failed")?);
    }
    reports.sort_by_key(|(idx, _)| *idx);
    let reports: Vec<FileReport> = reports.into_iter().map(|(_, report)| report).collect();

    let rendered =
        output::render(&reports, use_color, cli.format).context("Failed to render results")?;
    print!("{rendered}");
    let total = output::total_problems(&reports);
    println!();
    if cli.format == OutputFormat::Text {
        println!("{}", output::check_summary(total, reports.len(), use_color));
    }

    // Exit with appropriate code
    if total > 0 && !cli.no_fail {
        std::process::exit(1);
    }

    Ok(())
}

/// Named texts to check; unreadable files are reported and skipped.
fn read_inputs(files: &[PathBuf]) -> Result<Vec<(String, String)>> {
    let mut inputs = Vec::new();

    if files.is_empty() || files.iter().any(|f| f.as_os_str() == "-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        inputs.push(("<stdin>".to_string(), text));
    }

    for path in files.iter().filter(|f| f.as_os_str() != "-") {
        match std::fs::read_to_string(path) {
            Ok(text) => inputs.push((path.display().to_string(), text)),
            Err(e) => eprintln!("Error: Failed to read {}: {}", path.display(), e),
        }
    }

    Ok(inputs)
}

async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Dict { action } => match action {
            DictCommands::List => {
                dict::manager::list_languages(config);
            }
            DictCommands::Info { language } => {
                dict::manager::show_info(config, language).await?;
            }
        },
    }
    Ok(())
}
