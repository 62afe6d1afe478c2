use crate::CheckResultItem;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Results for one checked input.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub results: Vec<CheckResultItem>,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    files_checked: usize,
    total_problems: usize,
    files: &'a [FileReport],
}

pub fn total_problems(reports: &[FileReport]) -> usize {
    reports.iter().map(|r| r.results.len()).sum()
}

pub fn render(
    reports: &[FileReport],
    colored_output: bool,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(reports, colored_output)),
        OutputFormat::Json => render_json(reports),
    }
}

fn render_text(reports: &[FileReport], colored_output: bool) -> String {
    let mut out = String::new();

    for report in reports.iter().filter(|r| !r.results.is_empty()) {
        if colored_output {
            out.push_str(&format!("\n{}\n", report.file.bold().underline()));
        } else {
            out.push_str(&format!("\n{}\n", report.file));
        }

        for item in &report.results {
            let line = match (item.is_error(), colored_output) {
                (true, true) => format!("  {} {}", "error".red().bold(), item.message),
                (true, false) => format!("  error {}", item.message),
                (false, true) => format!("  {} {}", "✗".yellow(), item.message),
                (false, false) => format!("  {}", item.message),
            };
            out.push_str(&line);
            out.push('\n');
        }
    }

    out
}

fn render_json(reports: &[FileReport]) -> serde_json::Result<String> {
    let output = JsonOutput {
        files_checked: reports.len(),
        total_problems: total_problems(reports),
        files: reports,
    };

    serde_json::to_string_pretty(&output)
}

pub fn check_summary(total: usize, files: usize, colored: bool) -> String {
    let file_word = if files == 1 { "input" } else { "inputs" };

    if total == 0 {
        let line = "✓ No spelling errors found!";
        return if colored {
            line.green().bold().to_string()
        } else {
            line.to_string()
        };
    }

    let problem_word = if total == 1 { "problem" } else { "problems" };
    if colored {
        format!(
            "{} {} {} found in {} {}",
            "✗".red().bold(),
            total.to_string().red().bold(),
            problem_word,
            files,
            file_word
        )
    } else {
        format!("✗ {} {} found in {} {}", total, problem_word, files, file_word)
    }
}
