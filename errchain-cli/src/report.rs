//! Rendering of error chains for the terminal

use clap::ValueEnum;
use errchain_error::{Error, Link};
use serde::Serialize;

/// Output format for chain reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// One-line description plus match results
    #[default]
    Text,
    /// Multi-line debug report of the outermost node
    Debug,
    /// Pretty-printed JSON
    Json,
}

/// Settings derived from the command line
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub format: Format,
    pub verbose: bool,
    pub quiet: bool,
}

/// One member of a chain
#[derive(Debug, Serialize)]
pub struct LinkReport {
    pub kind: Option<&'static str>,
    pub message: String,
    pub status: Option<&'static str>,
}

impl LinkReport {
    fn from_link(link: Link<'_>) -> Self {
        Self {
            kind: link.kind().map(|kind| kind.as_str()),
            message: link.text().map(|text| text.into_owned()).unwrap_or_default(),
            status: link.as_error().map(|err| err.status().as_str()),
        }
    }
}

/// Result of probing a chain for one kind or sentinel
#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub target: String,
    pub matched: bool,
}

/// Everything the CLI prints about one chain
#[derive(Debug, Serialize)]
pub struct ChainReport {
    pub description: String,
    pub depth: usize,
    pub retryable: bool,
    pub links: Vec<LinkReport>,
    pub matches: Vec<MatchReport>,
}

impl ChainReport {
    pub fn new(err: &Error) -> Self {
        Self {
            description: err.describe(),
            depth: err.depth(),
            retryable: err.is_retryable(),
            links: err.chain().map(LinkReport::from_link).collect(),
            matches: Vec::new(),
        }
    }

    /// Record a probe result
    pub fn with_match(mut self, target: impl Into<String>, matched: bool) -> Self {
        self.matches.push(MatchReport {
            target: target.into(),
            matched,
        });
        self
    }
}

/// Render a report in the configured format
pub fn render(err: &Error, report: &ChainReport, config: &RenderConfig) -> anyhow::Result<String> {
    let mut out = String::new();

    match config.format {
        Format::Json => return Ok(serde_json::to_string_pretty(report)?),
        Format::Debug => out.push_str(&format!("{:?}", err)),
        Format::Text => {
            out.push_str(&report.description);
            out.push('\n');
            if config.verbose {
                for (i, link) in report.links.iter().enumerate() {
                    let kind = link.kind.unwrap_or("-");
                    out.push_str(&format!("  {:2}. {:<24} {}\n", i, kind, link.message));
                }
            }
        }
    }

    if !config.quiet {
        for m in &report.matches {
            let mark = if m.matched { "yes" } else { "no" };
            out.push_str(&format!("  {:<30} {}\n", m.target, mark));
        }
    }

    Ok(out)
}
