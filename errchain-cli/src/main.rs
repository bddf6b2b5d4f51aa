//! # errchain CLI
//!
//! Builds the two canonical error chains and shows how they match.
//!
//! Usage:
//!   errchain structured
//!   errchain sentinel
//!   errchain io
//!   errchain kinds
//!
//! Examples:
//!   errchain structured --verbose
//!   errchain --format json sentinel
//!   RUST_LOG=debug errchain io

mod demo;
mod report;

use clap::{Parser, Subcommand};
use errchain_error::{matches_kind, matches_sentinel, Error, ErrorKind, ErrorStatus};
use report::{ChainReport, Format, RenderConfig};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "errchain")]
#[command(author, version, about = "errchain - wrap errors, then ask what is underneath")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Enable verbose output (list every link of the chain)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only show the chain description
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Every layer is a kinded error; match by kind
    Structured {
        /// Host named in the connection layer's context
        #[arg(long, default_value = "api.internal")]
        host: String,
    },
    /// Text layers around a sentinel; match by identity
    Sentinel,
    /// An OS connection reset mapped onto a kind
    Io {
        /// Peer address recorded on the mapped error
        #[arg(long, default_value = "10.0.0.7:443")]
        peer: String,
    },
    /// List every error kind
    Kinds,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            format: self.format,
            verbose: self.verbose,
            quiet: self.quiet,
        }
    }
}

fn init_tracing(config: &RenderConfig) {
    let level = if config.verbose {
        tracing::Level::DEBUG
    } else if config.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn print_report(err: &Error, report: &ChainReport, config: &RenderConfig) -> anyhow::Result<()> {
    let out = report::render(err, report, config)?;
    print!("{}", out);
    if !out.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn run_structured(host: &str, config: &RenderConfig) -> anyhow::Result<()> {
    let err = demo::structured_chain(host);
    debug!(depth = err.depth(), operation = err.operation(), "built structured chain");

    let mut report = ChainReport::new(&err);
    for kind in demo::STRUCTURED_PROBES {
        let matched = matches_kind(&err, kind);
        debug!(kind = kind.as_str(), matched, "probed kind");
        report = report.with_match(kind.as_str(), matched);
    }

    if matches_kind(&err, ErrorKind::UnexpectedResponse) {
        info!(error = %err, "handling unexpected response");
    } else {
        info!("default action");
    }

    if let Some(conn) = err.find_kind(ErrorKind::Connection) {
        for (key, value) in conn.context() {
            debug!(key, value = value.as_str(), "connection context");
        }
    }

    print_report(&err, &report, config)
}

fn run_sentinel(config: &RenderConfig) -> anyhow::Result<()> {
    let err = demo::sentinel_chain();
    debug!(depth = err.depth(), "built sentinel chain");

    let mut report = ChainReport::new(&err);
    for (name, sentinel) in demo::sentinel_probes() {
        let matched = matches_sentinel(&err, sentinel);
        debug!(sentinel = name, matched, "probed sentinel");
        report = report.with_match(name, matched);
    }

    if matches_sentinel(&err, &demo::LOOKALIKE_RESET) {
        warn!("look-alike sentinel matched by message");
    }

    print_report(&err, &report, config)
}

fn run_io(peer: &str, config: &RenderConfig) -> anyhow::Result<()> {
    let err = demo::io_chain(peer);

    let mut report = ChainReport::new(&err);
    for kind in [ErrorKind::ConnectionResetByPeer, ErrorKind::Connection] {
        report = report.with_match(kind.as_str(), matches_kind(&err, kind));
    }

    for (name, sentinel) in demo::os_sentinel_probes() {
        let matched = matches_sentinel(&err, sentinel);
        debug!(sentinel = name, matched, "probed os sentinel");
        report = report.with_match(name, matched);
    }

    if let Some(reset) = err.find_kind(ErrorKind::ConnectionResetByPeer) {
        if reset.is_retryable() {
            info!(status = %reset.status(), "reset is retryable");
        }
    }

    print_report(&err, &report, config)
}

fn show_kinds(config: &RenderConfig) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct KindRow {
        kind: &'static str,
        description: &'static str,
        status: &'static str,
    }

    let rows: Vec<KindRow> = ErrorKind::ALL
        .iter()
        .map(|kind| KindRow {
            kind: kind.as_str(),
            description: kind.description(),
            status: if kind.is_retryable() {
                ErrorStatus::Temporary.as_str()
            } else {
                ErrorStatus::Permanent.as_str()
            },
        })
        .collect();

    if config.format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Error kinds:");
    for row in &rows {
        println!("  {:<24} {:<10} {}", row.kind, row.status, row.description);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let config = cli.render_config();
    init_tracing(&config);

    let result = match &cli.command {
        Commands::Structured { host } => run_structured(host, &config),
        Commands::Sentinel => run_sentinel(&config),
        Commands::Io { peer } => run_io(peer, &config),
        Commands::Kinds => show_kinds(&config),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
