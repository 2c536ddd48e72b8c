//! jp-edit: headless front end for the editing core.
//!
//! Opens the given files (or a scratch document), then reads textual
//! commands from `--script` or stdin and prints what each one changed.
//! Logs go to stderr so stdout carries only command output.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use jp_edit::{script, Config, Session};
use tracing_subscriber::EnvFilter;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "jp-edit", version, about = "Line editor driven by textual commands")]
struct Args {
    /// Files to open. The first one starts active.
    files: Vec<PathBuf>,
    /// Configuration file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter used when RUST_LOG is not set (overrides the config file).
    #[arg(long = "log-filter")]
    log_filter: Option<String>,
    /// Read commands from this file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Insert spaces for the tab command (overrides the config file).
    #[arg(long = "expand-tab")]
    expand_tab: bool,
    /// Spaces per tab when expanding (overrides the config file).
    #[arg(long = "tab-width")]
    tab_width: Option<usize>,
}

fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load(),
    };
    if let Some(filter) = &args.log_filter {
        config.log_filter = filter.clone();
    }
    if args.expand_tab {
        config.expand_tab = true;
    }
    if let Some(width) = args.tab_width {
        config.tab_width = width;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&config.log_filter);
    tracing::debug!(?config, "starting");

    let mut session = Session::new(config);
    let mut first = None;
    for path in &args.files {
        let id = session
            .open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        first.get_or_insert(id);
    }
    if let Some(id) = first {
        session.select(id)?;
    }

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let stdout = io::stdout();
    script::run(&mut session, input, &mut stdout.lock()).context("running commands")?;

    for (id, doc) in session.documents() {
        if doc.is_modified() {
            tracing::warn!(document = %id, path = ?doc.path(), "exiting with unsaved changes");
        }
    }
    Ok(())
}
