#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use vlist::{ListConfig, Result};

use crate::app::{Action, InboxApp};
use crate::data::InMemoryRepository;
use crate::terminal;

#[derive(Debug, Parser)]
#[command(
    name = "vlist-inbox",
    about = "Messaging inbox over a virtualized list",
    version
)]
pub struct Cli {
    /// List configuration (TOML, or JSON when the extension is `.json`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of mock messages to seed.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub messages: usize,

    /// Write logs here instead of stderr. `RUST_LOG` sets the filter.
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print one frame as plain text.
    Snapshot(SnapshotArgs),

    /// Start the interactive inbox.
    Run,
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    #[arg(long, default_value_t = 80)]
    pub width: u16,

    #[arg(long, default_value_t = 24)]
    pub height: u16,

    /// Scroll offset in rows.
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Filter messages before rendering.
    #[arg(long)]
    pub query: Option<String>,

    /// Select this message index.
    #[arg(long)]
    pub select: Option<usize>,
}

pub fn run_from_env() -> Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<()> {
    let interactive = matches!(cli.command, Commands::Run);
    init_logging(cli.log_file.as_deref(), interactive)?;

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ListConfig::default(),
    };
    let repo = InMemoryRepository::seeded(cli.messages);

    let result = match cli.command {
        Commands::Snapshot(args) => print_snapshot(repo, config, &args),
        Commands::Run => InboxApp::new(repo, config, 80, 24)
            .and_then(|mut app| terminal::run(&mut app).map_err(Into::into)),
    };
    if let Err(err) = &result {
        warn!(
            error_type = err.error_type(),
            field = err.field().unwrap_or("-"),
            %err,
            "command failed"
        );
    }
    result
}

fn print_snapshot(repo: InMemoryRepository, config: ListConfig, args: &SnapshotArgs) -> Result<()> {
    let lines = snapshot(repo, config, args)?;
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Render one frame for `args`.
pub fn snapshot(
    repo: InMemoryRepository,
    config: ListConfig,
    args: &SnapshotArgs,
) -> Result<Vec<String>> {
    let mut app = InboxApp::new(repo, config, args.width, args.height)?;
    for ch in args.query.iter().flat_map(|q| q.chars()) {
        app.apply(Action::SearchInput(ch));
    }
    if let Some(index) = args.select {
        app.apply(Action::Click(vlist::Hit {
            id: crate::app::LIST_HIT,
            region: vlist::HitRegion::Content,
            data: index as u64,
        }));
    }
    app.apply(Action::ScrollTo(args.offset));
    Ok(app.snapshot())
}

pub fn load_config(path: &Path) -> Result<ListConfig> {
    let config = if path.extension().is_some_and(|ext| ext == "json") {
        ListConfig::from_json_file(path)?
    } else {
        ListConfig::from_toml_file(path)?
    };
    Ok(config.into_validated()?)
}

/// Install the fmt subscriber. The interactive session owns the terminal, so
/// without a log file it logs nowhere.
fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init(),
        None if interactive => return Ok(()),
        None => builder.with_writer(io::stderr).try_init(),
    };
    if let Err(err) = installed {
        tracing::debug!(%err, "keeping existing tracing subscriber");
    }
    Ok(())
}

/// Process exit code for `error`.
pub fn exit_code(error: &vlist::Error) -> i32 {
    match error.error_type() {
        "config" | "window" => 2,
        _ => 1,
    }
}
