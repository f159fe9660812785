use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{info, warn};

use prnews::app::App;
use prnews::clipboard::SystemClipboard;
use prnews::config::Config;
use prnews::loader::Executor;
use prnews::{init, logging};

/// Result events waiting for the loop; progress beyond this is dropped
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "prnews")]
#[command(about = "Digest recently merged GitHub pull requests with an LLM")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Lookback window in days (overrides [search].default_days)
    #[arg(short, long)]
    days: Option<u32>,

    /// Only PRs merged into this base branch
    #[arg(short, long)]
    branch: Option<String>,

    /// Initial repository filter
    #[arg(short, long)]
    filter: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default config file to ~/.config/prnews/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(Command::Init { force }) = args.command {
        return init::run_init(force);
    }

    // Logging is best effort
    let log_path = logging::init().ok();

    let mut config = Config::load()?;
    if let Some(days) = args.days {
        config.search.default_days = days;
    }
    if let Some(branch) = args.branch {
        config.search.default_branch = branch;
    }

    if which::which("gh").is_err() {
        bail!("gh CLI not found in PATH. Install it from https://cli.github.com and run `gh auth login`.");
    }
    if which::which(&config.summary.command).is_err() {
        warn!(command = %config.summary.command, "summarizer command not found; summaries will fail");
    }
    info!(log = ?log_path, "starting prnews");

    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let executor = Executor::new(tx, config.clone());
    let mut app = App::new(config, Box::new(SystemClipboard));
    if let Some(filter) = args.filter.as_deref() {
        app = app.with_filter(filter);
    }

    app.run(executor, rx).await
}
