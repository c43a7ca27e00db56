use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};

use phishgard_client::api::ApiClient;
use phishgard_client::config::load_config;
use phishgard_client::inbox::Inbox;
use phishgard_client::terminal::run_tui;
use phishgard_client::watcher::{WatcherConfig, run_watcher};

#[derive(Parser)]
#[command(name = "phishgard")]
#[command(about = "Terminal client for the PhishGard-AI analysis backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the TUI (inbox + analysis details + dashboard)
    Tui,

    /// Run headless: poll, analyze, notify on phishing verdicts
    Watch {
        /// Seconds between polls (overrides the config value)
        #[arg(long)]
        interval: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
    let api = ApiClient::new(&cfg.api_base_url)?;
    let inbox = Inbox::new();

    match cli.cmd {
        Command::Tui => run_tui(&api, &inbox, &cfg),

        Command::Watch { interval } => run_watcher(
            &inbox,
            &api,
            WatcherConfig {
                interval_secs: interval.unwrap_or_else(|| cfg.poll_interval_secs()),
            },
        ),
    }
}
