//! rc-announcer: announces new wiki changes to console destinations.
//!
//! Usage: rc-announcer [--log-level <level>] [--base-dir <dir>] [run|changes|reset|status]

mod app;
mod console;

use std::path::PathBuf;

use announcer_config_and_utils::{init_logging, Config, Paths};
use clap::{Parser, Subcommand};

/// Recent changes announcer command-line interface.
#[derive(Parser, Debug)]
#[command(name = "rc-announcer")]
#[command(about = "Announce new wiki changes exactly once")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for config, state and logs. Defaults to ~/.rc-announcer
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Poll the feed and announce new changes until Ctrl-C
    Run,
    /// Show the changes that would be announced next, without consuming them
    Changes,
    /// Forget announced changes by zeroing the watermark
    Reset,
    /// Show configuration and persisted watermark
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let config = Config::load(&paths)?;

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level.clone());
    init_logging(&log_level, &paths);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => app::run(config, paths).await?,
        Commands::Changes => app::changes(config, paths).await?,
        Commands::Reset => app::reset(config, paths)?,
        Commands::Status => app::status(config, paths)?,
    }

    Ok(())
}
