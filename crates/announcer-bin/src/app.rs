//! Subcommand implementations.

use crate::console::ConsoleDirectory;
use announcer_config_and_utils::{format_namespaces, Config, Paths};
use anyhow::Context;
use change_announcer::{ChangeAnnouncer, Destination};
use change_feed_client::ChangeFeedClient;
use std::sync::Arc;
use tracing::{info, warn};
use watermark_store::{FileWatermarkStore, WatermarkStore};

/// Watermark file for the configured feed.
fn watermark_store(config: &Config, paths: &Paths) -> anyhow::Result<FileWatermarkStore> {
    let feed_key = config.feed.feed_key()?;
    Ok(FileWatermarkStore::for_feed(&paths.state_dir(), &feed_key))
}

/// Wire the engine to the HTTP client, console destinations and file store.
pub fn build_announcer(config: &Config, paths: &Paths) -> anyhow::Result<ChangeAnnouncer> {
    paths.ensure_dirs()?;

    let client = ChangeFeedClient::new(&config.feed.base_endpoint, config.feed.fetch_timeout())
        .context("Failed to create change feed client")?;
    info!(api_url = %client.api_url(), "Using change feed");

    let directory = ConsoleDirectory::new(
        paths.config_file(),
        config.destinations.iter().map(Destination::from).collect(),
    );
    let store = watermark_store(config, paths)?;

    let announcer = ChangeAnnouncer::new(
        config.feed.clone(),
        Arc::new(client),
        Arc::new(directory),
        Arc::new(store),
    )?;
    Ok(announcer)
}

/// Run the schedule until Ctrl-C.
pub async fn run(config: Config, paths: Paths) -> anyhow::Result<()> {
    let announcer = build_announcer(&config, &paths)?;

    if !config.destinations.iter().any(|d| d.announce) {
        warn!("No destination has announce enabled; changes will only advance the watermark");
    }

    announcer.start()?;
    info!(
        watermark = announcer.watermark().value(),
        wait_period_secs = config.feed.wait_period_secs,
        "rc-announcer running, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Received shutdown signal, stopping...");

    announcer.stop().await;
    Ok(())
}

/// Print what the next cycle would announce, without consuming it.
///
/// Fetch failures are printed as the result rather than returned.
pub async fn changes(config: Config, paths: Paths) -> anyhow::Result<()> {
    let announcer = build_announcer(&config, &paths)?;

    match announcer.trigger_manual_fetch().await {
        Ok(lines) => {
            if lines.is_empty() {
                println!("No new changes.");
            }
            for line in lines {
                println!("{}", line);
            }
        }
        Err(err) => println!("{}", err),
    }
    Ok(())
}

/// Zero the persisted watermark.
///
/// Run this while no `run` process is active for the same feed: a running
/// announcer keeps its in-memory watermark and rewrites the file on its
/// next announcement.
pub fn reset(config: Config, paths: Paths) -> anyhow::Result<()> {
    let announcer = build_announcer(&config, &paths)?;
    let previous = announcer.watermark();

    announcer
        .reset_watermark()
        .context("Failed to reset watermark")?;

    println!("Watermark reset (was {}).", previous);
    Ok(())
}

/// Print the configuration and persisted watermark.
pub fn status(config: Config, paths: Paths) -> anyhow::Result<()> {
    let store = watermark_store(&config, &paths)?;
    let feed = &config.feed;

    println!("Endpoint:     {}", feed.base_endpoint);
    println!("Page URL:     {}", feed.page_url_template);
    println!("Namespaces:   {}", format_namespaces(&feed.namespaces));
    println!("Show minor:   {}", feed.show_minor);
    println!("Limit:        {}", feed.limit);
    println!("Wait period:  {}s", feed.wait_period_secs);
    println!("Watermark:    {}", store.load());
    println!("State file:   {}", store.path().display());

    if config.destinations.is_empty() {
        println!("Destinations: none");
    } else {
        println!("Destinations:");
        for destination in &config.destinations {
            let state = if destination.announce { "announce" } else { "silent" };
            println!("  {} ({})", destination.name, state);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use announcer_config_and_utils::DestinationConfig;
    use tempfile::TempDir;
    use watermark_store::Watermark;

    #[test]
    fn build_announcer_loads_existing_watermark() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        let config = Config::default();
        paths.ensure_dirs().unwrap();
        watermark_store(&config, &paths)
            .unwrap()
            .save(Watermark::new(1_356_998_400))
            .unwrap();

        let announcer = build_announcer(&config, &paths).unwrap();

        assert_eq!(announcer.watermark(), Watermark::new(1_356_998_400));
    }

    #[test]
    fn reset_zeroes_the_state_file() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        let config = Config {
            destinations: vec![DestinationConfig {
                name: "#wiki".to_string(),
                announce: true,
            }],
            ..Config::default()
        };
        paths.ensure_dirs().unwrap();
        let store = watermark_store(&config, &paths).unwrap();
        store.save(Watermark::new(42)).unwrap();

        reset(config.clone(), paths.clone()).unwrap();

        assert_eq!(store.load(), Watermark::ZERO);
        status(config, paths).unwrap();
    }

    #[test]
    fn state_file_is_keyed_by_feed() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let store = watermark_store(&Config::default(), &paths).unwrap();

        assert_eq!(
            store.path(),
            paths.state_dir().join("watermark-en.wikipedia.org_w")
        );
    }
}
