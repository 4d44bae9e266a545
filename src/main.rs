//! rssnix command line.
//!
//! Loads the configuration, then dispatches one subcommand:
//!
//! * `update` / `refetch` — reset the inbox and sync the named feeds (all
//!   feeds when none are named); `refetch` deletes each feed's articles first.
//! * `add` / `import` — add feeds to the configuration file.
//! * `config` / `open` — hand the config file or a feed directory to an
//!   external program.

use std::io;
use std::path::Path;
use std::process::Command as Process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rssnix::{opml, Config, FeedUpdater, HttpFetcher};

#[derive(Parser, Debug)]
#[command(name = "rssnix", version, about = "Sync RSS and Atom feeds into plain files")]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the config file with $EDITOR
    #[command(visible_alias = "c")]
    Config,

    /// Delete and refetch the given feeds, or all feeds if none are given
    #[command(visible_alias = "r")]
    Refetch { names: Vec<String> },

    /// Update the given feeds, or all feeds if none are given
    #[command(visible_alias = "u")]
    Update { names: Vec<String> },

    /// Open a feed's directory, or the root feed directory, with the viewer
    #[command(visible_alias = "o")]
    Open { name: Option<String> },

    /// Add a feed to the config
    #[command(visible_alias = "a")]
    Add { name: String, url: String },

    /// Import feeds from an OPML file path or URL
    #[command(visible_alias = "i")]
    Import { source: String },

    /// Display the version
    #[command(visible_alias = "v")]
    Version,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    #[cfg(unix)]
    rssnix::store::clear_umask();

    if let Command::Version = cli.command {
        println!("rssnix {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = Config::load().context("load config")?;

    match cli.command {
        Command::Update { names } => sync(config, &names, false).await,
        Command::Refetch { names } => sync(config, &names, true).await,
        Command::Add { name, url } => Ok(config.add_feed(&name, &url)?),
        Command::Import { source } => {
            let text = opml::load(&source).await?;
            let feeds = opml::parse(&text)?;
            opml::import(&mut config, &feeds);
            Ok(())
        }
        Command::Config => {
            let editor = std::env::var("EDITOR").unwrap_or_default();
            if editor.trim().is_empty() {
                bail!("$EDITOR environment variable is not set");
            }
            launch(&editor, &config.path)
        }
        Command::Open { name } => {
            let path = match name {
                Some(name) => config.feed_directory.join(name),
                None => config.feed_directory.clone(),
            };
            launch(&config.viewer, &path)
        }
        Command::Version => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Reset the inbox, then update `names` one by one, or every feed
/// concurrently when `names` is empty.
async fn sync(config: Config, names: &[String], purge: bool) -> Result<()> {
    let fetcher = HttpFetcher::new()?;
    let updater = FeedUpdater::new(Arc::new(config), Arc::new(fetcher));

    updater
        .initialise_new_article_directory()
        .await
        .context("clean new article directory")?;

    if names.is_empty() {
        let results = updater.update_all(purge).await;
        let downloaded: usize = results.iter().map(|r| r.downloaded).sum();
        info!(
            feeds = results.len(),
            configured = updater.config().feeds.len(),
            downloaded,
            "update finished"
        );
        return Ok(());
    }

    for name in names {
        if let Err(e) = updater.update_feed(name, purge).await {
            error!(error = %e, "feed update failed");
        }
    }
    Ok(())
}

/// Run `program path` attached to the terminal and wait for it.
fn launch(program: &str, path: &Path) -> Result<()> {
    let status = Process::new(program)
        .arg(path)
        .status()
        .with_context(|| format!("run {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}
