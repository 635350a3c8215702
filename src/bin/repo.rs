// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use repo_sync::{store::SettingsStore, sync::sync_golangci_lint};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "repo [options] <command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Path to settings store instead of the default `$HOME/.repo`.
    #[arg(long, global = true, value_name = "path")]
    pub settings_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let store = match self.settings_dir {
            Some(path) => SettingsStore::new(path),
            None => SettingsStore::locate()?,
        };

        match self.command {
            Command::Init => run_init(&store),
            Command::Add(opts) => run_add(&store, opts),
            Command::List => run_list(&store),
            Command::Sync(opts) => run_sync(&store, opts),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Initialize settings store.
    #[command(override_usage = "repo init [options]")]
    Init,

    /// Register repository checkouts for sync operations.
    #[command(override_usage = "repo add [options] <path>...")]
    Add(AddOptions),

    /// List registered repository checkouts.
    #[command(override_usage = "repo list [options]")]
    List,

    /// Sync shared configuration to registered repositories.
    #[command(override_usage = "repo sync <target>")]
    Sync(SyncOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct AddOptions {
    /// Paths to repository checkouts.
    #[arg(required = true, value_name = "path")]
    pub paths: Vec<PathBuf>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct SyncOptions {
    #[command(subcommand)]
    pub target: SyncTarget,
}

#[derive(Debug, Clone, Subcommand)]
enum SyncTarget {
    /// Sync golangci-lint configuration.
    #[command(name = "golangci-lint")]
    GolangciLint,
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn run_init(store: &SettingsStore) -> Result<()> {
    store
        .initialize()
        .context("cannot initialize settings store")?;
    info!("settings store ready at {:?}", store.path().display());

    Ok(())
}

fn run_add(store: &SettingsStore, opts: AddOptions) -> Result<()> {
    let added = store
        .add_repos(opts.paths)
        .context("cannot register repositories")?;
    info!("registered {} new repositories", added.len());

    Ok(())
}

fn run_list(store: &SettingsStore) -> Result<()> {
    let settings = store.read().context("cannot read settings")?;
    for repo in settings.repos {
        println!("{}", repo.expand()?.display());
    }

    Ok(())
}

fn run_sync(store: &SettingsStore, opts: SyncOptions) -> Result<()> {
    match opts.target {
        SyncTarget::GolangciLint => {
            let outcomes =
                sync_golangci_lint(store).context("cannot sync golangci-lint configuration")?;
            info!("synced {} repositories", outcomes.len());
        }
    }

    Ok(())
}
