//! Rocketcache - browse the public rocket catalog and keep your own
//! rockets alongside it.

mod render;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rocketcache_core::{ActiveFilter, ApiClient, Config, FileStore, Rocket, RocketFilter, RocketStore};

#[derive(Debug, Parser)]
#[command(name = "rocketcache", version, about = "Browse and curate the rocket catalog")]
struct Cli {
    /// Catalog API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding locally created rockets
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List rockets matching the given filters
    List(ListArgs),
    /// List the distinct countries in the catalog
    Countries,
    /// Show a single rocket
    Show {
        id: String,
        /// Only look at local data, never the network
        #[arg(long)]
        offline: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Create a local rocket
    Add(AddArgs),
    /// Delete a local rocket
    Remove { id: String },
    /// Print the effective configuration
    Config {
        /// Write it to the config file so later runs pick it up
        #[arg(long)]
        save: bool,
    },
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Case-insensitive substring of the name
    #[arg(long, default_value = "")]
    search: String,
    /// Exact country name
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long, default_value_t = 0.0)]
    cost_min: f64,
    #[arg(long)]
    cost_max: Option<f64>,
    /// all, true or false
    #[arg(long, default_value = "all")]
    active: ActiveFilter,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    fn filter(&self) -> RocketFilter {
        RocketFilter {
            search: self.search.clone(),
            country: self.country.clone(),
            cost_min: self.cost_min,
            cost_max: self.cost_max.unwrap_or(f64::INFINITY),
            active: self.active,
        }
    }
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    country: String,
    /// Cost per launch in dollars
    #[arg(long)]
    cost: f64,
    /// Mark the rocket as retired
    #[arg(long)]
    inactive: bool,
    /// Identifier (generated when omitted)
    #[arg(long)]
    id: Option<String>,
}

impl AddArgs {
    fn into_rocket(self) -> Result<Rocket> {
        if !self.cost.is_finite() || self.cost < 0.0 {
            anyhow::bail!("Cost must be a non-negative number, got {}", self.cost);
        }
        let id = self
            .id
            .unwrap_or_else(|| format!("local-{}", Utc::now().timestamp_millis()));
        Ok(Rocket::new(id, self.name, self.country, self.cost, !self.inactive))
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Config {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            let mut config = Config::default();
            config.apply_env(|name| std::env::var(name).ok());
            config
        }
    };

    if let Some(ref url) = cli.api_url {
        config.api_base_url = Some(url.clone());
    }
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    config
}

fn build_store(config: &Config) -> Result<RocketStore> {
    let api = ApiClient::with_base_url(config.api_base_url())
        .with_context(|| format!("Failed to create API client for {}", config.api_base_url()))?;
    let data_dir = config.data_dir()?;
    let storage = FileStore::new(data_dir).context("Failed to open data directory")?;
    Ok(RocketStore::new(Arc::new(api), Arc::new(storage)))
}

/// Load the combined record set, failing if the remote fetch failed.
async fn load_all(store: &RocketStore) -> Result<()> {
    store.fetch_all().await;
    match store.error() {
        Some(message) => Err(anyhow::anyhow!(message)),
        None => Ok(()),
    }
}

fn show_config(config: &Config, save: bool) -> Result<()> {
    println!("api_base_url = {}", config.api_base_url());
    println!("data_dir = {}", config.data_dir()?.display());
    if save {
        config.save().context("Failed to save config")?;
        println!("Saved");
    }
    Ok(())
}

async fn run(command: Command, store: &RocketStore) -> Result<()> {
    match command {
        Command::List(args) => {
            load_all(store).await?;
            store.set_filter(args.filter());
            let rockets = store.filtered_rockets();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&rockets)?);
            } else {
                print!("{}", render::rocket_table(&rockets));
            }
        }
        Command::Countries => {
            load_all(store).await?;
            for country in store.countries() {
                println!("{}", country);
            }
        }
        Command::Show { id, offline, json } => {
            let rocket = if offline {
                store.get_by_id(&id)
            } else {
                store.fetch_by_id(&id).await
            };
            let rocket = rocket.ok_or_else(|| anyhow::anyhow!("No rocket with id {}", id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rocket)?);
            } else {
                print!("{}", render::rocket_detail(&rocket));
            }
        }
        Command::Add(args) => {
            let rocket = args.into_rocket()?;
            let id = rocket.id.clone();
            store.add(rocket).context("Failed to save rocket")?;
            println!("Added {}", id);
        }
        // Answered in main without building a store
        Command::Config { .. } => {}
        Command::Remove { id } => {
            let known = store.get_by_id(&id).is_some_and(|r| r.is_local);
            store.remove(&id).context("Failed to remove rocket")?;
            if known {
                println!("Removed {}", id);
            } else {
                println!("No local rocket with id {}", id);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli);
    info!(api = config.api_base_url(), "Rocketcache starting");

    if let Command::Config { save } = cli.command {
        return show_config(&config, save);
    }

    let store = build_store(&config)?;
    run(cli.command, &store).await
}
