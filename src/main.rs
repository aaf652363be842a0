use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deck_stats::config::AppConfig;
use deck_stats::parse_name_list;
use deck_stats::store::{create_schema, MatchStore, SqliteStore, StoreConfig};
use deck_stats::DeckStatsResolver;

#[derive(Parser)]
#[command(name = "deck-stats")]
#[command(about = "Deck statistics from historical match data")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Match database path (overrides the config file)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute statistics for a deck
    Stats {
        /// Eight comma-separated card names
        #[arg(long)]
        deck: String,

        /// Statistic to compute ("Win Rate", "Elixir Cost",
        /// "Average Trophy Count", "Number of Wins"); repeatable
        #[arg(long = "stat", value_delimiter = ',')]
        stats: Vec<String>,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// List the card catalog
    Cards,

    /// Create the database schema
    Init,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(db) = cli.db {
        config.store.path = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate()?;

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting deck-stats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Stats {
            deck,
            stats,
            pretty,
        } => {
            let deck = parse_name_list(&deck);
            let stats: Vec<String> = stats
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

            let resolver = DeckStatsResolver::connect(&config.store, &deck, &stats)
                .context("Failed to connect to match store")?;

            if resolver.results().is_error() {
                tracing::warn!("Request rejected: {:?}", resolver.outcome());
            }

            let output = if pretty {
                serde_json::to_string_pretty(resolver.results())?
            } else {
                serde_json::to_string(resolver.results())?
            };
            println!("{}", output);
        }

        Commands::Cards => {
            let store = SqliteStore::open(&config.store).context("Failed to open match store")?;
            for card in store.cards()? {
                println!("{}\t{}\t{}", card.id, card.name, card.elixir_cost);
            }
        }

        Commands::Init => {
            let path = &config.store.path;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let store = SqliteStore::open(&StoreConfig {
                path: path.clone(),
                read_only: false,
            })
            .context("Failed to open match store for writing")?;
            create_schema(store.connection())?;
            tracing::info!("Initialized schema at {:?}", path);
        }
    }

    Ok(())
}
