use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use club_manager::api::{build_router, state::AppState};
use club_manager::calculate::compute_club_stats;
use club_manager::config::AppConfig;
use club_manager::models::NewMember;
use club_manager::storage::{ClubStore, StorageConfig};

#[derive(Parser)]
#[command(name = "club-manager")]
#[command(about = "Soccer club roster, schedule and match statistics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

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
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the club statistics report as JSON
    Stats {
        /// Reference date for ages (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Length of the ranking lists
        #[arg(long)]
        top: Option<usize>,
    },

    /// Bulk import members from a JSON array file
    ImportMembers {
        /// Path to a JSON file holding an array of members
        #[arg(long)]
        file: PathBuf,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {:?}", cli.config))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting club-manager v{}", env!("CARGO_PKG_VERSION"));

    let store = ClubStore::open(StorageConfig::new(config.data_dir.clone()))
        .context("opening record store")?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            if config.server.admin_token.is_none() {
                tracing::warn!("No admin_token configured; destructive endpoints are open");
            }

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let app = build_router(AppState::new(store, config));
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Stats { as_of, top } => {
            let today = as_of.unwrap_or_else(|| Local::now().date_naive());
            let limit = top.unwrap_or(config.stats.top_n);
            let snapshot = store.snapshot()?;
            if snapshot.is_empty() {
                tracing::warn!("No records under {:?}", config.data_dir);
            }
            let report = compute_club_stats(&snapshot, today, limit);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::ImportMembers { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {:?}", file))?;
            let drafts: Vec<NewMember> = serde_json::from_str(&contents)
                .with_context(|| format!("parsing members from {:?}", file))?;
            let received = drafts.len();
            let created = store.import_members(drafts)?;
            println!(
                "Imported {} of {} members ({} duplicates skipped)",
                created,
                received,
                received - created
            );
        }
    }

    Ok(())
}
