use std::net::IpAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::*;

use tally_cli::{commands, init_tracing, run_server, ServerConfig};
use tally_config::IngestionSettings;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Tally - analytics backend for warehouse sources and tags")]
#[command(version)]
struct Cli {
    /// SQLite database file (overrides TALLY_DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        #[arg(long, help = "Port to listen on (overrides TALLY_API_PORT)")]
        port: Option<u16>,
        #[arg(long, help = "Address to bind (overrides TALLY_API_HOST)")]
        host: Option<IpAddr>,
    },
    /// Apply pending database migrations
    Migrate,
    /// Print the ingestion settings resolved from the environment
    Settings,
    /// Create an organization, team and owner with an API key
    Bootstrap {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "Admin")]
        name: String,
        #[arg(long, default_value = "Default organization")]
        organization: String,
        #[arg(long, default_value = "Default team")]
        team: String,
    },
    /// Issue a personal API key for a user
    CreateApiKey {
        #[arg(long)]
        user_id: String,
        #[arg(long, default_value = "cli")]
        label: String,
    },
    /// Show which partition key consecutive events for a distinct id would get
    RouteKey {
        #[arg(long)]
        team_id: i64,
        #[arg(long)]
        distinct_id: String,
        #[arg(long, default_value_t = 1)]
        events: usize,
    },
    /// Check whether a session replay payload of the given size would be accepted
    CheckReplay {
        #[arg(long, help = "Payload size in bytes")]
        size: usize,
        #[arg(long, help = "Use the deprecated v1 storage path")]
        v1: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env()?;
    if cli.database.is_some() {
        config.database_path = cli.database;
    }

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            run_server(config).await?;
        }
        Commands::Migrate => {
            // Connecting applies migrations
            tally_storage::connect(config.database_path).await?;
            println!("{} Database is up to date", "✓".green());
        }
        Commands::Settings => {
            let settings = IngestionSettings::from_env();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Commands::Bootstrap {
            email,
            name,
            organization,
            team,
        } => {
            let pool = tally_storage::connect(config.database_path).await?;
            let output = commands::bootstrap(&pool, &organization, &team, &email, &name).await?;

            println!("{} Created organization {}", "✓".green(), output.organization_id);
            println!("  team id: {}", output.team_id);
            println!("  user id: {}", output.user_id);
            println!("  api key: {}", output.api_key.bold());
            println!("{}", "Store the API key now; it cannot be shown again.".yellow());
        }
        Commands::CreateApiKey { user_id, label } => {
            let pool = tally_storage::connect(config.database_path).await?;
            let key = commands::create_api_key(&pool, &user_id, &label).await?;

            println!("{} {}", "API key:".green(), key.bold());
            println!("{}", "Store the API key now; it cannot be shown again.".yellow());
        }
        Commands::RouteKey {
            team_id,
            distinct_id,
            events,
        } => {
            let settings = Arc::new(IngestionSettings::from_env());
            for (i, key) in commands::route_events(settings, team_id, &distinct_id, events)
                .into_iter()
                .enumerate()
            {
                match key {
                    Some(key) => println!("event {}: {}", i + 1, key),
                    None => println!("event {}: {}", i + 1, "random partition".yellow()),
                }
            }
        }
        Commands::CheckReplay { size, v1 } => {
            let settings = Arc::new(IngestionSettings::from_env());
            commands::check_replay_event(settings, size, v1)?;
            println!("{} Replay event of {} bytes accepted", "✓".green(), size);
        }
    }

    Ok(())
}
