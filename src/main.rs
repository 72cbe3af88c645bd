// src/main.rs
// EstateOS AI backend

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use estateos::config::EnvConfig;
use estateos::web;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "estateos")]
#[command(about = "Intent-routed real estate assistant backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind
        #[arg(long, env = "ESTATEOS_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "ESTATEOS_PORT", default_value = "8000")]
        port: u16,
    },

    /// Validate the environment configuration and exit
    CheckConfig,
}

async fn run_server(host: &str, port: u16) -> Result<()> {
    let config = EnvConfig::load();
    let validation = config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        for err in &validation.errors {
            error!("{}", err);
        }
        bail!("invalid configuration:\n{}", validation.report());
    }

    info!(
        providers = %config.api_keys.summary(),
        output_dir = %config.output_dir.display(),
        "Configuration loaded"
    );

    let state = web::state::AppState::from_config(config)?;
    let app = web::create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("EstateOS backend listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn check_config() -> Result<()> {
    let config = EnvConfig::load();
    let validation = config.validate();

    println!("{}", validation.report());
    println!("Providers: {}", config.api_keys.summary());

    if !validation.is_valid() {
        bail!("configuration has {} error(s)", validation.errors.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None => {
            let host = std::env::var("ESTATEOS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
            let port = std::env::var("ESTATEOS_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000);
            run_server(&host, port).await?
        }
        Some(Commands::Serve { host, port }) => run_server(&host, port).await?,
        Some(Commands::CheckConfig) => check_config()?,
    }

    Ok(())
}
