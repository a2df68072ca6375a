use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use tokio::signal;
use weather_core::{Config, WeatherService};

use crate::routes;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Current temperature by Brazilian postal code")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        /// Interface to bind, overrides the config file.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overrides the config file.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Interactively store the WeatherAPI key and service URLs.
    Configure,

    /// Print the config file location and effective settings.
    ShowConfig,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { host, port } => serve(host, port).await,
            Command::Configure => configure(),
            Command::ShowConfig => show_config(),
        }
    }
}

fn effective_config() -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    config.apply_process_env()?;
    Ok(config)
}

async fn serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = effective_config()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let service = WeatherService::from_config(&config)?;
    let app = routes::router(service);

    let address = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to address {address}"))?;

    tracing::info!(%address, "weather-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let viacep_url =
        Text::new("ViaCEP base URL:").with_default(&config.viacep.base_url).prompt()?;
    let weatherapi_url =
        Text::new("WeatherAPI base URL:").with_default(&config.weatherapi.base_url).prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.viacep.base_url = viacep_url;
    config.weatherapi.base_url = weatherapi_url;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

fn show_config() -> anyhow::Result<()> {
    let config = effective_config()?;

    println!("config file:  {}", Config::config_file_path()?.display());
    println!("listen:       {}", config.listen_addr());
    println!("viacep:       {}", config.viacep.base_url);
    println!("weatherapi:   {}", config.weatherapi.base_url);
    println!("api key:      {}", mask(config.api_key()));
    match config.http.timeout_secs {
        Some(secs) => println!("timeout:      {secs}s"),
        None => println!("timeout:      transport default"),
    }

    Ok(())
}

fn mask(key: Option<&str>) -> String {
    match key {
        None => "<not set>".to_string(),
        Some(k) if k.chars().count() <= 4 => "****".to_string(),
        Some(k) => {
            let tail: String = k.chars().skip(k.chars().count() - 4).collect();
            format!("****{tail}")
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
