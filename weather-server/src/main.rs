//! Binary crate for the `weather-server` HTTP service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Serving `GET /weather?cep=...` over axum

use clap::Parser;

mod cli;
mod routes;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing("info");

    let cmd = cli::Cli::parse();
    cmd.run().await
}
