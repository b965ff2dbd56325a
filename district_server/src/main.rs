// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `district_server` binary.

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser as _;
use district_server::{AppState, Config, telemetry};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    telemetry::init(config.log_format)?;

    let lookup = Arc::new(config.lookup().context("failed to load resolution policy")?);
    tracing::info!(
        chambers = ?lookup.chambers(),
        failure_policy = ?config.failure_policy(),
        "district lookup configured"
    );

    if config.preload {
        let preload = Arc::clone(&lookup);
        tokio::task::spawn_blocking(move || preload.preload())
            .await?
            .context("failed to preload boundary layers")?;
    }

    let app = district_server::app(AppState::new(lookup), &config.allowed_origins);
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind))?;
    tracing::info!(bind = %config.bind, "district server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("failed to serve")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
