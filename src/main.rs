//! This project is split in 4 main modules:
//!
//! - [store] (JSON API used by the storefront pages)
//! - [gateway] (Tripay payment gateway integration)
//! - [notify] (chat webhook notifications)
//! - [status] (game server status polling)
#![doc = include_str!("../README.md")]

use std::{
    net::{Ipv4Addr, SocketAddrV4},
    sync::Arc,
};

use anyhow::Context;
use axum::Router;
use tracing_subscriber::EnvFilter;

mod catalog;
mod checkout;
mod config;
/// Payment gateway integration
///
/// This module defines the types and methods to communicate with the external gateway.
/// In this case it is Tripay
mod gateway;
mod notify;
mod state;
mod status;
/// Storefront API surface
mod store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .init();

    match dotenvy::dotenv() {
        Ok(p) => tracing::info!(path = %p.display(), "Loaded environment variables from .env file"),
        Err(e) => tracing::warn!("Failed to load environment variables from .env: {e}"),
    };
    let config = config::Config::from_env().context("invalid configuration")?;
    tracing::info!(
        environment = ?config.environment,
        gateway = %config.gateway.base_url,
        webhook = config.webhook_url.is_some(),
        "Loaded configuration"
    );

    let poller = status::spawn(
        status::StatusClient::new(&config.status),
        status::POLL_INTERVAL,
    );
    let notifier = notify::WebhookNotifier::new(config.webhook_url.clone(), &config.store_name);
    let state = state::AppState::new(
        gateway::TripayGateway::new(&config.gateway),
        checkout::CheckoutSettings::from(&config),
        Arc::new(notifier),
        poller.subscribe(),
    );

    let app = Router::new()
        .merge(store::api::router())
        .nest("/gateway", gateway::api::router())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state);

    let listener =
        tokio::net::TcpListener::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.port))
            .await
            .with_context(|| format!("failed to bind port {}", config.port))?;

    tracing::info!("Serving on port {}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    drop(poller);
    Ok(())
}
