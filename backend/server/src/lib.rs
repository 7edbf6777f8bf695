//! Documentation of the raw dog food order backend.
//!
//!
//!
//! # General Infrastructure
//! - Order page talks to this server over a small JSON API
//! - Server reads catalogs from, and appends orders to, one Google spreadsheet
//! - Nothing is kept locally, the spreadsheet is the source of truth
//! - Concurrent appends from several customers are left to the Sheets API
//!
//!
//!
//! # API
//!
//! | Method | Path           | Response                                         |
//! |--------|----------------|--------------------------------------------------|
//! | GET    | `/api/recipes` | recipes, 503 if the sheet cannot be read         |
//! | GET    | `/api/packages`| packaging options, 503 if the sheet cannot be read|
//! | POST   | `/api/order`   | `{message}`, 400 on missing fields, 500 on failure|
//! | GET    | `/api/orders`  | raw order rows                                   |
//!
//!
//!
//! # Notes
//!
//! ## Pricing
//! The quote is computed by the order form and sent along with the order. Only the
//! total is stored. See [`kitchen::pricing`].
//!
//! ## Credentials
//! Earlier versions kept one copy of the server per way of loading the service
//! account key. Now there is one server and [`config::CredentialSource`] picks:
//! - `GOOGLE_SERVICE_ACCOUNT_KEY` holding the key JSON
//! - `/run/secrets/GOOGLE_SERVICE_ACCOUNT_KEY`
//! - `GOOGLE_SERVICE_ACCOUNT_FILE`, default `service-account.json`
//!
//!
//!
//! # Setup
//!
//! Run against the spreadsheet.
//! ```sh
//! RUST_LOG=info cargo run --bin food
//! ```
//!
//! Run without Google, orders kept in memory.
//! ```sh
//! STORE=memory RUST_LOG=debug cargo run --bin food
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod catalog;
pub mod config;
pub mod error;
pub mod intake;
pub mod routes;
pub mod sheets;
pub mod state;
pub mod store;

use config::Config;
use routes::{order_handler, orders_handler, packages_handler, recipes_handler};
use state::State;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).context("Failed to set up store")?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/recipes", get(recipes_handler))
        .route("/api/packages", get(packages_handler))
        .route("/api/order", post(order_handler))
        .route("/api/orders", get(orders_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
