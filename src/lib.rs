//! Centime is a personal finance ledger served as a JSON REST API.
//!
//! Users register and log in to record income and expense transactions,
//! file them under a shared category catalog, list and filter them, and
//! query a statement of their running balance. Every transaction belongs to
//! exactly one user, and the API never reveals or touches another user's
//! rows.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

pub mod auth;
pub mod db;
pub mod models;
pub mod routes;
pub mod stores;

mod error;
mod state;

pub use db::initialize;
pub use error::Error;
pub use routes::build_router;
pub use state::{AppState, AuthState, CategoryState, LedgerState, SessionState, UserState};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
