// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP API for the simulated feeds.
//!
//! Every handler is stateless apart from the configured response delays:
//! snapshots are drawn fresh per request and nothing is shared between
//! requests.

pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use log::info;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

/// Per-server settings shared by the handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Delay before a chat reply is returned.
    pub chat_delay: Duration,
    /// Delay before a contact submission is acknowledged.
    pub contact_delay: Duration,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chat_delay: config.chat_delay(),
            contact_delay: config.contact_delay(),
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/systems/status", get(routes::system_status))
        .route("/api/market/pulse", get(routes::market_pulse))
        .route("/api/chat", post(routes::chat))
        .route("/api/contact", post(routes::contact))
        .with_state(Arc::new(state))
}

/// Bind and serve until the token is cancelled.
pub async fn serve(
    bind_address: &str,
    state: AppState,
    cancel_token: CancellationToken,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_address).await?;
    info!("Digital Nexus API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("Shutting down API server");
        })
        .await
}
