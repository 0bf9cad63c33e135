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

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use log::info;
use serde_json::{json, Value};

use nexus_feed::generator::{Generator, PulseGenerator, StatusGenerator};
use nexus_feed::{contact, respond, ChatReply, ChatRequest, PulseSnapshot, StatusSnapshot};

use super::error::ApiError;
use super::AppState;

pub const CONTACT_ACK_MESSAGE: &str = "Thank you for your message. I'll get back to you soon!";

/// GET /api/systems/status
pub async fn system_status() -> Json<StatusSnapshot> {
    Json(StatusGenerator::new().generate(&mut rand::thread_rng(), Utc::now()))
}

/// GET /api/market/pulse
pub async fn market_pulse() -> Json<PulseSnapshot> {
    Json(PulseGenerator::new().generate(&mut rand::thread_rng(), Utc::now()))
}

/// POST /api/chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let reply = respond(&request.messages).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    // Simulated thinking time
    tokio::time::sleep(state.chat_delay).await;

    Ok(Json(reply))
}

/// POST /api/contact
pub async fn contact(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let payload: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::Internal(format!("unreadable contact body: {e}")))?;
    let form = contact::validate(&payload).map_err(ApiError::Validation)?;

    info!(
        "Contact submission received from {} <{}> about {}",
        form.name,
        form.email,
        form.project_type.label()
    );

    // Simulated delivery latency
    tokio::time::sleep(state.contact_delay).await;

    Ok(Json(json!({ "message": CONTACT_ACK_MESSAGE })))
}
