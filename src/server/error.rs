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

//! Error responses of the API.
//!
//! Internal detail is logged here and never written to a response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

use nexus_feed::ValidationErrors;

pub const CHAT_FAILURE_MESSAGE: &str = "Failed to process request";
pub const INVALID_FORM_MESSAGE: &str = "Invalid form data";
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Chat request that could not be answered.
    #[error("bad chat request: {0}")]
    BadRequest(String),

    /// Contact submission that failed field validation.
    #[error("invalid form data: {0}")]
    Validation(ValidationErrors),

    /// Anything unexpected.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(detail) => {
                warn!("Rejected chat request: {}", detail);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": CHAT_FAILURE_MESSAGE })),
                )
                    .into_response()
            }
            ApiError::Validation(errors) => {
                warn!("Rejected contact submission: {}", errors);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": INVALID_FORM_MESSAGE, "details": errors })),
                )
                    .into_response()
            }
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": GENERIC_FAILURE_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}
