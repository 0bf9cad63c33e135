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

use std::marker::PhantomData;
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;

use nexus_feed::{ChatMessage, ChatReply, ChatRequest, ChatTransport, Fetch, FetchError};
use nexus_feed::{PulseSnapshot, StatusSnapshot};

pub const STATUS_PATH: &str = "/api/systems/status";
pub const PULSE_PATH: &str = "/api/market/pulse";
pub const CHAT_PATH: &str = "/api/chat";

fn transport_error(e: &reqwest::Error) -> FetchError {
    if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}

/// Builds fetchers and transports that share one HTTP client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API at `base_url` (e.g. "http://127.0.0.1:3000")
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetcher for the system status feed
    pub fn status_feed(&self) -> HttpFeed<StatusSnapshot> {
        HttpFeed::new(self.client.clone(), self.url(STATUS_PATH))
    }

    /// Fetcher for the market pulse feed
    pub fn pulse_feed(&self) -> HttpFeed<PulseSnapshot> {
        HttpFeed::new(self.client.clone(), self.url(PULSE_PATH))
    }

    /// Transport for chat sessions
    pub fn chat(&self) -> HttpChat {
        HttpChat {
            client: self.client.clone(),
            url: self.url(CHAT_PATH),
        }
    }
}

/// GETs a JSON snapshot from one URL.
#[derive(Debug, Clone)]
pub struct HttpFeed<T> {
    client: reqwest::Client,
    url: String,
    _snapshot: PhantomData<fn() -> T>,
}

impl<T> HttpFeed<T> {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self {
            client,
            url,
            _snapshot: PhantomData,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl<T> Fetch for HttpFeed<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Output = T;

    async fn fetch(&self) -> Result<T, FetchError> {
        debug!("GET {}", self.url());
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// POSTs chat transcripts to the chat endpoint.
#[derive(Debug, Clone)]
pub struct HttpChat {
    client: reqwest::Client,
    url: String,
}

impl ChatTransport for HttpChat {
    async fn send(&self, messages: &[ChatMessage]) -> Result<ChatReply, FetchError> {
        let request = ChatRequest {
            messages: messages.to_vec(),
        };

        debug!("POST {} ({} turns)", self.url, request.messages.len());
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}
