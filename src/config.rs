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

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format.
//! It covers the server bind address, the URL the consumers poll, the poll
//! intervals and the simulated response delays.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const APP_NAME: &str = "digital-nexus";
const CONFIG_NAME: &str = "config";

/// Default address the API server binds to
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Default base URL the consumers talk to
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Address the API server listens on (host:port)
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Base URL of the API server for `watch` and `chat`
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// System status refresh interval in seconds
    #[serde(default = "default_status_poll_secs")]
    pub status_poll_secs: u64,

    /// Market pulse refresh interval in seconds
    #[serde(default = "default_pulse_poll_secs")]
    pub pulse_poll_secs: u64,

    /// Simulated "thinking" delay of the chat endpoint in milliseconds
    #[serde(default = "default_chat_delay_ms")]
    pub chat_delay_ms: u64,

    /// Simulated delivery delay of the contact endpoint in milliseconds
    #[serde(default = "default_contact_delay_ms")]
    pub contact_delay_ms: u64,

    /// HTTP client request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_status_poll_secs() -> u64 {
    10
}

fn default_pulse_poll_secs() -> u64 {
    30
}

fn default_chat_delay_ms() -> u64 {
    1500
}

fn default_contact_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            bind_address: default_bind_address(),
            server_url: default_server_url(),
            status_poll_secs: default_status_poll_secs(),
            pulse_poll_secs: default_pulse_poll_secs(),
            chat_delay_ms: default_chat_delay_ms(),
            contact_delay_ms: default_contact_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating it with defaults if missing
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_secs(self.status_poll_secs.max(1))
    }

    pub fn pulse_poll_interval(&self) -> Duration {
        Duration::from_secs(self.pulse_poll_secs.max(1))
    }

    pub fn chat_delay(&self) -> Duration {
        Duration::from_millis(self.chat_delay_ms)
    }

    pub fn contact_delay(&self) -> Duration {
        Duration::from_millis(self.contact_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_feed_intervals() {
        let config = AppConfig::default();
        assert_eq!(config.status_poll_interval(), nexus_feed::poller::STATUS_POLL_INTERVAL);
        assert_eq!(config.pulse_poll_interval(), nexus_feed::poller::PULSE_POLL_INTERVAL);
        assert_eq!(config.chat_delay(), nexus_feed::chat::THINKING_DELAY);
        assert_eq!(config.contact_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "bind_address": "0.0.0.0:8080" }"#).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.status_poll_secs, 10);
    }

    #[test]
    fn test_zero_intervals_are_clamped() {
        let config = AppConfig {
            status_poll_secs: 0,
            pulse_poll_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.status_poll_interval(), Duration::from_secs(1));
        assert_eq!(config.pulse_poll_interval(), Duration::from_secs(1));
    }
}
