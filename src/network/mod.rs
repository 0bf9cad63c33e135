//! Network access to the Digital Nexus API.
//!
//! This module provides the reqwest-backed fetchers used by the pollers and
//! the chat transport used by chat sessions.

pub mod http_client;

pub use http_client::ApiClient;
