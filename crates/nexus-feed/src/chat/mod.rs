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

//! Keyword-matched chat responder.
//!
//! Only the last turn of the transcript is looked at. Its lower-cased text
//! is tested against [`KEYWORD_GROUPS`] in order and the first group with a
//! matching substring supplies the reply. There is no memory beyond that
//! single turn.

mod session;

pub use session::{ChatSession, ChatTransport, ACTION_DISPLAY_DURATION, TRANSPORT_FAILURE_REPLY};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default artificial "thinking" delay applied before a reply is returned.
pub const THINKING_DELAY: Duration = Duration::from_millis(1500);

/// Reply used when no keyword group matches.
pub const FALLBACK_REPLY: &str = "I'm analyzing your request within the context of Sarangan's ecosystem. How can I assist you further?";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("transcript contains no messages")]
    EmptyTranscript,
}

/// Speaker of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One transcript turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// UI directive attached to a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatAction {
    GenerateReport,
    ToggleSafeMode,
    HighlightProject,
}

/// Request body of the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Response body of the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub action: Option<ChatAction>,
    #[serde(default)]
    pub project_id: Option<u32>,
}

/// A set of trigger substrings mapped to one canned reply.
#[derive(Debug)]
pub struct KeywordGroup {
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
    pub action: Option<ChatAction>,
    pub project_id: Option<u32>,
}

impl KeywordGroup {
    /// Check whether any keyword occurs in already lower-cased text
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }

    fn to_reply(&self) -> ChatReply {
        ChatReply {
            role: Role::Assistant,
            content: self.reply.to_string(),
            action: self.action,
            project_id: self.project_id,
        }
    }
}

/// Keyword groups in priority order. The first match wins.
pub static KEYWORD_GROUPS: [KeywordGroup; 6] = [
    KeywordGroup {
        keywords: &["generate report", "download metrics"],
        reply: "Direct Action Initialized: Generating an architectural integrity report for ISDN Logistics Core. Transmitting data packets now...",
        action: Some(ChatAction::GenerateReport),
        project_id: None,
    },
    KeywordGroup {
        keywords: &["safe mode", "emergency stop"],
        reply: "Emergency Protocol Delta: Transitioning all system nodes to Safe Mode. Visual synchronization will now minimize.",
        action: Some(ChatAction::ToggleSafeMode),
        project_id: None,
    },
    KeywordGroup {
        keywords: &["isdn", "logistics"],
        reply: "Accessing ISDN Architecture. This project focuses on high-performance supply chain management. I've highlighted the relevant node in your Neural Lab.",
        action: Some(ChatAction::HighlightProject),
        project_id: Some(1),
    },
    KeywordGroup {
        keywords: &["nexus", "rdc"],
        reply: "Retrieving RDC Nexus data. This core handles real-time global stock synchronization. Node alignment initialized.",
        action: Some(ChatAction::HighlightProject),
        project_id: Some(2),
    },
    KeywordGroup {
        keywords: &["neural lab", "graph"],
        reply: "You are currently within the Neural Lab. It is an experimental space for immersive 3D visualizations and agent collaboration.",
        action: Some(ChatAction::HighlightProject),
        project_id: Some(3),
    },
    KeywordGroup {
        keywords: &["sarangan", "who are you"],
        reply: "Hello, I am Sarangan. Your strategic digital intelligence. I navigate the architecture built by Raviraj to assist you in real-time.",
        action: None,
        project_id: None,
    },
];

/// Find the first keyword group matching an utterance.
#[must_use]
pub fn match_group(utterance: &str) -> Option<&'static KeywordGroup> {
    let lowered = utterance.to_lowercase();
    KEYWORD_GROUPS.iter().find(|group| group.matches(&lowered))
}

/// Produce the reply for a transcript.
///
/// Only the final turn is inspected, whatever its role.
pub fn respond(messages: &[ChatMessage]) -> Result<ChatReply, ChatError> {
    let last = messages.last().ok_or(ChatError::EmptyTranscript)?;

    Ok(match match_group(&last.content) {
        Some(group) => group.to_reply(),
        None => ChatReply {
            role: Role::Assistant,
            content: FALLBACK_REPLY.to_string(),
            action: None,
            project_id: None,
        },
    })
}
