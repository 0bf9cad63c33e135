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

//! Client-side chat session.
//!
//! Keeps the transcript, forwards it to the responder through a
//! [`ChatTransport`], and turns reply actions into [`NexusEvent`]s.

use std::future::Future;
use std::time::Duration;

use log::{error, info};
use tokio::time::Instant;

use super::{ChatAction, ChatMessage, ChatReply};
use crate::events::{EventBus, NexusEvent};
use crate::poller::FetchError;

/// How long a reply's action stays active after it arrives.
pub const ACTION_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Assistant message appended when the responder cannot be reached.
pub const TRANSPORT_FAILURE_REPLY: &str = "Neural synchronization failed. Please reconnect.";

/// Carries a transcript to the responder and returns its reply.
pub trait ChatTransport: Send + Sync {
    fn send(
        &self,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<ChatReply, FetchError>> + Send;
}

/// One conversation with the responder.
pub struct ChatSession<T> {
    transport: T,
    transcript: Vec<ChatMessage>,
    events: EventBus,
    last_action: Option<(ChatAction, Instant)>,
}

impl<T> std::fmt::Debug for ChatSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("turns", &self.transcript.len())
            .field("last_action", &self.last_action)
            .finish_non_exhaustive()
    }
}

impl<T: ChatTransport> ChatSession<T> {
    pub fn new(transport: T, events: EventBus) -> Self {
        Self {
            transport,
            transcript: Vec::new(),
            events,
            last_action: None,
        }
    }

    /// Full transcript so far.
    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Action of the latest reply, while it is still within its display window.
    #[must_use]
    pub fn active_action(&self) -> Option<ChatAction> {
        self.last_action
            .filter(|(_, at)| at.elapsed() < ACTION_DISPLAY_DURATION)
            .map(|(action, _)| action)
    }

    /// Send one user utterance.
    ///
    /// Blank input is ignored. Returns the assistant message appended to the
    /// transcript, which on transport failure is [`TRANSPORT_FAILURE_REPLY`].
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(text));

        match self.transport.send(&self.transcript).await {
            Ok(reply) => {
                if reply.content.is_empty() {
                    return None;
                }
                self.transcript.push(ChatMessage::assistant(reply.content.clone()));
                self.apply_action(&reply);
            }
            Err(e) => {
                error!("Chat request failed: {}", e);
                self.transcript.push(ChatMessage::assistant(TRANSPORT_FAILURE_REPLY));
            }
        }

        self.transcript.last()
    }

    fn apply_action(&mut self, reply: &ChatReply) {
        let Some(action) = reply.action else {
            return;
        };

        info!("Chat reply carried action {:?}", action);
        self.last_action = Some((action, Instant::now()));

        let event = match action {
            ChatAction::HighlightProject => match reply.project_id {
                Some(project_id) => NexusEvent::HighlightProject { project_id },
                None => return,
            },
            ChatAction::GenerateReport => NexusEvent::ReportRequested,
            ChatAction::ToggleSafeMode => NexusEvent::SafeModeToggled,
        };
        self.events.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{respond, Role};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers in-process with the keyword responder.
    struct Local {
        calls: AtomicUsize,
    }

    impl Local {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ChatTransport for Local {
        async fn send(&self, messages: &[ChatMessage]) -> Result<ChatReply, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            respond(messages).map_err(|e| FetchError::Decode(e.to_string()))
        }
    }

    struct Unreachable;

    impl ChatTransport for Unreachable {
        async fn send(&self, _messages: &[ChatMessage]) -> Result<ChatReply, FetchError> {
            Err(FetchError::Transport("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_highlight_reply_broadcasts_project() {
        let bus = EventBus::default();
        let mut events = bus.subscribe();
        let mut session = ChatSession::new(Local::new(), bus);

        let reply = session.send("Show me ISDN").await.unwrap();
        assert_eq!(reply.role, Role::Assistant);

        assert_eq!(events.try_recv().unwrap(), NexusEvent::HighlightProject { project_id: 1 });
        assert!(events.try_recv().is_err());
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_other_actions_publish_their_events() {
        let bus = EventBus::default();
        let mut events = bus.subscribe();
        let mut session = ChatSession::new(Local::new(), bus);

        session.send("please generate report").await;
        session.send("emergency stop now").await;
        session.send("hello there").await;

        assert_eq!(events.try_recv().unwrap(), NexusEvent::ReportRequested);
        assert_eq!(events.try_recv().unwrap(), NexusEvent::SafeModeToggled);
        assert!(events.try_recv().is_err());
        assert_eq!(session.transcript().len(), 6);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let transport = Local::new();
        let mut session = ChatSession::new(transport, EventBus::default());

        assert!(session.send("   ").await.is_none());
        assert!(session.transcript().is_empty());
        assert_eq!(session.transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_appends_canned_reply() {
        let bus = EventBus::default();
        let mut events = bus.subscribe();
        let mut session = ChatSession::new(Unreachable, bus);

        let reply = session.send("isdn").await.unwrap();
        assert_eq!(reply.content, TRANSPORT_FAILURE_REPLY);
        assert!(events.try_recv().is_err());
        assert!(session.active_action().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_lapses_after_display_window() {
        let mut session = ChatSession::new(Local::new(), EventBus::default());
        session.send("safe mode").await;
        assert_eq!(session.active_action(), Some(ChatAction::ToggleSafeMode));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(session.active_action(), Some(ChatAction::ToggleSafeMode));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(session.active_action().is_none());
    }
}
