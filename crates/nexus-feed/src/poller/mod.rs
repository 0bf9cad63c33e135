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

//! Interval poller for snapshot feeds.
//!
//! A [`Poller`] owns one background task that fetches a snapshot right away
//! and then once per interval tick, publishing the result as a [`FeedView`]
//! over a watch channel. Dropping the handle (or calling
//! [`Poller::shutdown`]) cancels the task; no fetch is started afterwards.
//!
//! The task runs on tokio's clock, so tests can drive it with a paused
//! runtime and `tokio::time::advance`.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Refresh interval of the system status feed.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Refresh interval of the market pulse feed.
pub const PULSE_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Errors a fetcher can report. All of them are treated as transient.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Source of snapshots for a poller.
///
/// Implement this for each transport (HTTP, in-process generator, test stub).
pub trait Fetch: Send + Sync + 'static {
    /// The snapshot type returned by this source.
    type Output: Clone + Send + Sync + 'static;

    /// Fetch one snapshot.
    fn fetch(&self) -> impl Future<Output = Result<Self::Output, FetchError>> + Send;
}

/// Configuration for a poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Feed name used in log lines.
    pub name: String,
    /// Delay between fetches.
    pub interval: Duration,
}

impl PollerConfig {
    /// Create a poller configuration
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            interval,
        }
    }

    /// Configuration for the system status feed
    #[must_use]
    pub fn status() -> Self {
        Self::new("system-status", STATUS_POLL_INTERVAL)
    }

    /// Configuration for the market pulse feed
    #[must_use]
    pub fn pulse() -> Self {
        Self::new("market-pulse", PULSE_POLL_INTERVAL)
    }
}

/// Consumer-side render state of one feed.
#[derive(Debug, Clone)]
pub struct FeedView<T> {
    /// Last successfully fetched snapshot. Never cleared by a failure.
    pub snapshot: Option<T>,
    /// True until the first fetch settles, successfully or not.
    pub loading: bool,
    /// Error of the most recent fetch, cleared on the next success.
    pub last_error: Option<String>,
    pub successes: u64,
    pub failures: u64,
    /// When `snapshot` was last replaced.
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for FeedView<T> {
    fn default() -> Self {
        Self {
            snapshot: None,
            loading: true,
            last_error: None,
            successes: 0,
            failures: 0,
            updated_at: None,
        }
    }
}

impl<T> FeedView<T> {
    /// Total number of fetches that have completed
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.successes + self.failures
    }

    /// Apply the outcome of one fetch.
    ///
    /// A success replaces the snapshot wholesale; a failure only records the
    /// error and keeps whatever was shown before.
    pub fn apply(&mut self, result: Result<T, FetchError>) {
        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.last_error = None;
                self.successes += 1;
                self.updated_at = Some(Utc::now());
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.failures += 1;
            }
        }
        self.loading = false;
    }
}

/// Handle to a running poller.
pub struct Poller<T> {
    name: String,
    view_rx: watch::Receiver<FeedView<T>>,
    cancel_token: CancellationToken,
}

impl<T> std::fmt::Debug for Poller<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("name", &self.name)
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync + 'static> Poller<T> {
    /// Spawn a poller task on the current tokio runtime.
    ///
    /// The first fetch is issued immediately; subsequent fetches follow every
    /// `config.interval` until the handle is dropped or shut down.
    #[must_use]
    pub fn spawn<F>(fetcher: F, config: PollerConfig) -> Self
    where
        F: Fetch<Output = T>,
    {
        let (view_tx, view_rx) = watch::channel(FeedView::default());
        let cancel_token = CancellationToken::new();
        let name = config.name.clone();

        info!("Starting {} poller (every {}s)", config.name, config.interval.as_secs());

        let task_cancel = cancel_token.clone();
        tokio::spawn(async move {
            poll_loop(fetcher, view_tx, task_cancel, config).await;
        });

        Self {
            name,
            view_rx,
            cancel_token,
        }
    }

    /// Get a copy of the current view.
    #[must_use]
    pub fn view(&self) -> FeedView<T> {
        self.view_rx.borrow().clone()
    }

    /// Get an independent receiver for view updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedView<T>> {
        self.view_rx.clone()
    }

    /// Wait for the next view update.
    ///
    /// Returns `false` once the poller task has exited.
    pub async fn changed(&mut self) -> bool {
        self.view_rx.changed().await.is_ok()
    }
}

impl<T> Poller<T> {
    /// Feed name of this poller.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop polling. Safe to call more than once.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn poll_loop<F: Fetch>(
    fetcher: F,
    view_tx: watch::Sender<FeedView<F::Output>>,
    cancel_token: CancellationToken,
    config: PollerConfig,
) {
    // First tick lands one full interval after the immediate fetch
    let mut ticker = interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let result = tokio::select! {
            biased;
            () = cancel_token.cancelled() => break,
            result = fetcher.fetch() => result,
        };

        match &result {
            Ok(_) => debug!("{} poller: snapshot updated", config.name),
            Err(e) => warn!("{} poller: fetch failed, keeping previous snapshot: {}", config.name, e),
        }
        view_tx.send_modify(|view| view.apply(result));

        tokio::select! {
            biased;
            () = cancel_token.cancelled() => break,
            _ = ticker.tick() => {}
        }
    }

    info!("{} poller stopped", config.name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Returns the fetch ordinal, or an error for ordinals listed in `fail_on`.
    struct CountingFetch {
        calls: Arc<AtomicUsize>,
        fail_on: Arc<Mutex<VecDeque<usize>>>,
    }

    impl CountingFetch {
        fn new(fail_on: &[usize]) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let fetch = Self {
                calls: Arc::clone(&calls),
                fail_on: Arc::new(Mutex::new(fail_on.iter().copied().collect())),
            };
            (fetch, calls)
        }
    }

    impl Fetch for CountingFetch {
        type Output = usize;

        async fn fetch(&self) -> Result<usize, FetchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let mut fail_on = self.fail_on.lock().unwrap();
            if fail_on.front() == Some(&n) {
                fail_on.pop_front();
                return Err(FetchError::Transport("connection refused".to_string()));
            }
            Ok(n)
        }
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_once_before_first_tick() {
        let (fetch, calls) = CountingFetch::new(&[]);
        let poller = Poller::spawn(fetch, PollerConfig::new("test", Duration::from_secs(10)));

        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(9)).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(poller.view().snapshot, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fetch_after_drop() {
        let (fetch, calls) = CountingFetch::new(&[]);
        let poller = Poller::spawn(fetch, PollerConfig::new("test", Duration::from_secs(10)));
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        drop(poller);
        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_is_idempotent_and_stops_updates() {
        let (fetch, calls) = CountingFetch::new(&[]);
        let mut poller = Poller::spawn(fetch, PollerConfig::status());
        settle().await;

        poller.shutdown();
        poller.shutdown();
        assert!(poller.is_shutdown());

        tokio::time::advance(STATUS_POLL_INTERVAL * 3).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The first fetch is still unseen; after that the exited task closes the channel
        assert!(poller.changed().await);
        assert!(!poller.changed().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_mount_cycles_do_not_leak_timers() {
        let (fetch, calls) = CountingFetch::new(&[]);
        let fetch = Arc::new(fetch);

        struct Shared(Arc<CountingFetch>);
        impl Fetch for Shared {
            type Output = usize;
            async fn fetch(&self) -> Result<usize, FetchError> {
                self.0.fetch().await
            }
        }

        for _ in 0..5 {
            let poller = Poller::spawn(Shared(Arc::clone(&fetch)), PollerConfig::pulse());
            settle().await;
            drop(poller);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 5);

        tokio::time::advance(PULSE_POLL_INTERVAL * 4).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_snapshot() {
        let (fetch, _calls) = CountingFetch::new(&[2]);
        let poller = Poller::spawn(fetch, PollerConfig::new("test", Duration::from_secs(10)));

        settle().await;
        let view = poller.view();
        assert!(!view.loading);
        assert_eq!(view.snapshot, Some(1));

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        let view = poller.view();
        assert_eq!(view.snapshot, Some(1));
        assert_eq!(view.failures, 1);
        assert!(view.last_error.as_deref().unwrap().contains("connection refused"));

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        let view = poller.view();
        assert_eq!(view.snapshot, Some(3));
        assert!(view.last_error.is_none());
        assert_eq!(view.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_failure_clears_loading_without_snapshot() {
        let (fetch, _calls) = CountingFetch::new(&[1]);
        let poller = Poller::spawn(fetch, PollerConfig::status());
        assert!(poller.view().loading);

        settle().await;
        let view = poller.view();
        assert!(!view.loading);
        assert!(view.snapshot.is_none());
        assert_eq!(view.failures, 1);
    }

    #[test]
    fn test_feed_view_default() {
        let view: FeedView<u8> = FeedView::default();
        assert!(view.loading);
        assert_eq!(view.attempts(), 0);
        assert!(view.updated_at.is_none());
    }
}
