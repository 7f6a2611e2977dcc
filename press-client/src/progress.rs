//! Progress session tracking over server-sent events.
//!
//! A long-running backend job hands back a session id; [`ProgressTracker::start`]
//! opens `GET /progress/stream/{id}` and routes each pushed event to the
//! caller's callbacks until a terminal event or a transport failure tears the
//! session down. At most one connection exists per session id.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::AbortHandle;

use crate::http::ApiClient;

/// Payload of `progress` and `complete` events
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProgressData {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub current_step: Option<u64>,
    #[serde(default)]
    pub total_steps: Option<u64>,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub elapsed_time: Option<f64>,
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl ProgressData {
    /// `(imported, total)` when the job reports item counts in its details
    pub fn item_counts(&self) -> Option<(u64, u64)> {
        let imported = self.details.get("imported").and_then(Value::as_u64)?;
        let total = self.details.get("total").and_then(Value::as_u64)?;
        (imported > 0 && total > 0).then_some((imported, total))
    }
}

/// Payload of `error` events, and of the synthetic connection-lost failure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProgressFailure {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub error: String,
}

impl ProgressFailure {
    pub const CONNECTION_LOST: &'static str = "Connection lost";

    pub fn connection_lost(session_id: &str) -> Self {
        Self {
            session_id: Some(session_id.to_string()),
            error: Self::CONNECTION_LOST.to_string(),
        }
    }
}

/// One pushed event, discriminated by its `type` field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    Connected {
        #[serde(default)]
        session_id: Option<String>,
    },
    Progress(ProgressData),
    Complete(ProgressData),
    Error(ProgressFailure),
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Error(_))
    }
}

type ProgressFn = Box<dyn FnMut(&ProgressData) + Send>;
type CompleteFn = Box<dyn FnOnce(ProgressData) + Send>;
type ErrorFn = Box<dyn FnOnce(ProgressFailure) + Send>;

/// Callback slots for one session; every slot is optional
#[derive(Default)]
pub struct ProgressCallbacks {
    on_progress: Option<ProgressFn>,
    on_complete: Option<CompleteFn>,
    on_error: Option<ErrorFn>,
}

impl ProgressCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_progress(mut self, f: impl FnMut(&ProgressData) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce(ProgressData) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(ProgressFailure) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Route one event; returns `true` when the session must be torn down
    fn dispatch(&mut self, session_id: &str, event: ProgressEvent) -> bool {
        match event {
            ProgressEvent::Connected { .. } => {
                log::info!("Progress stream connected: {}", session_id);
                false
            }
            ProgressEvent::Progress(data) => {
                if let Some(f) = self.on_progress.as_mut() {
                    f(&data);
                }
                false
            }
            ProgressEvent::Complete(data) => {
                if let Some(f) = self.on_complete.take() {
                    f(data);
                }
                true
            }
            ProgressEvent::Error(failure) => {
                if let Some(f) = self.on_error.take() {
                    f(failure);
                }
                true
            }
        }
    }

    fn fail(&mut self, failure: ProgressFailure) {
        if let Some(f) = self.on_error.take() {
            f(failure);
        }
    }
}

struct ActiveStream {
    generation: u64,
    task: AbortHandle,
}

/// Tracks open progress streams, one per session id
///
/// Cloning shares the same session table.
#[derive(Clone)]
pub struct ProgressTracker {
    http: ApiClient,
    streams: Arc<Mutex<HashMap<String, ActiveStream>>>,
    generations: Arc<AtomicU64>,
}

impl ProgressTracker {
    pub fn new(http: ApiClient) -> Self {
        Self {
            http,
            streams: Arc::new(Mutex::new(HashMap::new())),
            generations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start streaming progress for a session
    ///
    /// Returns `false` without opening anything when the session already has
    /// a live connection. Must be called from within a tokio runtime.
    pub fn start(&self, session_id: &str, callbacks: ProgressCallbacks) -> bool {
        let mut streams = self.lock();
        if streams.contains_key(session_id) {
            log::info!("Progress stream already active for session: {}", session_id);
            return false;
        }

        // The table stays locked until the entry is inserted, so a stream that
        // finishes immediately cannot tear down before it is registered.
        let generation = self.generations.fetch_add(1, Ordering::SeqCst);
        let tracker = self.clone();
        let id = session_id.to_string();
        let task = tokio::spawn(async move { tracker.run(id, generation, callbacks).await });

        streams.insert(
            session_id.to_string(),
            ActiveStream {
                generation,
                task: task.abort_handle(),
            },
        );
        log::debug!("Progress stream opened: {}", session_id);
        true
    }

    /// Close a session's stream; a no-op for unknown or finished sessions
    pub fn stop(&self, session_id: &str) -> bool {
        match self.lock().remove(session_id) {
            Some(stream) => {
                stream.task.abort();
                log::debug!("Progress stream closed: {}", session_id);
                true
            }
            None => false,
        }
    }

    /// Close every tracked stream
    pub fn stop_all(&self) {
        let mut streams = self.lock();
        for (session_id, stream) in streams.drain() {
            stream.task.abort();
            log::debug!("Progress stream closed: {}", session_id);
        }
    }

    pub fn is_tracking(&self, session_id: &str) -> bool {
        self.lock().contains_key(session_id)
    }

    /// Ids of all live sessions, sorted
    pub fn active_sessions(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    async fn run(&self, session_id: String, generation: u64, mut callbacks: ProgressCallbacks) {
        let endpoint = format!("/progress/stream/{}", session_id);
        let response = match self.http.open_stream(&endpoint).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Progress stream error for {}: {}", session_id, e);
                callbacks.fail(ProgressFailure::connection_lost(&session_id));
                self.finish(&session_id, generation);
                return;
            }
        };

        let mut events = Box::pin(response.bytes_stream().eventsource());
        while let Some(item) = events.next().await {
            let event = match item {
                Ok(event) => event,
                Err(e) => {
                    log::error!("Progress stream error for {}: {}", session_id, e);
                    break;
                }
            };

            match serde_json::from_str::<ProgressEvent>(&event.data) {
                Ok(event) => {
                    if callbacks.dispatch(&session_id, event) {
                        self.finish(&session_id, generation);
                        return;
                    }
                }
                Err(e) => log::error!("Error parsing progress data for {}: {}", session_id, e),
            }
        }

        log::warn!("Progress stream for {} ended without a final event", session_id);
        callbacks.fail(ProgressFailure::connection_lost(&session_id));
        self.finish(&session_id, generation);
    }

    /// Remove the entry only if it still belongs to this connection
    fn finish(&self, session_id: &str, generation: u64) {
        let mut streams = self.lock();
        if streams
            .get(session_id)
            .is_some_and(|stream| stream.generation == generation)
        {
            streams.remove(session_id);
            log::debug!("Progress stream finished: {}", session_id);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ActiveStream>> {
        self.streams.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
