//! Session Registry
//!
//! Maps session identifiers to their conversation state. Each session gets
//! its own lock, held across gate evaluation and generation, so turns within
//! a session stay ordered while distinct sessions proceed concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tutor_core::session::SessionContext;

/// Slot used when the client does not supply an `x-session-id` header.
pub const DEFAULT_SESSION: &str = "default";

/// In-memory map of session id to conversation state.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<SessionContext>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state slot for a session, creating it on first use.
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<SessionContext>> {
        let mut sessions = self.inner.lock().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SessionContext::new())))
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}
