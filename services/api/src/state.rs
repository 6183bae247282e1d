//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared,
//! clonable resources like the tutor service and the session registry.

use crate::config::Config;
use crate::sessions::SessionRegistry;
use std::sync::Arc;
use tutor_core::tutor::TutorService;

/// The shared application state, created once at startup and passed to all handlers.
/// All fields are public to be accessible from other modules.
#[derive(Clone)]
pub struct AppState {
    pub tutor: Arc<TutorService>,
    pub sessions: SessionRegistry,
    pub config: Arc<Config>,
}
