//! Tutor API Library Crate
//!
//! This library contains all the core logic for the tutor web service,
//! including the application state, session registry, API handlers, and
//! routing. The `bin/api.rs` binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod sessions;
pub mod state;
