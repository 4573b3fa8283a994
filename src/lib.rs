//! Pomodoro Auth Library
//!
//! Cookie-session authentication for the Pomodoro backend: account
//! registration, sign-in with signed session tokens, sign-out and a
//! request gate for protected routes.

pub mod app;
pub mod auth;
pub mod config;
pub mod middleware;

pub use app::{build_router, cors_layer};
pub use config::Config;
