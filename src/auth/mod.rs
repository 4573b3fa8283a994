//! Authentication Module
//! Mission: Cookie-based session auth with signed tokens

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod user_store;

pub use api::AuthState;
pub use jwt::JwtHandler;
pub use middleware::{require_auth, CurrentUser};
pub use user_store::{SqliteUserStore, UserStore};

/// Cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";
