//! Authentication Models
//! Mission: Define user records, token claims and request/response bodies

use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub created_at: String,
}

/// Insert payload for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Field used to look a user up in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField<'a> {
    Id(i64),
    Email(&'a str),
}

/// Session token claims
///
/// `sub` is the numeric user id. A string, fractional or missing subject
/// fails decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // subject (user_id)
    pub exp: i64, // expiration timestamp
}

/// Sign-up request body. Absent fields bind as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Sign-in request body. Absent fields bind as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// `{"success": "..."}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: &'static str,
}

/// `{"message": ...}`
#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: T,
}

/// `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}
