//! Authentication Middleware
//! Mission: Gate protected routes on a valid session cookie

use crate::auth::{
    api::AuthState,
    jwt::TokenError,
    models::{User, UserField},
    TOKEN_COOKIE,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

/// Auth gate. Every failing check returns immediately; the wrapped handler
/// only runs once a live user is attached to the request.
pub async fn require_auth(
    State(state): State<AuthState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = state.jwt_handler.validate_token(token).map_err(|e| {
        debug!("Rejected session token: {}", e);
        AuthError::from(e)
    })?;

    let user = state
        .user_store
        .find_by(UserField::Id(claims.sub))
        .map_err(|e| {
            warn!("User lookup failed in auth gate: {:#}", e);
            AuthError::StoreUnavailable
        })?
        .ok_or_else(|| {
            debug!("Token subject {} no longer exists", claims.sub);
            AuthError::UnknownUser
        })?;

    // Handlers read this through `CurrentUser`
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// The user attached by `require_auth`
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::MissingUser)
    }
}

/// Auth error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    UnknownUser,
    /// No user attached to the request (gate not applied)
    MissingUser,
    StoreUnavailable,
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::MissingSecret | TokenError::Invalid | TokenError::Signing => {
                AuthError::InvalidToken
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing session token"),
            AuthError::InvalidToken | AuthError::ExpiredToken => {
                (StatusCode::UNAUTHORIZED, "Invalid or expired token")
            }
            AuthError::UnknownUser | AuthError::MissingUser => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
            AuthError::StoreUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}
