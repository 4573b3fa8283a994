//! Authentication API Endpoints
//! Mission: Sign-up, sign-in, sign-out and whoami

use crate::auth::{
    jwt::{JwtHandler, TokenError},
    middleware::CurrentUser,
    models::{
        ErrorResponse, MessageResponse, NewUser, SignInRequest, SignUpRequest, SuccessResponse,
        User, UserField,
    },
    password::{hash_password, verify_decoy, verify_password},
    user_store::UserStore,
    TOKEN_COOKIE,
};
use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<dyn UserStore>,
    pub jwt_handler: Arc<JwtHandler>,

    // Cookie config
    pub cookie_secure: bool,

    /// Whoami without an attached user: 401 when set, `{"message": null}` otherwise
    pub require_user_on_validate: bool,
}

impl AuthState {
    pub fn new(user_store: Arc<dyn UserStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            user_store,
            jwt_handler,
            cookie_secure: false,
            require_user_on_validate: true,
        }
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub fn with_require_user_on_validate(mut self, required: bool) -> Self {
        self.require_user_on_validate = required;
        self
    }

    fn session_cookie(&self, value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build((TOKEN_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .max_age(time::Duration::seconds(max_age_secs))
            .build()
    }
}

/// Request body accepted as JSON or as an urlencoded form.
/// Anything unreadable becomes the generic bad-request error.
pub struct AuthBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AuthBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AuthApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(body) = Form::<T>::from_request(req, state)
                .await
                .map_err(|_| AuthApiError::BadRequest)?;
            Ok(Self(body))
        } else {
            let Json(body) = Json::<T>::from_request(req, state)
                .await
                .map_err(|_| AuthApiError::BadRequest)?;
            Ok(Self(body))
        }
    }
}

/// Sign-up endpoint - POST /signup
pub async fn sign_up(
    State(state): State<AuthState>,
    AuthBody(payload): AuthBody<SignUpRequest>,
) -> Result<Json<SuccessResponse>, AuthApiError> {
    let password_hash = hash_password(&payload.password).map_err(|e| {
        warn!("Failed to hash password: {}", e);
        AuthApiError::HashFailed
    })?;

    let user = state
        .user_store
        .create(NewUser {
            email: payload.email,
            username: payload.username,
            password_hash,
        })
        .map_err(|e| {
            warn!("Failed to create user: {:#}", e);
            AuthApiError::CreateFailed
        })?;

    info!("📝 Sign-up: {} ({})", user.username, user.id);

    Ok(Json(SuccessResponse {
        success: "user created",
    }))
}

/// Sign-in endpoint - POST /login
pub async fn sign_in(
    State(state): State<AuthState>,
    jar: CookieJar,
    AuthBody(payload): AuthBody<SignInRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>), AuthApiError> {
    let user = state
        .user_store
        .find_by(UserField::Email(&payload.email))
        .map_err(|e| {
            warn!("User lookup failed during sign-in: {:#}", e);
            AuthApiError::InternalError
        })?;

    let valid = match &user {
        Some(user) => verify_password(&payload.password, &user.password_hash),
        None => verify_decoy(&payload.password),
    };

    let user = match user {
        Some(user) if valid => user,
        _ => {
            warn!("❌ Failed sign-in attempt");
            return Err(AuthApiError::InvalidCredentials);
        }
    };

    let token = state.jwt_handler.generate_token(&user).map_err(|e| {
        if e == TokenError::MissingSecret {
            warn!("Cannot issue session token: SECRET is not configured");
        }
        AuthApiError::TokenCreation
    })?;

    let max_age = state.jwt_handler.ttl().num_seconds();
    let jar = jar.add(state.session_cookie(token, max_age));

    info!("✅ Sign-in: {} ({})", user.username, user.id);

    Ok((
        jar,
        Json(SuccessResponse {
            success: "login successful",
        }),
    ))
}

/// Sign-out endpoint - POST /logout
///
/// Overwrites the cookie with an empty, already-expired one.
pub async fn sign_out(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse<&'static str>>) {
    let jar = jar.add(state.session_cookie(String::new(), -1));

    (
        jar,
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}

/// Whoami endpoint - GET /validate (behind `require_auth`)
pub async fn validate(
    State(state): State<AuthState>,
    user: Option<CurrentUser>,
) -> Result<Json<MessageResponse<Option<User>>>, AuthApiError> {
    match user {
        Some(CurrentUser(user)) => Ok(Json(MessageResponse {
            message: Some(user),
        })),
        None if state.require_user_on_validate => Err(AuthApiError::Unauthorized),
        None => Ok(Json(MessageResponse { message: None })),
    }
}

/// Auth API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthApiError {
    BadRequest,
    HashFailed,
    CreateFailed,
    /// Unknown email and wrong password alike
    InvalidCredentials,
    TokenCreation,
    Unauthorized,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::BadRequest => (StatusCode::BAD_REQUEST, "Failed to read body"),
            AuthApiError::HashFailed => (StatusCode::BAD_REQUEST, "Failed to hash password"),
            AuthApiError::CreateFailed => (StatusCode::BAD_REQUEST, "Failed to create user"),
            AuthApiError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Invalid email or password")
            }
            AuthApiError::TokenCreation => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create token")
            }
            AuthApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
