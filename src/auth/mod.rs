/*! This module defines the data structures and response handlers for
authenticating a user: logging in, issuing identity tokens and guarding
routes with them. */

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    Error,
    models::User,
    state::SessionState,
    stores::UserStore,
};

mod middleware;
mod token;

pub use middleware::auth_guard;
pub use token::{TOKEN_LIFETIME, issue_token, verify_token};

/// The errors that may occur while authenticating a request.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// The user provided an invalid combination of email and password.
    InvalidCredentials,
    /// The request carried no `Authorization: Bearer` header.
    MissingToken,
    /// The token was malformed or its signature did not check out.
    InvalidToken,
    /// The token was valid once but its expiry has passed.
    TokenExpired,
    /// An unexpected error occurred; the details are only logged on the
    /// server.
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid credentials"),
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "an Authorization header with a Bearer token is required",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "token expired"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// The credentials entered during log-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct Credentials {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// The response to a successful log-in.
#[derive(Serialize)]
pub struct LogInResponse {
    /// The authenticated user's profile.
    pub user: User,
    /// A signed bearer token asserting the user's identity for
    /// [TOKEN_LIFETIME].
    pub token: String,
}

/// Handler for log-in requests.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or signing the
///   token.
///
/// The first two cases produce the same 401 response, so the client cannot
/// probe which email addresses are registered.
pub async fn log_in<U>(
    State(state): State<SessionState<U>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LogInResponse>, AuthError>
where
    U: UserStore + Clone + Send + Sync,
{
    let user = state
        .user_store
        .get_by_email(&credentials.email)
        .map_err(|error| match error {
            Error::NotFound => AuthError::InvalidCredentials,
            error => {
                tracing::error!("Error matching user: {error:?}");
                AuthError::InternalError
            }
        })?;

    let password_is_correct =
        user.password_hash()
            .verify(&credentials.password)
            .map_err(|error| {
                tracing::error!("Error verifying password: {}", error);
                AuthError::InternalError
            })?;

    if !password_is_correct {
        return Err(AuthError::InvalidCredentials);
    }

    let token = issue_token(user.id(), &state.encoding_key)?;

    Ok(Json(LogInResponse { user, token }))
}
