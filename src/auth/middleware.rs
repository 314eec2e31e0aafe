//! Authentication middleware that validates bearer tokens on protected
//! routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    auth::{AuthError, verify_token},
    state::AuthState,
};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Middleware function that checks for a valid bearer token.
/// The user ID is placed into the request and the request executed normally
/// if the token is valid, otherwise a 401 response is returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return AuthError::MissingToken.into_response();
    };

    match verify_token(token, &state.decoding_key) {
        Ok(user_id) => {
            request.extensions_mut().insert(user_id);

            next.run(request).await
        }
        Err(error) => error.into_response(),
    }
}
