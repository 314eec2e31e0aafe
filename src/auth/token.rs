//! Defines the identity token claims and how tokens are signed and verified.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{auth::AuthError, models::UserID};

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME: Duration = Duration::hours(8);

/// The claims carried by an identity token.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the authenticated user.
    pub sub: i64,
    /// The expiry as a unix timestamp.
    pub exp: i64,
}

/// Sign a token asserting that `user_id` authenticated just now.
///
/// # Errors
/// Returns [AuthError::InternalError] if the token could not be signed.
pub fn issue_token(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, AuthError> {
    let expires_at = OffsetDateTime::now_utc() + TOKEN_LIFETIME;
    let claims = Claims {
        sub: user_id.as_i64(),
        exp: expires_at.unix_timestamp(),
    };

    jsonwebtoken::encode(&Header::default(), &claims, encoding_key).map_err(|error| {
        tracing::error!("Error signing identity token: {}", error);
        AuthError::InternalError
    })
}

/// Verify a token's signature and expiry and extract the user ID it asserts.
///
/// # Errors
/// This function will return an:
/// - [AuthError::TokenExpired] if the token's expiry has passed,
/// - or [AuthError::InvalidToken] if the token is malformed or its signature
///   does not check out.
pub fn verify_token(token: &str, decoding_key: &DecodingKey) -> Result<UserID, AuthError> {
    jsonwebtoken::decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| UserID::new(token_data.claims.sub))
        .map_err(|error| match error.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
}
