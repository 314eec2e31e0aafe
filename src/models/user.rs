//! This file defines a user of the application and its supporting types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The integer ID of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer, for use in database queries.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bcrypt hash of a user's password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a raw password.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the underlying hashing library fails.
    /// The error string should only be logged on the server, never shown to
    /// the client.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        bcrypt::hash(raw_password, bcrypt::DEFAULT_COST)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash string that was previously produced by [PasswordHash::new],
    /// e.g. one read back from the database.
    pub fn from_string(hash: String) -> Self {
        Self(hash)
    }

    /// Check a raw password against this hash.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the underlying hashing library fails.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        bcrypt::verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }

    /// The hash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A registered user of the application.
///
/// The password hash is never serialised into responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: UserID,
    name: String,
    email: String,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
}

impl User {
    /// Create a user from its stored parts.
    pub fn new(id: UserID, name: String, email: String, password_hash: PasswordHash) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
        }
    }

    /// The ID of the user.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The display name of the user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The email address the user registered with.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The hash of the user's password.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}
