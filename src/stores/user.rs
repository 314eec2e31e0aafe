//! Defines the user store trait.

use crate::{
    Error,
    models::{PasswordHash, User, UserID},
};

/// Handles the creation and retrieval of user accounts.
pub trait UserStore {
    /// Create a new user.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmailTaken] if `email` is already registered,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, name: &str, email: &str, password_hash: PasswordHash)
    -> Result<User, Error>;

    /// Retrieve a user by their ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Retrieve a user by their email address.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no user registered with `email`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get_by_email(&self, email: &str) -> Result<User, Error>;

    /// Replace the name, email and password hash of the user `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmailTaken] if `email` is registered to another user,
    /// - [Error::NotFound] if `id` does not refer to a valid user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(
        &mut self,
        id: UserID,
        name: &str,
        email: &str,
        password_hash: PasswordHash,
    ) -> Result<(), Error>;
}
