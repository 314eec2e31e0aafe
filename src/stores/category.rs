//! Defines the category catalog store trait.

use crate::{Error, models::Category};

/// Read access to the fixed category catalog.
///
/// The catalog is seeded when the database is created; the ledger never
/// writes to it.
pub trait CategoryStore {
    /// Get the full catalog.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn get_all(&self) -> Result<Vec<Category>, Error>;

    /// Look up a catalog entry by its exact name.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no entry has the name,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get_by_name(&self, name: &str) -> Result<Category, Error>;
}
