//! Defines the transaction store trait.

use crate::{
    Error,
    models::{CategorisedTransaction, DatabaseID, Statement, Transaction, TransactionData, UserID},
};

/// Handles the creation, retrieval and aggregation of ledger transactions.
///
/// Ownership scoping is part of the contract: mutating operations only touch
/// rows that belong to the given user, and the listing and statement
/// operations only ever see the given user's rows.
pub trait TransactionStore {
    /// Create a new transaction owned by `user_id`.
    ///
    /// The store assigns the ID. The category is not checked before the
    /// write; a dangling `category_id` trips the foreign key constraint.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::ConstraintViolation] if `data.category_id` does not refer
    ///   to a catalog entry,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, user_id: UserID, data: TransactionData) -> Result<Transaction, Error>;

    /// Retrieve a transaction by its `id`, regardless of owner.
    ///
    /// Callers are responsible for checking the owner of the returned row
    /// before revealing it.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve the transactions owned by `user_id`, each joined with its
    /// category name, optionally narrowed to a single category.
    ///
    /// Results are ordered newest date first, ties broken by descending ID.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn get_by_user(
        &self,
        user_id: UserID,
        category_id: Option<DatabaseID>,
    ) -> Result<Vec<CategorisedTransaction>, Error>;

    /// Replace the mutable fields of the transaction `id` owned by
    /// `user_id`. The owner itself never changes.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidEdit] if no row matches both `id` and `user_id`,
    /// - [Error::ConstraintViolation] if `data.category_id` does not refer
    ///   to a catalog entry,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(
        &mut self,
        id: DatabaseID,
        user_id: UserID,
        data: TransactionData,
    ) -> Result<(), Error>;

    /// Delete the transaction `id` if it is owned by `user_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no row matches both `id` and `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<(), Error>;

    /// Compute the income total, expense total and balance for `user_id`.
    ///
    /// Both sums must come from the same snapshot of the store so that a
    /// concurrent write cannot skew the balance.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn statement(&self, user_id: UserID) -> Result<Statement, Error>;
}
