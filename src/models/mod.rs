//! This module defines the domain data types: transactions, the category
//! catalog and user accounts.

mod category;
mod transaction;
mod user;

pub use category::Category;
pub use transaction::{
    CategorisedTransaction, Statement, Transaction, TransactionData, TransactionKind,
};
pub use user::{PasswordHash, User, UserID};

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
