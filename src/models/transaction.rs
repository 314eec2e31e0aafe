//! This file defines the type `Transaction`, the core type of the ledger,
//! along with the request payload and aggregate types that accompany it.

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// Whether a transaction adds money to or removes money from a ledger.
///
/// The direction of a transaction is carried here, never by the sign of the
/// amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received, e.g. wages.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The string stored in the database for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction kind {other:?}").into(),
            )),
        }
    }
}

/// An income or expense recorded in a user's ledger.
///
/// Each transaction belongs to exactly one user and references exactly one
/// entry of the category catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    kind: TransactionKind,
    description: String,
    amount: f64,
    date: Date,
    user_id: UserID,
    category_id: DatabaseID,
}

impl Transaction {
    /// Create a transaction from its stored parts.
    ///
    /// This does not validate the fields; it is intended for reconstructing
    /// rows that the store has already accepted.
    pub fn new(
        id: DatabaseID,
        kind: TransactionKind,
        description: String,
        amount: f64,
        date: Date,
        user_id: UserID,
        category_id: DatabaseID,
    ) -> Self {
        Self {
            id,
            kind,
            description,
            amount,
            date,
            user_id,
            category_id,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// Whether this transaction is an income or an expense.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// A text description of what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The amount of money received or spent. Never negative.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// When the transaction happened.
    pub fn date(&self) -> &Date {
        &self.date
    }

    /// The ID of the user that owns this transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The catalog category this transaction is filed under.
    pub fn category_id(&self) -> DatabaseID {
        self.category_id
    }
}

/// A transaction joined with the name of its category, as returned by the
/// listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorisedTransaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// Whether this transaction is an income or an expense.
    pub kind: TransactionKind,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money received or spent.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The ID of the user that owns this transaction.
    pub user_id: UserID,
    /// The catalog category this transaction is filed under.
    pub category_id: DatabaseID,
    /// The name of the category, joined from the catalog.
    pub category_name: String,
}

/// The mutable fields of a transaction, as sent by clients when creating or
/// replacing one. The owner is never part of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionData {
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money received or spent.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The catalog category to file the transaction under.
    pub category_id: DatabaseID,
}

impl TransactionData {
    /// Check the payload invariants before it is handed to a store.
    ///
    /// # Errors
    /// Returns [Error::NegativeAmount] if `amount` is below zero. Direction
    /// is expressed by `kind`, so a negative magnitude is always a client
    /// mistake.
    pub fn validate(&self) -> Result<(), Error> {
        if self.amount < 0.0 {
            return Err(Error::NegativeAmount);
        }

        Ok(())
    }
}

/// The aggregate summary of one user's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// The sum of all income amounts, zero if there are none.
    pub income: f64,
    /// The sum of all expense amounts, zero if there are none.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}
