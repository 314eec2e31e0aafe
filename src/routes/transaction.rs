//! This file defines the routes for the transaction type: the
//! ownership-scoped CRUD operations and the statement aggregate.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    Error,
    models::{CategorisedTransaction, DatabaseID, Statement, Transaction, TransactionData, UserID},
    state::LedgerState,
    stores::{CategoryStore, TransactionStore},
};

/// The query parameters accepted by the transaction listing.
#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    /// Narrow the listing to transactions filed under the category with this
    /// name.
    pub category: Option<String>,
}

/// A route handler for listing the authenticated user's transactions,
/// optionally narrowed to one category by its name.
///
/// The category filter is resolved against the catalog first, even when the
/// user has no transactions; an unknown name fails with the status code 400.
pub async fn get_transactions<C, T>(
    State(state): State<LedgerState<C, T>>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<CategorisedTransaction>>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    let category_id = match query.category {
        Some(ref name) => {
            let category = state
                .category_store
                .get_by_name(name)
                .map_err(|error| match error {
                    // A missing catalog entry here is a bad filter, not a
                    // missing resource.
                    Error::NotFound => Error::UnknownCategory,
                    error => error,
                })?;

            Some(category.id())
        }
        None => None,
    };

    state
        .transaction_store
        .get_by_user(user_id, category_id)
        .map(Json)
}

/// A route handler for getting a transaction by its database ID.
///
/// This function will return the status code 404 if the requested resource
/// does not exist or belongs to another user.
pub async fn get_transaction<C, T>(
    State(state): State<LedgerState<C, T>>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<Transaction>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    state
        .transaction_store
        .get(transaction_id)
        .and_then(|transaction| {
            if transaction.user_id() == user_id {
                Ok(Json(transaction))
            } else {
                // Respond with 404 not found so that unauthorized users
                // cannot know whether another user's resource exists.
                Err(Error::NotFound)
            }
        })
}

/// A route handler for creating a new transaction.
///
/// The transaction is owned by the authenticated caller; the payload cannot
/// name an owner.
pub async fn create_transaction<C, T>(
    State(mut state): State<LedgerState<C, T>>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<TransactionData>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    data.validate()?;

    let transaction = state.transaction_store.create(user_id, data)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for replacing the mutable fields of a transaction.
///
/// This function will return the status code 400 if the transaction does not
/// exist or belongs to another user.
pub async fn update_transaction<C, T>(
    State(mut state): State<LedgerState<C, T>>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
    Json(data): Json<TransactionData>,
) -> Result<StatusCode, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    data.validate()?;

    state
        .transaction_store
        .update(transaction_id, user_id, data)?;

    Ok(StatusCode::NO_CONTENT)
}

/// A route handler for deleting a transaction.
///
/// This function will return the status code 404 if the transaction does not
/// exist or belongs to another user. The delete is permanent.
pub async fn delete_transaction<C, T>(
    State(mut state): State<LedgerState<C, T>>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    state.transaction_store.delete(transaction_id, user_id)?;

    Ok(StatusCode::NO_CONTENT)
}

/// A route handler for the authenticated user's statement: the income total,
/// expense total and balance of their ledger.
pub async fn get_statement<C, T>(
    State(state): State<LedgerState<C, T>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Statement>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    state.transaction_store.statement(user_id).map(Json)
}
