//! Implements the structs that hold the state of the REST server.
//!
//! The stores are injected at construction, so route handlers and tests can
//! swap in any implementation of the store traits. Handlers only receive the
//! sub-state they need, via `FromRef`.

use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::stores::{CategoryStore, TransactionStore, UserStore};

/// The key pair used for signing and verifying identity tokens.
#[derive(Clone)]
struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState<C, T, U>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    /// The read-only view of the category catalog.
    pub category_store: C,
    /// The store for managing the ledger's transactions.
    pub transaction_store: T,
    /// The store for managing user accounts.
    pub user_store: U,
    jwt_keys: JwtKeys,
}

impl<C, T, U> AppState<C, T, U>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    /// Create a new [AppState].
    ///
    /// `jwt_secret` is the secret used to sign and verify identity tokens.
    pub fn new(jwt_secret: &str, category_store: C, transaction_store: T, user_store: U) -> Self {
        Self {
            category_store,
            transaction_store,
            user_store,
            jwt_keys: JwtKeys::new(jwt_secret),
        }
    }
}

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The key for verifying identity tokens.
    pub decoding_key: DecodingKey,
}

impl<C, T, U> FromRef<AppState<C, T, U>> for AuthState
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U>) -> Self {
        Self {
            decoding_key: state.jwt_keys.decoding_key.clone(),
        }
    }
}

/// The state needed to log a user in and issue them a token.
#[derive(Clone)]
pub struct SessionState<U>
where
    U: UserStore + Clone + Send + Sync,
{
    /// The store for looking up the user's credentials.
    pub user_store: U,
    /// The key for signing identity tokens.
    pub encoding_key: EncodingKey,
}

impl<C, T, U> FromRef<AppState<C, T, U>> for SessionState<U>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U>) -> Self {
        Self {
            user_store: state.user_store.clone(),
            encoding_key: state.jwt_keys.encoding_key.clone(),
        }
    }
}

/// The state needed to register and manage user accounts.
#[derive(Clone)]
pub struct UserState<U>
where
    U: UserStore + Clone + Send + Sync,
{
    /// The store for managing user accounts.
    pub user_store: U,
}

impl<C, T, U> FromRef<AppState<C, T, U>> for UserState<U>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U>) -> Self {
        Self {
            user_store: state.user_store.clone(),
        }
    }
}

/// The state needed to serve the category catalog.
#[derive(Clone)]
pub struct CategoryState<C>
where
    C: CategoryStore + Clone + Send + Sync,
{
    /// The read-only view of the category catalog.
    pub category_store: C,
}

impl<C, T, U> FromRef<AppState<C, T, U>> for CategoryState<C>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U>) -> Self {
        Self {
            category_store: state.category_store.clone(),
        }
    }
}

/// The state needed for the ledger operations.
///
/// The category store is included so the listing endpoint can resolve a
/// category label to its ID.
#[derive(Clone)]
pub struct LedgerState<C, T>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    /// The read-only view of the category catalog.
    pub category_store: C,
    /// The store for managing the ledger's transactions.
    pub transaction_store: T,
}

impl<C, T, U> FromRef<AppState<C, T, U>> for LedgerState<C, T>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U>) -> Self {
        Self {
            category_store: state.category_store.clone(),
            transaction_store: state.transaction_store.clone(),
        }
    }
}
