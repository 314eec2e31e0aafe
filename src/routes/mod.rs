//! This module defines the REST API's routes and their handlers.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};

use crate::{
    AppState,
    auth::{auth_guard, log_in},
    state::AuthState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

pub mod endpoints;

mod category;
mod transaction;
mod user;

pub use category::get_categories;
pub use transaction::{
    TransactionListQuery, create_transaction, delete_transaction, get_statement, get_transaction,
    get_transactions, update_transaction,
};
pub use user::{UserData, create_user, get_user, update_user};

/// Return a router with all the app's routes.
///
/// Registration and log-in are open; everything else sits behind the bearer
/// token guard.
pub fn build_router<C, T, U>(state: AppState<C, T, U>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let unprotected_routes = Router::new()
        .route(endpoints::USERS, post(create_user::<U>))
        .route(endpoints::LOG_IN, post(log_in::<U>));

    let protected_routes = Router::new()
        .route(
            endpoints::ME,
            get(get_user::<U>).put(update_user::<U>),
        )
        .route(endpoints::CATEGORIES, get(get_categories::<C>))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions::<C, T>).post(create_transaction::<C, T>),
        )
        .route(endpoints::STATEMENT, get(get_statement::<C, T>))
        .route(
            endpoints::TRANSACTION,
            get(get_transaction::<C, T>)
                .put(update_transaction::<C, T>)
                .delete(delete_transaction::<C, T>),
        )
        .route_layer(middleware::from_fn_with_state(
            AuthState::from_ref(&state),
            auth_guard,
        ));

    protected_routes.merge(unprotected_routes).with_state(state)
}
