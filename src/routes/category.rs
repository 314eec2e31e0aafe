//! This file defines the route for reading the category catalog.

use axum::{Json, extract::State};

use crate::{Error, models::Category, state::CategoryState, stores::CategoryStore};

/// A route handler for listing the full category catalog.
///
/// The catalog is shared by all users and is not filtered or paginated.
pub async fn get_categories<C>(
    State(state): State<CategoryState<C>>,
) -> Result<Json<Vec<Category>>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
{
    state.category_store.get_all().map(Json)
}
