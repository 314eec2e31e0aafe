//! The API endpoint URIs.

/// The route for logging in a user.
pub const LOG_IN: &str = "/login";
/// The route for registering new users.
pub const USERS: &str = "/users";
/// The route for the authenticated user's own profile.
pub const ME: &str = "/users/me";
/// The route to list the category catalog.
pub const CATEGORIES: &str = "/categories";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route for the authenticated user's statement.
pub const STATEMENT: &str = "/transactions/statement";
