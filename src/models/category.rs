//! This file defines the `Category` type. Categories form a fixed, shared
//! catalog that transactions reference; the ledger only ever reads them.

use serde::{Deserialize, Serialize};

use crate::models::DatabaseID;

/// A label for classifying expenses and income, e.g. 'Groceries', 'Salary'.
///
/// The catalog is seeded when the database is created and is shared by all
/// users. Many transactions reference one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    id: DatabaseID,
    name: String,
}

impl Category {
    /// Create a category from its stored parts.
    pub fn new(id: DatabaseID, name: String) -> Self {
        Self { id, name }
    }

    /// The ID of the category.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The name of the category.
    pub fn name(&self) -> &str {
        &self.name
    }
}
