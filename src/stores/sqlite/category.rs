//! Implements a SQLite backed, read-only view of the category catalog.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::Category,
    stores::CategoryStore,
};

/// The catalog entries seeded when the database is created.
///
/// The catalog is append-only: entries may be added here in later releases
/// but are never renamed or removed, since transactions reference them.
pub const DEFAULT_CATEGORIES: [&str; 17] = [
    "Food",
    "Subscriptions & Services",
    "Home",
    "Groceries",
    "Personal Care",
    "Education",
    "Family",
    "Leisure",
    "Pets",
    "Gifts",
    "Clothing",
    "Health",
    "Transport",
    "Salary",
    "Sales",
    "Other Income",
    "Other Expenses",
];

/// Reads the category catalog from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Get the full catalog, in the order the entries were seeded.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name FROM category ORDER BY id")?
            .query_map([], Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(Error::SqlError))
            .collect()
    }

    /// Look up a catalog entry by its exact name.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no entry has the name,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get_by_name(&self, name: &str) -> Result<Category, Error> {
        let category = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name FROM category WHERE name = :name")?
            .query_row(&[(":name", &name)], Self::map_row)?;

        Ok(category)
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE
                    )",
            (),
        )?;

        let mut statement =
            connection.prepare("INSERT OR IGNORE INTO category (name) VALUES (?1)")?;

        for name in DEFAULT_CATEGORIES {
            statement.execute((name,))?;
        }

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let name = row.get(offset + 1)?;

        Ok(Category::new(id, name))
    }
}

#[cfg(test)]
mod sqlite_category_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{Error, db::initialize, stores::CategoryStore};

    use super::{DEFAULT_CATEGORIES, SQLiteCategoryStore};

    fn get_store() -> SQLiteCategoryStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteCategoryStore::new(Arc::new(Mutex::new(connection)))
    }

    #[test]
    fn get_all_returns_the_seeded_catalog() {
        let store = get_store();

        let categories = store.get_all().unwrap();

        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());

        let names: Vec<_> = categories
            .iter()
            .map(|category| category.name().to_owned())
            .collect();

        assert_eq!(names, DEFAULT_CATEGORIES);
    }

    #[test]
    fn get_by_name_finds_a_seeded_entry() {
        let store = get_store();

        let category = store.get_by_name("Groceries").unwrap();

        assert_eq!(category.name(), "Groceries");
        assert!(category.id() > 0);
    }

    #[test]
    fn get_by_name_fails_on_an_unknown_name() {
        let store = get_store();

        let maybe_category = store.get_by_name("Yacht Maintenance");

        assert_eq!(maybe_category, Err(Error::NotFound));
    }
}
