//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{
        CategorisedTransaction, DatabaseID, Statement, Transaction, TransactionData,
        TransactionKind, UserID,
    },
    stores::TransactionStore,
};

/// Stores transactions in a SQLite database.
///
/// Note that transactions reference the user and category tables, so those
/// models must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::ConstraintViolation] if `data.category_id` does not refer
    ///   to a catalog entry,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, user_id: UserID, data: TransactionData) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO \"transaction\" (kind, description, amount, date, user_id, category_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, kind, description, amount, date, user_id, category_id",
            )?
            .query_row(
                (
                    data.kind,
                    &data.description,
                    data.amount,
                    &data.date,
                    user_id.as_i64(),
                    data.category_id,
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, kind, description, amount, date, user_id, category_id
                 FROM \"transaction\" WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(transaction)
    }

    /// Retrieve the transactions owned by `user_id`, joined with their
    /// category names, newest date first with ties broken by descending ID.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn get_by_user(
        &self,
        user_id: UserID,
        category_id: Option<DatabaseID>,
    ) -> Result<Vec<CategorisedTransaction>, Error> {
        let mut query_string = String::from(
            "SELECT t.id, t.kind, t.description, t.amount, t.date, t.user_id, t.category_id, c.name
             FROM \"transaction\" t
             INNER JOIN category c ON t.category_id = c.id
             WHERE t.user_id = ?1",
        );
        let mut query_parameters = vec![Value::Integer(user_id.as_i64())];

        if let Some(category_id) = category_id {
            query_string.push_str(" AND t.category_id = ?2");
            query_parameters.push(Value::Integer(category_id));
        }

        query_string.push_str(" ORDER BY t.date DESC, t.id DESC");

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params_from_iter(query_parameters.iter()), |row| {
                let transaction = Self::map_row(row)?;

                Ok(CategorisedTransaction {
                    id: transaction.id(),
                    kind: transaction.kind(),
                    description: transaction.description().to_owned(),
                    amount: transaction.amount(),
                    date: *transaction.date(),
                    user_id: transaction.user_id(),
                    category_id: transaction.category_id(),
                    category_name: row.get(7)?,
                })
            })?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Replace the mutable fields of the transaction `id` owned by
    /// `user_id`.
    ///
    /// The match predicate includes the owner, so another user's rows can
    /// never be edited and a foreign row is indistinguishable from a
    /// missing one.
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
    ) -> Result<(), Error> {
        let rows_affected = self.connection.lock().unwrap().execute(
            "UPDATE \"transaction\"
             SET kind = ?1, description = ?2, amount = ?3, date = ?4, category_id = ?5
             WHERE id = ?6 AND user_id = ?7",
            (
                data.kind,
                &data.description,
                data.amount,
                &data.date,
                data.category_id,
                id,
                user_id.as_i64(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::InvalidEdit);
        }

        Ok(())
    }

    /// Delete the transaction `id` if it is owned by `user_id`.
    ///
    /// The ownership check and the delete run inside one SQLite transaction
    /// so the pair cannot race with a concurrent write.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no row matches both `id` and `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<(), Error> {
        let connection = self.connection.lock().unwrap();
        let tx = connection.unchecked_transaction()?;

        let owned: bool = tx
            .prepare(
                "SELECT EXISTS (SELECT 1 FROM \"transaction\" WHERE id = ?1 AND user_id = ?2)",
            )?
            .query_row((id, user_id.as_i64()), |row| row.get(0))?;

        if !owned {
            return Err(Error::NotFound);
        }

        tx.execute("DELETE FROM \"transaction\" WHERE id = ?1", (id,))?;

        tx.commit()?;

        Ok(())
    }

    /// Compute the income total, expense total and balance for `user_id`.
    ///
    /// Both sums are computed by a single statement, so they always come
    /// from the same snapshot of the ledger.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn statement(&self, user_id: UserID) -> Result<Statement, Error> {
        let (income, expense) = self.connection.lock().unwrap().query_row(
            "SELECT
                COALESCE(SUM(CASE WHEN kind = 'income' THEN amount END), 0.0),
                COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount END), 0.0)
             FROM \"transaction\" WHERE user_id = ?1",
            (user_id.as_i64(),),
            |row| Ok((row.get::<_, f64>(0)?, row.get::<_, f64>(1)?)),
        )?;

        Ok(Statement {
            income,
            expense,
            balance: income - expense,
        })
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                    description TEXT NOT NULL,
                    amount REAL NOT NULL CHECK (amount >= 0),
                    date TEXT NOT NULL,
                    user_id INTEGER NOT NULL,
                    category_id INTEGER NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let kind: TransactionKind = row.get(offset + 1)?;
        let description = row.get(offset + 2)?;
        let amount = row.get(offset + 3)?;
        let date = row.get(offset + 4)?;
        let user_id = UserID::new(row.get(offset + 5)?);
        let category_id = row.get(offset + 6)?;

        Ok(Transaction::new(
            id,
            kind,
            description,
            amount,
            date,
            user_id,
            category_id,
        ))
    }
}

#[cfg(test)]
mod sqlite_transaction_store_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        models::{DatabaseID, PasswordHash, TransactionData, TransactionKind, UserID},
        stores::{
            CategoryStore, TransactionStore, UserStore,
            sqlite::{SQLAppState, create_app_state},
        },
    };

    fn get_app_state_and_user() -> (SQLAppState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        let mut state = create_app_state(connection, "stneaoetse").unwrap();

        let user = state
            .user_store
            .create(
                "Test",
                "test@test.com",
                PasswordHash::from_string("notarealhash".to_string()),
            )
            .unwrap();

        (state, user.id())
    }

    fn get_category_id(state: &SQLAppState, name: &str) -> DatabaseID {
        state.category_store.get_by_name(name).unwrap().id()
    }

    fn get_data(state: &SQLAppState, kind: TransactionKind, amount: f64) -> TransactionData {
        TransactionData {
            kind,
            description: "Rust Pie".to_string(),
            amount,
            date: date!(2026 - 07 - 01),
            category_id: get_category_id(state, "Groceries"),
        }
    }

    #[test]
    fn create_succeeds() {
        let (mut state, user_id) = get_app_state_and_user();
        let data = get_data(&state, TransactionKind::Expense, 12.3);

        let transaction = state
            .transaction_store
            .create(user_id, data.clone())
            .unwrap();

        assert!(transaction.id() > 0);
        assert_eq!(transaction.kind(), data.kind);
        assert_eq!(transaction.description(), data.description);
        assert_eq!(transaction.amount(), data.amount);
        assert_eq!(*transaction.date(), data.date);
        assert_eq!(transaction.user_id(), user_id);
        assert_eq!(transaction.category_id(), data.category_id);
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let (mut state, user_id) = get_app_state_and_user();
        let data = TransactionData {
            category_id: 999_999,
            ..get_data(&state, TransactionKind::Expense, 12.3)
        };

        let maybe_transaction = state.transaction_store.create(user_id, data);

        assert!(
            matches!(maybe_transaction, Err(Error::ConstraintViolation(_))),
            "want constraint violation, got {maybe_transaction:?}"
        );
    }

    #[test]
    fn get_transaction_by_id_succeeds() {
        let (mut state, user_id) = get_app_state_and_user();
        let data = get_data(&state, TransactionKind::Income, 500.0);
        let transaction = state.transaction_store.create(user_id, data).unwrap();

        let selected_transaction = state.transaction_store.get(transaction.id());

        assert_eq!(Ok(transaction), selected_transaction);
    }

    #[test]
    fn get_transaction_fails_on_invalid_id() {
        let (mut state, user_id) = get_app_state_and_user();
        let data = get_data(&state, TransactionKind::Income, 500.0);
        let transaction = state.transaction_store.create(user_id, data).unwrap();

        let maybe_transaction = state.transaction_store.get(transaction.id() + 654);

        assert_eq!(maybe_transaction, Err(Error::NotFound));
    }

    #[test]
    fn get_by_user_only_returns_the_owners_transactions() {
        let (mut state, user_id) = get_app_state_and_user();
        let other_user = state
            .user_store
            .create(
                "Other",
                "other@test.com",
                PasswordHash::from_string("notarealhash".to_string()),
            )
            .unwrap();

        let data = get_data(&state, TransactionKind::Expense, 12.3);
        let transaction = state
            .transaction_store
            .create(user_id, data.clone())
            .unwrap();
        state
            .transaction_store
            .create(other_user.id(), data)
            .unwrap();

        let transactions = state.transaction_store.get_by_user(user_id, None).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].id, transaction.id());
        assert_eq!(transactions[0].user_id, user_id);
        assert_eq!(transactions[0].category_name, "Groceries");
    }

    #[test]
    fn get_by_user_returns_newest_first() {
        let (mut state, user_id) = get_app_state_and_user();

        for (amount, date) in [
            (1.0, date!(2026 - 07 - 01)),
            (2.0, date!(2026 - 07 - 03)),
            (3.0, date!(2026 - 07 - 02)),
        ] {
            let data = TransactionData {
                date,
                ..get_data(&state, TransactionKind::Expense, amount)
            };
            state.transaction_store.create(user_id, data).unwrap();
        }

        let transactions = state.transaction_store.get_by_user(user_id, None).unwrap();

        let dates: Vec<_> = transactions
            .iter()
            .map(|transaction| transaction.date)
            .collect();

        assert_eq!(
            dates,
            vec![
                date!(2026 - 07 - 03),
                date!(2026 - 07 - 02),
                date!(2026 - 07 - 01)
            ]
        );
    }

    #[test]
    fn get_by_user_filters_by_category() {
        let (mut state, user_id) = get_app_state_and_user();
        let groceries = get_category_id(&state, "Groceries");
        let transport = get_category_id(&state, "Transport");

        for category_id in [groceries, transport, groceries] {
            let data = TransactionData {
                category_id,
                ..get_data(&state, TransactionKind::Expense, 10.0)
            };
            state.transaction_store.create(user_id, data).unwrap();
        }

        let transactions = state
            .transaction_store
            .get_by_user(user_id, Some(transport))
            .unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].category_id, transport);
        assert_eq!(transactions[0].category_name, "Transport");
    }

    #[test]
    fn update_replaces_the_mutable_fields() {
        let (mut state, user_id) = get_app_state_and_user();
        let data = get_data(&state, TransactionKind::Expense, 12.3);
        let transaction = state.transaction_store.create(user_id, data).unwrap();

        let new_data = TransactionData {
            kind: TransactionKind::Income,
            description: "Refund".to_string(),
            amount: 45.6,
            date: date!(2026 - 07 - 02),
            category_id: get_category_id(&state, "Other Income"),
        };
        state
            .transaction_store
            .update(transaction.id(), user_id, new_data.clone())
            .unwrap();

        let updated = state.transaction_store.get(transaction.id()).unwrap();

        assert_eq!(updated.kind(), new_data.kind);
        assert_eq!(updated.description(), new_data.description);
        assert_eq!(updated.amount(), new_data.amount);
        assert_eq!(*updated.date(), new_data.date);
        assert_eq!(updated.category_id(), new_data.category_id);
        assert_eq!(updated.user_id(), user_id, "the owner must never change");
    }

    #[test]
    fn update_fails_on_invalid_id() {
        let (mut state, user_id) = get_app_state_and_user();
        let data = get_data(&state, TransactionKind::Expense, 12.3);

        let result = state.transaction_store.update(999, user_id, data);

        assert_eq!(result, Err(Error::InvalidEdit));
    }

    #[test]
    fn update_fails_on_wrong_user_and_leaves_the_row_unchanged() {
        let (mut state, user_id) = get_app_state_and_user();
        let other_user = state
            .user_store
            .create(
                "Other",
                "other@test.com",
                PasswordHash::from_string("notarealhash".to_string()),
            )
            .unwrap();

        let data = get_data(&state, TransactionKind::Expense, 12.3);
        let transaction = state
            .transaction_store
            .create(user_id, data.clone())
            .unwrap();

        let new_data = TransactionData {
            description: "Hijacked".to_string(),
            ..data
        };
        let result = state
            .transaction_store
            .update(transaction.id(), other_user.id(), new_data);

        assert_eq!(result, Err(Error::InvalidEdit));
        assert_eq!(
            state.transaction_store.get(transaction.id()),
            Ok(transaction)
        );
    }

    #[test]
    fn delete_removes_the_transaction() {
        let (mut state, user_id) = get_app_state_and_user();
        let data = get_data(&state, TransactionKind::Expense, 12.3);
        let transaction = state.transaction_store.create(user_id, data).unwrap();

        state
            .transaction_store
            .delete(transaction.id(), user_id)
            .unwrap();

        assert_eq!(
            state.transaction_store.get(transaction.id()),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_twice_fails_the_second_time() {
        let (mut state, user_id) = get_app_state_and_user();
        let data = get_data(&state, TransactionKind::Expense, 12.3);
        let transaction = state.transaction_store.create(user_id, data).unwrap();

        state
            .transaction_store
            .delete(transaction.id(), user_id)
            .unwrap();
        let second_delete = state.transaction_store.delete(transaction.id(), user_id);

        assert_eq!(second_delete, Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_on_wrong_user_and_leaves_the_row_in_place() {
        let (mut state, user_id) = get_app_state_and_user();
        let other_user = state
            .user_store
            .create(
                "Other",
                "other@test.com",
                PasswordHash::from_string("notarealhash".to_string()),
            )
            .unwrap();

        let data = get_data(&state, TransactionKind::Expense, 12.3);
        let transaction = state.transaction_store.create(user_id, data).unwrap();

        let result = state
            .transaction_store
            .delete(transaction.id(), other_user.id());

        assert_eq!(result, Err(Error::NotFound));
        assert!(state.transaction_store.get(transaction.id()).is_ok());
    }

    #[test]
    fn statement_sums_income_and_expenses() {
        let (mut state, user_id) = get_app_state_and_user();

        for (kind, amount) in [
            (TransactionKind::Income, 500.0),
            (TransactionKind::Expense, 120.0),
        ] {
            let data = get_data(&state, kind, amount);
            state.transaction_store.create(user_id, data).unwrap();
        }

        let statement = state.transaction_store.statement(user_id).unwrap();

        assert_eq!(statement.income, 500.0);
        assert_eq!(statement.expense, 120.0);
        assert_eq!(statement.balance, 380.0);
    }

    #[test]
    fn statement_is_all_zeroes_for_an_empty_ledger() {
        let (state, user_id) = get_app_state_and_user();

        let statement = state.transaction_store.statement(user_id).unwrap();

        assert_eq!(statement.income, 0.0);
        assert_eq!(statement.expense, 0.0);
        assert_eq!(statement.balance, 0.0);
    }

    #[test]
    fn statement_only_counts_the_owners_transactions() {
        let (mut state, user_id) = get_app_state_and_user();
        let other_user = state
            .user_store
            .create(
                "Other",
                "other@test.com",
                PasswordHash::from_string("notarealhash".to_string()),
            )
            .unwrap();

        let data = get_data(&state, TransactionKind::Income, 999.0);
        state
            .transaction_store
            .create(other_user.id(), data)
            .unwrap();

        let statement = state.transaction_store.statement(user_id).unwrap();

        assert_eq!(statement.income, 0.0);
        assert_eq!(statement.balance, 0.0);
    }
}
