use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, ToSql, Value, ValueRef};
use rusqlite::{Connection, ErrorCode, Row};

use crate::error::{MonsteraError, Result};
use crate::models::{Category, ExpenseRow};

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS categories (
    category_name TEXT PRIMARY KEY,
    category_gid TEXT NOT NULL UNIQUE,
    load_date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS ix_categories_load_date ON categories (load_date);

CREATE TABLE IF NOT EXISTS expenses (
    expense_gid TEXT PRIMARY KEY,
    category_name TEXT NOT NULL,
    expense_name TEXT NOT NULL,
    amount REAL NOT NULL,
    date TEXT NOT NULL,
    load_date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS ix_expenses_expense_name ON expenses (expense_name);
CREATE INDEX IF NOT EXISTS ix_expenses_amount ON expenses (amount);
CREATE INDEX IF NOT EXISTS ix_expenses_date ON expenses (date);
CREATE INDEX IF NOT EXISTS ix_expenses_load_date ON expenses (load_date);
";

pub const DB_FILE: &str = "monstera.db";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Drop both tables and recreate them empty.
pub fn reset_db(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS expenses; DROP TABLE IF EXISTS categories;")?;
    init_db(conn)
}

// ---------------------------------------------------------------------------
// Column codecs
// ---------------------------------------------------------------------------

/// Calendar dates are stored as `YYYY-MM-DD` text.
pub struct SqlDate(pub NaiveDate);

impl ToSql for SqlDate {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(self.0.format("%Y-%m-%d").to_string().into())
    }
}

impl FromSql for SqlDate {
    fn column_result(value: ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let s = value.as_str()?;
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(SqlDate)
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Load timestamps are stored as RFC 3339 UTC text.
pub struct SqlTimestamp(pub DateTime<Utc>);

impl ToSql for SqlTimestamp {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(self.0.to_rfc3339().into())
    }
}

impl FromSql for SqlTimestamp {
    fn column_result(value: ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let s = value.as_str()?;
        DateTime::parse_from_rfc3339(s)
            .map(|dt| SqlTimestamp(dt.with_timezone(&Utc)))
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// A record type persisted in one table, keyed by a text primary key.
pub trait Table: Sized {
    const NAME: &'static str;
    /// Column list; the first entry is the primary key.
    const COLUMNS: &'static [&'static str];

    fn key(&self) -> &str;
    fn values(&self) -> Vec<Box<dyn ToSql + '_>>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl Table for Category {
    const NAME: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &["category_name", "category_gid", "load_date"];

    fn key(&self) -> &str {
        &self.name
    }

    fn values(&self) -> Vec<Box<dyn ToSql + '_>> {
        vec![
            Box::new(&self.name),
            Box::new(&self.gid),
            Box::new(SqlTimestamp(self.load_date)),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Category {
            name: row.get(0)?,
            gid: row.get(1)?,
            load_date: row.get::<_, SqlTimestamp>(2)?.0,
        })
    }
}

impl Table for ExpenseRow {
    const NAME: &'static str = "expenses";
    const COLUMNS: &'static [&'static str] = &[
        "expense_gid",
        "category_name",
        "expense_name",
        "amount",
        "date",
        "load_date",
    ];

    fn key(&self) -> &str {
        &self.gid
    }

    fn values(&self) -> Vec<Box<dyn ToSql + '_>> {
        vec![
            Box::new(&self.gid),
            Box::new(&self.category_name),
            Box::new(&self.name),
            Box::new(self.amount),
            Box::new(SqlDate(self.date)),
            Box::new(SqlTimestamp(self.load_date)),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ExpenseRow {
            gid: row.get(0)?,
            category_name: row.get(1)?,
            name: row.get(2)?,
            amount: row.get(3)?,
            date: row.get::<_, SqlDate>(4)?.0,
            load_date: row.get::<_, SqlTimestamp>(5)?.0,
        })
    }
}

fn checked_column<T: Table>(column: &str) -> Result<&'static str> {
    T::COLUMNS
        .iter()
        .find(|c| **c == column)
        .copied()
        .ok_or_else(|| MonsteraError::UnknownColumn {
            table: T::NAME,
            column: column.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Gateway operations
// ---------------------------------------------------------------------------

/// Whether `err` is a primary-key or unique constraint conflict.
pub fn is_duplicate_key(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
        }
        _ => false,
    }
}

/// Rows in insertion order.
pub fn read_all<T: Table>(conn: &Connection) -> Result<Vec<T>> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY rowid",
        T::COLUMNS.join(", "),
        T::NAME
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| T::from_row(row))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    log::debug!("read {} rows from {}", rows.len(), T::NAME);
    Ok(rows)
}

/// Every primary key currently stored in `T`'s table.
pub fn read_keys<T: Table>(conn: &Connection) -> Result<HashSet<String>> {
    let sql = format!("SELECT {} FROM {}", T::COLUMNS[0], T::NAME);
    let mut stmt = conn.prepare(&sql)?;
    let keys = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(keys)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub written: usize,
    /// Rows rejected because their key already existed.
    pub duplicates: usize,
}

/// Insert `rows` in a single transaction.
///
/// Key conflicts skip the offending row and are counted in `duplicates`.
/// Any other failure rolls the whole batch back and is returned.
pub fn write<T: Table>(conn: &Connection, rows: &[T]) -> Result<WriteOutcome> {
    let mut outcome = WriteOutcome::default();
    if rows.is_empty() {
        return Ok(outcome);
    }

    let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        T::NAME,
        T::COLUMNS.join(", "),
        placeholders.join(", ")
    );

    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(&sql)?;
        for row in rows {
            let values = row.values();
            let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
            match stmt.execute(params.as_slice()) {
                Ok(n) => outcome.written += n,
                Err(e) if is_duplicate_key(&e) => {
                    log::warn!("{}: key {} already stored, row skipped", T::NAME, row.key());
                    outcome.duplicates += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    tx.commit()?;
    log::debug!(
        "wrote {} rows to {} ({} duplicates)",
        outcome.written,
        T::NAME,
        outcome.duplicates
    );
    Ok(outcome)
}

/// Delete rows of `T` whose `column` equals `value`. Returns rows affected.
pub fn delete_where<T: Table>(conn: &Connection, column: &str, value: &dyn ToSql) -> Result<usize> {
    let column = checked_column::<T>(column)?;
    let sql = format!("DELETE FROM {} WHERE {} = ?1", T::NAME, column);
    let affected = conn.execute(&sql, &[value])?;
    log::debug!("deleted {affected} rows from {}", T::NAME);
    Ok(affected)
}

/// Run an arbitrary statement and collect whatever rows it yields.
pub fn execute(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Vec<Value>>> {
    let mut stmt = conn.prepare(sql)?;
    let width = stmt.column_count();
    let rows = stmt
        .query_map(params, |row| (0..width).map(|i| row.get::<_, Value>(i)).collect())?
        .collect::<std::result::Result<Vec<Vec<Value>>, _>>()?;
    Ok(rows)
}

pub fn count<T: Table>(conn: &Connection) -> Result<i64> {
    let sql = format!("SELECT count(*) FROM {}", T::NAME);
    Ok(conn.query_row(&sql, [], |r| r.get(0))?)
}
