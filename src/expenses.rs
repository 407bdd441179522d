use std::path::Path;

use rusqlite::Connection;

use crate::db;
use crate::error::Result;
use crate::ingest::{ingest, IngestReport};
use crate::models::{now, Expense, ExpenseRow};
use crate::parser::{read_expenses_file, CsvOptions};

/// Insert a single expense. Returns 1 if it was stored, 0 if its identity
/// already existed.
pub fn add_expense(conn: &Connection, expense: Expense, ensure_unique: bool) -> Result<usize> {
    let report = ingest(conn, vec![expense.into_row(now())], ensure_unique)?;
    Ok(report.written)
}

/// Parse a CSV file and ingest every row, stamped with one load date.
pub fn add_expenses_from_csv(
    conn: &Connection,
    csv_path: &Path,
    options: &CsvOptions,
    ensure_unique: bool,
) -> Result<IngestReport> {
    let expenses = read_expenses_file(csv_path, options)?;
    let load_date = now();
    let rows: Vec<ExpenseRow> = expenses.into_iter().map(|e| e.into_row(load_date)).collect();
    ingest(conn, rows, ensure_unique)
}

pub fn get_all_expenses(conn: &Connection) -> Result<Vec<ExpenseRow>> {
    db::read_all(conn)
}

/// True iff exactly one expense had this identity.
pub fn delete_expense(conn: &Connection, expense_gid: &str) -> Result<bool> {
    let affected = db::delete_where::<ExpenseRow>(conn, "expense_gid", &expense_gid)?;
    Ok(affected == 1)
}
