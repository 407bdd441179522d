use rusqlite::Connection;

use crate::db;
use crate::error::Result;
use crate::models::{now, Category};

/// Store a new category. Returns false if the name is already taken.
pub fn add_category(conn: &Connection, name: &str) -> Result<bool> {
    let outcome = db::write(conn, &[Category::new(name, now())])?;
    Ok(outcome.written == 1)
}

/// True iff exactly one category was removed.
pub fn delete_category(conn: &Connection, name: &str) -> Result<bool> {
    let affected = db::delete_where::<Category>(conn, "category_name", &name)?;
    Ok(affected == 1)
}

/// Category names in insertion order.
pub fn get_all_categories(conn: &Connection) -> Result<Vec<String>> {
    let categories: Vec<Category> = db::read_all(conn)?;
    Ok(categories.into_iter().map(|c| c.name).collect())
}

pub fn find_category(conn: &Connection, name: &str) -> Result<bool> {
    let rows = db::execute(
        conn,
        "SELECT category_name FROM categories WHERE category_name = ?1",
        &[&name],
    )?;
    Ok(rows.len() == 1)
}
