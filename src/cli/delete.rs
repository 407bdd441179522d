use colored::Colorize;

use crate::cli::open_db;
use crate::error::Result;
use crate::expenses::delete_expense;

pub fn run(expense_gid: &str) -> Result<()> {
    let conn = open_db()?;
    if delete_expense(&conn, expense_gid)? {
        println!("{} {expense_gid}", "Deleted expense".green().bold());
    } else {
        println!("{} No expense with id {expense_gid}.", "Warning!".red().bold());
    }
    Ok(())
}
