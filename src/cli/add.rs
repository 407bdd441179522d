use colored::Colorize;

use crate::categories::find_category;
use crate::cli::open_db;
use crate::error::Result;
use crate::expenses::add_expense;
use crate::models::{today, Expense};
use crate::parser::parse_date;

pub fn run(
    expense_name: &str,
    category_name: &str,
    amount: f64,
    date: Option<&str>,
    ensure_unique: bool,
) -> Result<()> {
    let date = match date {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };
    let conn = open_db()?;

    let expense = Expense {
        name: expense_name.to_string(),
        category_name: category_name.to_string(),
        amount,
        date,
    };
    if add_expense(&conn, expense, ensure_unique)? == 1 {
        println!("{}", "Successfully added expense!".green().bold());
        if !find_category(&conn, category_name)? {
            println!(
                "Note: category '{category_name}' is not registered. Add it with `monstera categories add`."
            );
        }
    } else {
        println!(
            "{} Insertion of expense {expense_name} failed. Please check if the expense already exists.",
            "Warning!".red().bold()
        );
    }
    Ok(())
}
