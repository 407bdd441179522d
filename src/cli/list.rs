use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::open_db;
use crate::error::Result;
use crate::expenses::get_all_expenses;
use crate::fmt;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let number_format = load_settings().number_format()?;
    let conn = open_db()?;
    let expenses = get_all_expenses(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Category", "Name", "Amount", "Date", "Loaded"]);
    for e in &expenses {
        table.add_row(vec![
            Cell::new(&e.gid),
            Cell::new(&e.category_name),
            Cell::new(&e.name),
            Cell::new(fmt::amount(e.amount, &number_format)).set_alignment(CellAlignment::Right),
            Cell::new(e.date.format("%Y-%m-%d")),
            Cell::new(fmt::timestamp(&e.load_date)),
        ]);
    }
    println!("Expenses ({})\n{table}", expenses.len());
    Ok(())
}
