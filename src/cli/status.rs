use crate::categories::get_all_categories;
use crate::db::{self, get_connection};
use crate::error::Result;
use crate::models::ExpenseRow;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();

    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!(
        "Amounts:    decimal '{}', grouping '{}'",
        settings.decimal_separator, settings.grouping_separator
    );
    if let Err(e) = settings.number_format() {
        println!("            {e}");
    }

    if db_path.exists() {
        let conn = get_connection(&db_path)?;
        let expenses = db::count::<ExpenseRow>(&conn)?;
        let categories = get_all_categories(&conn)?;

        println!();
        println!("Expenses:    {expenses}");
        println!("Categories:  {}", categories.len());
        if !categories.is_empty() {
            println!("             {}", categories.join(", "));
        }
    } else {
        println!();
        println!("Database not found. Run `monstera init` to set up.");
    }

    Ok(())
}
