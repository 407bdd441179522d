use colored::Colorize;

use crate::cli::open_db;
use crate::db::reset_db;
use crate::error::Result;

pub fn run() -> Result<()> {
    let conn = open_db()?;
    reset_db(&conn)?;
    println!("{}", "Reset database".green().bold());
    Ok(())
}
