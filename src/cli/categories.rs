use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::categories::{add_category, delete_category};
use crate::cli::open_db;
use crate::db;
use crate::error::Result;
use crate::fmt;
use crate::models::Category;

pub fn add(name: &str) -> Result<()> {
    let conn = open_db()?;
    if add_category(&conn, name)? {
        println!("{} {name}", "Added category:".green().bold());
    } else {
        println!(
            "{} Insertion of category {name} failed. Please check if the category already exists.",
            "Warning!".red().bold()
        );
    }
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = open_db()?;
    let categories: Vec<Category> = db::read_all(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "ID", "Loaded"]);
    for cat in &categories {
        table.add_row(vec![
            Cell::new(&cat.name),
            Cell::new(&cat.gid),
            Cell::new(fmt::timestamp(&cat.load_date)),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn delete(name: &str) -> Result<()> {
    let conn = open_db()?;
    if delete_category(&conn, name)? {
        println!("{} {name}", "Deleted category:".green().bold());
    } else {
        println!("{} No category named {name}.", "Warning!".red().bold());
    }
    Ok(())
}
