pub mod add;
pub mod categories;
pub mod delete;
pub mod init;
pub mod list;
pub mod load_csv;
pub mod reset;
pub mod status;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::{MonsteraError, Result};
use crate::settings::load_settings;

/// Open the configured database, refusing to create one implicitly.
pub(crate) fn open_db() -> Result<Connection> {
    let db_path = load_settings().db_path();
    if !db_path.exists() {
        return Err(MonsteraError::Settings(format!(
            "No database found at {}\nRun `monstera init` to create one.",
            db_path.display()
        )));
    }
    get_connection(&db_path)
}

#[derive(Parser)]
#[command(name = "monstera", about = "Track personal expenses in a local database.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and create the database schema.
    Init {
        /// Path for monstera data (default: ~/Documents/monstera)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Empty the database and recreate its tables.
    Reset,
    /// Add a single expense.
    Add {
        /// Expense name, e.g. 'coffee'
        expense_name: String,
        /// Category name
        category_name: String,
        /// Amount, e.g. 3.50
        amount: f64,
        /// Date: YYYY-MM-DD (default: today, UTC)
        date: Option<String>,
        /// Skip the insert if an identical expense is already stored
        #[arg(action = ArgAction::Set, default_value_t = true, value_parser = BoolishValueParser::new())]
        ensure_unique: bool,
    },
    /// Import expenses from a CSV file.
    #[command(name = "load-csv")]
    LoadCsv {
        /// Path to the CSV file
        csv_path: String,
        /// Field separator, e.g. ';' or ',' ('\t' for tab)
        sep: String,
        /// Header of the category column
        category_column_name: String,
        /// Header of the expense name column
        expense_column_name: String,
        /// Header of the amount column
        amount_column_name: String,
        /// Header of the date column
        date_column_name: String,
        /// Skip rows already stored or repeated in the file
        #[arg(action = ArgAction::Set, default_value_t = true, value_parser = BoolishValueParser::new())]
        ensure_unique: bool,
    },
    /// List all expenses.
    List,
    /// Delete an expense by its identity (shown in `monstera list`).
    Delete {
        expense_gid: String,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// Add a category.
    Add {
        name: String,
    },
    /// List all categories.
    List,
    /// Delete a category by name.
    Delete {
        name: String,
    },
}
