use std::path::PathBuf;

use colored::Colorize;

use crate::cli::open_db;
use crate::error::Result;
use crate::expenses::add_expenses_from_csv;
use crate::parser::{parse_delimiter, ColumnMapping, CsvOptions};
use crate::settings::load_settings;

pub struct LoadCsvArgs<'a> {
    pub csv_path: &'a str,
    pub sep: &'a str,
    pub category_column_name: &'a str,
    pub expense_column_name: &'a str,
    pub amount_column_name: &'a str,
    pub date_column_name: &'a str,
    pub ensure_unique: bool,
}

pub fn run(args: LoadCsvArgs<'_>) -> Result<()> {
    let settings = load_settings();
    let options = CsvOptions {
        delimiter: parse_delimiter(args.sep)?,
        columns: ColumnMapping {
            category: args.category_column_name.to_string(),
            name: args.expense_column_name.to_string(),
            amount: args.amount_column_name.to_string(),
            date: args.date_column_name.to_string(),
        },
        number_format: settings.number_format()?,
    };
    let conn = open_db()?;

    let report = add_expenses_from_csv(
        &conn,
        &PathBuf::from(args.csv_path),
        &options,
        args.ensure_unique,
    )?;

    println!(
        "{} (from {} rows)",
        format!("Added '{}' new expenses", report.written).green().bold(),
        report.candidates
    );
    if report.skipped() > 0 {
        println!(
            "{} skipped ({} already stored, {} repeated in file, {} rejected by the store)",
            report.skipped(),
            report.already_stored,
            report.repeated_in_batch,
            report.conflicts
        );
    }
    Ok(())
}
