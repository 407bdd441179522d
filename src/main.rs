mod categories;
mod cli;
mod db;
mod error;
mod expenses;
mod fmt;
mod gid;
mod ingest;
mod models;
mod parser;
mod settings;

use clap::Parser;

use cli::{CategoriesCommands, Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Reset => cli::reset::run(),
        Commands::Add {
            expense_name,
            category_name,
            amount,
            date,
            ensure_unique,
        } => cli::add::run(&expense_name, &category_name, amount, date.as_deref(), ensure_unique),
        Commands::LoadCsv {
            csv_path,
            sep,
            category_column_name,
            expense_column_name,
            amount_column_name,
            date_column_name,
            ensure_unique,
        } => cli::load_csv::run(cli::load_csv::LoadCsvArgs {
            csv_path: &csv_path,
            sep: &sep,
            category_column_name: &category_column_name,
            expense_column_name: &expense_column_name,
            amount_column_name: &amount_column_name,
            date_column_name: &date_column_name,
            ensure_unique,
        }),
        Commands::List => cli::list::run(),
        Commands::Delete { expense_gid } => cli::delete::run(&expense_gid),
        Commands::Categories { command } => match command {
            CategoriesCommands::Add { name } => cli::categories::add(&name),
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Delete { name } => cli::categories::delete(&name),
        },
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
