use chrono::{DateTime, NaiveDate, Utc};

use crate::gid::Gid;

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub gid: String,
    pub load_date: DateTime<Utc>,
}

impl Category {
    pub fn new(name: &str, load_date: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            gid: Gid::Categories.create(&[&name]),
            load_date,
        }
    }
}

/// The semantic content of an expense, before it is stamped with a load date.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub name: String,
    pub category_name: String,
    pub amount: f64,
    pub date: NaiveDate,
}

impl Expense {
    /// Identity over (name, category, amount, date), in that order.
    pub fn gid(&self) -> String {
        Gid::Expenses.create(&[&self.name, &self.category_name, &self.amount, &self.date])
    }

    pub fn into_row(self, load_date: DateTime<Utc>) -> ExpenseRow {
        ExpenseRow {
            gid: self.gid(),
            name: self.name,
            category_name: self.category_name,
            amount: self.amount,
            date: self.date,
            load_date,
        }
    }
}

/// An expense as stored in the `expenses` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub gid: String,
    pub name: String,
    pub category_name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub load_date: DateTime<Utc>,
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
