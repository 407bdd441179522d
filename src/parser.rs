use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{MonsteraError, ParseError, Result};
use crate::models::Expense;

/// Separator convention for amounts such as `1.234,56` or `1,234.56`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal_separator: ',',
            grouping_separator: '.',
        }
    }
}

impl NumberFormat {
    #[cfg(test)]
    pub const POINT: NumberFormat = NumberFormat {
        decimal_separator: '.',
        grouping_separator: ',',
    };

    /// Separators must differ and must not be digits.
    pub fn new(decimal_separator: char, grouping_separator: char) -> Result<Self> {
        if decimal_separator == grouping_separator {
            return Err(MonsteraError::Settings(format!(
                "decimal and grouping separators must differ (both are {decimal_separator:?})"
            )));
        }
        if let Some(c) = [decimal_separator, grouping_separator]
            .into_iter()
            .find(|c| c.is_ascii_digit())
        {
            return Err(MonsteraError::Settings(format!(
                "a digit cannot be used as a separator: {c:?}"
            )));
        }
        Ok(Self {
            decimal_separator,
            grouping_separator,
        })
    }
}

/// Amount extractor for one [`NumberFormat`], with its pattern compiled once.
#[derive(Debug, Clone)]
pub struct AmountParser {
    format: NumberFormat,
    pattern: Regex,
}

impl AmountParser {
    pub fn new(format: NumberFormat) -> Result<Self> {
        let format = NumberFormat::new(format.decimal_separator, format.grouping_separator)?;
        let seps = format!(
            "{}{}",
            regex::escape(&format.decimal_separator.to_string()),
            regex::escape(&format.grouping_separator.to_string())
        );
        // Digits, optional groups, and a mandatory fractional part.
        let pattern = Regex::new(&format!(r"\d+(?:[{seps}]?\d+)*(?:[{seps}]\d+)\b"))
            .map_err(|e| MonsteraError::Settings(format!("bad amount separators: {e}")))?;
        Ok(Self { format, pattern })
    }

    /// Extract the first amount-looking substring of `raw` and convert it.
    pub fn parse_amount(&self, raw: &str) -> std::result::Result<f64, ParseError> {
        let m = self
            .pattern
            .find(raw)
            .ok_or_else(|| ParseError::Amount(raw.to_string()))?;
        let normalized: String = m
            .as_str()
            .chars()
            .filter(|c| *c != self.format.grouping_separator)
            .map(|c| if c == self.format.decimal_separator { '.' } else { c })
            .collect();
        normalized
            .parse::<f64>()
            .map_err(|_| ParseError::Amount(raw.to_string()))
    }
}

/// Parse `YYYY-MM-DD`, also accepting `.` as the separator. Components are
/// never reordered: `15.01.2024` is rejected.
pub fn parse_date(raw: &str) -> std::result::Result<NaiveDate, ParseError> {
    let normalized = raw.trim().replace('.', "-");
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").map_err(|_| ParseError::Date(raw.to_string()))
}

// ---------------------------------------------------------------------------
// CSV extraction
// ---------------------------------------------------------------------------

/// Header names of the columns holding each expense field.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub category: String,
    pub name: String,
    pub amount: String,
    pub date: String,
}

#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub columns: ColumnMapping,
    pub number_format: NumberFormat,
}

/// Turn a delimiter argument such as `;`, `,` or `\t` into a byte.
pub fn parse_delimiter(sep: &str) -> Result<u8> {
    let sep = match sep {
        "\\t" | "tab" => "\t",
        other => other,
    };
    match sep.as_bytes() {
        [b] => Ok(*b),
        _ => Err(MonsteraError::Other(format!(
            "Separator must be a single ASCII character, got {sep:?}"
        ))),
    }
}

struct ColumnIndexes {
    category: usize,
    name: usize,
    amount: usize,
    date: usize,
}

fn resolve_columns(headers: &csv::StringRecord, mapping: &ColumnMapping) -> Result<ColumnIndexes> {
    let find = |wanted: &str| {
        headers
            .iter()
            .position(|h| h.trim() == wanted)
            .ok_or_else(|| MonsteraError::MissingColumn(wanted.to_string()))
    };
    Ok(ColumnIndexes {
        category: find(&mapping.category)?,
        name: find(&mapping.name)?,
        amount: find(&mapping.amount)?,
        date: find(&mapping.date)?,
    })
}

/// Parse every data row of a CSV stream into an expense.
///
/// Only the four mapped columns are read. The first row that fails to parse
/// aborts the whole read.
pub fn read_expenses<R: std::io::Read>(reader: R, options: &CsvOptions) -> Result<Vec<Expense>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);
    let idx = resolve_columns(rdr.headers()?, &options.columns)?;
    let amounts = AmountParser::new(options.number_format)?;

    let mut expenses = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = i + 1;
        let field = |at: usize| record.get(at).unwrap_or("");
        let wrap = |e: ParseError| ParseError::Row {
            line,
            source: Box::new(e),
        };
        let amount = amounts.parse_amount(field(idx.amount)).map_err(wrap)?;
        let date = parse_date(field(idx.date)).map_err(wrap)?;
        expenses.push(Expense {
            name: field(idx.name).to_string(),
            category_name: field(idx.category).to_string(),
            amount,
            date,
        });
    }
    log::debug!("parsed {} expenses from csv", expenses.len());
    Ok(expenses)
}

pub fn read_expenses_file(path: &Path, options: &CsvOptions) -> Result<Vec<Expense>> {
    let file = std::fs::File::open(path)?;
    read_expenses(std::io::BufReader::new(file), options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn de() -> AmountParser {
        AmountParser::new(NumberFormat::default()).unwrap()
    }

    fn options(delimiter: u8) -> CsvOptions {
        CsvOptions {
            delimiter,
            columns: ColumnMapping {
                category: "Kategorie".to_string(),
                name: "Beschreibung".to_string(),
                amount: "Betrag".to_string(),
                date: "Datum".to_string(),
            },
            number_format: NumberFormat::default(),
        }
    }

    #[test]
    fn test_parse_amount_decimal_comma() {
        assert_eq!(de().parse_amount("1.234,56").unwrap(), 1234.56);
        assert_eq!(de().parse_amount("3,50").unwrap(), 3.5);
        assert_eq!(de().parse_amount("1.234.567,89").unwrap(), 1234567.89);
    }

    #[test]
    fn test_parse_amount_extracts_from_surrounding_text() {
        assert_eq!(de().parse_amount("EUR 12,99").unwrap(), 12.99);
        assert_eq!(de().parse_amount("  4,20 €").unwrap(), 4.2);
        assert_eq!(de().parse_amount("\"-7,00\"").unwrap(), 7.0);
    }

    #[test]
    fn test_parse_amount_point_format() {
        let point = AmountParser::new(NumberFormat::POINT).unwrap();
        assert_eq!(point.parse_amount("1,234.56").unwrap(), 1234.56);
        assert_eq!(point.parse_amount("$3.50").unwrap(), 3.5);
    }

    #[test]
    fn test_parse_amount_grouping_in_decimal_comma_mode() {
        // With `.` as grouping, a point-decimal amount loses its point.
        assert_eq!(de().parse_amount("3.50").unwrap(), 350.0);
    }

    #[test]
    fn test_parse_amount_requires_fraction() {
        assert!(matches!(de().parse_amount("12"), Err(ParseError::Amount(_))));
        assert!(matches!(de().parse_amount("abc"), Err(ParseError::Amount(_))));
        assert!(matches!(de().parse_amount(""), Err(ParseError::Amount(_))));
    }

    #[test]
    fn test_amount_parser_is_reusable() {
        let parser = de();
        let amounts: Vec<f64> = ["3,50", "1.250,00", "0,99", "abc", "12,00"]
            .iter()
            .filter_map(|raw| parser.parse_amount(raw).ok())
            .collect();
        assert_eq!(amounts, vec![3.5, 1250.0, 0.99, 12.0]);
    }

    #[test]
    fn test_read_expenses_uses_configured_format() {
        let data = "Datum,Beschreibung,Kategorie,Betrag\n2024-01-15,rent,housing,\"1,250.00\"\n2024-01-16,tea,food,2.00\n";
        let mut opts = options(b',');
        opts.number_format = NumberFormat::POINT;
        let expenses = read_expenses(data.as_bytes(), &opts).unwrap();
        assert_eq!(expenses[0].amount, 1250.0);
        assert_eq!(expenses[1].amount, 2.0);
    }

    #[test]
    fn test_number_format_rejects_equal_separators() {
        let err = NumberFormat::new(',', ',').unwrap_err();
        assert!(matches!(err, MonsteraError::Settings(_)));
        let same = NumberFormat {
            decimal_separator: ',',
            grouping_separator: ',',
        };
        assert!(matches!(AmountParser::new(same), Err(MonsteraError::Settings(_))));
    }

    #[test]
    fn test_number_format_rejects_digit_separators() {
        assert!(matches!(NumberFormat::new('0', '.'), Err(MonsteraError::Settings(_))));
        assert!(matches!(NumberFormat::new(',', '7'), Err(MonsteraError::Settings(_))));
        assert_eq!(NumberFormat::new(',', '.').unwrap(), NumberFormat::default());
    }

    #[test]
    fn test_read_expenses_rejects_bad_number_format() {
        let data = "Datum;Beschreibung;Kategorie;Betrag\n2024.01.15;coffee;food;3,50\n";
        let mut opts = options(b';');
        opts.number_format.grouping_separator = ',';
        let err = read_expenses(data.as_bytes(), &opts).unwrap_err();
        assert!(matches!(err, MonsteraError::Settings(_)));
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024.01.15").unwrap(), expected);
        assert_eq!(parse_date(" 2024-01-15 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_rejects_invalid_dates() {
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("15.01.2024").is_err());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn test_read_expenses_drops_unmapped_columns() {
        let data = "\
Datum;Konto;Beschreibung;Kategorie;Betrag
2024.01.15;DE123;coffee;food;3,50
2024.01.16;DE123;rent;housing;1.250,00
";
        let expenses = read_expenses(data.as_bytes(), &options(b';')).unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].name, "coffee");
        assert_eq!(expenses[0].category_name, "food");
        assert_eq!(expenses[0].amount, 3.5);
        assert_eq!(expenses[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(expenses[1].amount, 1250.0);
    }

    #[test]
    fn test_read_expenses_missing_column() {
        let data = "Datum;Beschreibung;Betrag\n2024.01.15;coffee;3,50\n";
        let err = read_expenses(data.as_bytes(), &options(b';')).unwrap_err();
        assert!(matches!(err, MonsteraError::MissingColumn(c) if c == "Kategorie"));
    }

    #[test]
    fn test_read_expenses_fails_on_bad_row() {
        let data = "\
Datum;Beschreibung;Kategorie;Betrag
2024.01.15;coffee;food;3,50
15.01.2024;tea;food;2,00
";
        let err = read_expenses(data.as_bytes(), &options(b';')).unwrap_err();
        match err {
            MonsteraError::Parse(ParseError::Row { line, source }) => {
                assert_eq!(line, 2);
                assert!(matches!(*source, ParseError::Date(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_expenses_identical_rows_share_identity() {
        let data = "\
Datum;Beschreibung;Kategorie;Betrag
2024.01.15;coffee;food;3,50
2024-01-15;coffee;food;3,50
";
        let expenses = read_expenses(data.as_bytes(), &options(b';')).unwrap();
        assert_eq!(expenses[0].gid(), expenses[1].gid());
    }
}
