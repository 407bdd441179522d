use chrono::{DateTime, Utc};

use crate::parser::NumberFormat;

/// Two decimals with grouping every three digits: `1.234,56` or `1,234.56`.
pub fn amount(val: f64, format: &NumberFormat) -> String {
    let negative = val < 0.0;
    let fixed = format!("{:.2}", val.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(format.grouping_separator);
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}{}{dec_part}", format.decimal_separator)
}

pub fn timestamp(val: &DateTime<Utc>) -> String {
    val.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_amount_formatting() {
        let de = NumberFormat::default();
        assert_eq!(amount(1234.56, &de), "1.234,56");
        assert_eq!(amount(3.5, &de), "3,50");
        assert_eq!(amount(0.0, &de), "0,00");
        assert_eq!(amount(-500.0, &de), "-500,00");
        assert_eq!(amount(1000000.99, &NumberFormat::POINT), "1,000,000.99");
    }

    #[test]
    fn test_timestamp_formatting() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
        assert_eq!(timestamp(&ts), "2024-01-15 08:30:00");
    }
}
