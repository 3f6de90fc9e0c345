//! Display formatting for dashboard columns.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// `Jan 3rd, 2024`
pub fn format_date(at: &DateTime<Utc>) -> String {
    let day = at.day();
    format!("{} {}{}, {}", at.format("%b"), day, ordinal_suffix(day), at.year())
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// US dollars with cents and thousands separators, e.g. `$1,234.50`
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn on(day: u32) -> String {
        format_date(&Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap())
    }

    #[test]
    fn ordinal_days() {
        assert_eq!(on(1), "Jan 1st, 2024");
        assert_eq!(on(2), "Jan 2nd, 2024");
        assert_eq!(on(3), "Jan 3rd, 2024");
        assert_eq!(on(4), "Jan 4th, 2024");
        assert_eq!(on(11), "Jan 11th, 2024");
        assert_eq!(on(12), "Jan 12th, 2024");
        assert_eq!(on(13), "Jan 13th, 2024");
        assert_eq!(on(21), "Jan 21st, 2024");
        assert_eq!(on(22), "Jan 22nd, 2024");
        assert_eq!(on(31), "Jan 31st, 2024");
    }

    #[test]
    fn prices() {
        assert_eq!(format_price(Decimal::ZERO), "$0.00");
        assert_eq!(format_price(Decimal::from_str("49.5").unwrap()), "$49.50");
        assert_eq!(format_price(Decimal::from_str("1234.567").unwrap()), "$1,234.57");
        assert_eq!(format_price(Decimal::from_str("1000000").unwrap()), "$1,000,000.00");
    }
}
