//! Word-date rendering for session labels

use crate::error::{LedgerError, Result};
use chrono::NaiveDate;

/// Ordinal suffix for a day of month.
///
/// 11-13 always take "th", overriding the mod-10 rule (21st but 13th).
fn day_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Convert a numeric `month.day.year` date string into a word date,
/// e.g. "1.3.2024" -> "3rd Jan 2024".
pub fn word_date(date_str: &str) -> Result<String> {
    let parts: Vec<&str> = date_str.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(LedgerError::Format(format!(
            "expected month.day.year, got {:?}",
            date_str
        )));
    }

    let month: u32 = parts[0]
        .parse()
        .map_err(|_| LedgerError::Format(format!("bad month in {:?}", date_str)))?;
    let day: u32 = parts[1]
        .parse()
        .map_err(|_| LedgerError::Format(format!("bad day in {:?}", date_str)))?;
    let year: i32 = parts[2]
        .parse()
        .map_err(|_| LedgerError::Format(format!("bad year in {:?}", date_str)))?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        LedgerError::Format(format!("{:?} is not a valid calendar date", date_str))
    })?;

    Ok(format!(
        "{}{} {} {}",
        day,
        day_suffix(day),
        date.format("%b"),
        year
    ))
}
