use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use serde::Deserialize;

use crate::error::{LedgerError, Result};

/// A raw row from the bank statement export, before any coercion.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementRow {
    #[serde(rename = "Session Number")]
    pub session: u32,
    #[serde(rename = "Setup Date")]
    pub setup_date: String,
    #[serde(rename = "Effective Date")]
    pub effective_date: String,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: Option<String>,
    #[serde(rename = "Amount")]
    pub amount: String,
}

/// A typed money transfer belonging to one poker session.
///
/// `to == None` marks a buy-in (player money into the pot); `Some` marks a
/// payout from the house account to a player.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub session: u32,
    /// Session-level `month.day.year` date, repeated on every row.
    pub setup_date: String,
    /// Unused downstream; rows with unparseable dates are kept with `None`.
    pub effective_date: Option<NaiveDate>,
    pub from: String,
    pub to: Option<String>,
    pub amount: f64,
}

impl Transaction {
    pub fn is_buy_in(&self) -> bool {
        self.to.is_none()
    }

    pub fn from_row(row: StatementRow) -> Result<Self> {
        if row.from.trim().is_empty() {
            return Err(LedgerError::Parse(format!(
                "row in session {} has no From account",
                row.session
            )));
        }

        let to = row.to.filter(|t| !t.trim().is_empty());

        Ok(Transaction {
            session: row.session,
            setup_date: row.setup_date,
            effective_date: parse_effective_date(&row.effective_date),
            from: row.from,
            to,
            amount: normalize_amount(&row.amount)?,
        })
    }
}

/// Date formats seen in bank exports for the `Effective Date` column.
const EFFECTIVE_DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%m.%d.%Y"];

/// Parse an effective date, coercing failures to `None`.
///
/// Matches the source data's tolerance: a bad date is logged and ignored
/// rather than failing the load, since nothing downstream consumes it.
pub fn parse_effective_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in EFFECTIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    warn!("unparseable effective date {:?}, coercing to null", raw);
    None
}

lazy_static! {
    static ref NON_AMOUNT: Regex = Regex::new(r"[^0-9.]").unwrap();
}

/// Normalize a currency string to a number by stripping everything that is
/// not a digit or decimal point ("$1,234.56" -> 1234.56).
///
/// A stripped minus sign silently turns a refund positive, so it is logged.
pub fn normalize_amount(raw: &str) -> Result<f64> {
    if raw.contains('-') {
        warn!("stripping sign from amount {:?}", raw);
    }

    let stripped = NON_AMOUNT.replace_all(raw, "");
    stripped
        .parse::<f64>()
        .map_err(|_| LedgerError::Parse(format!("no numeric amount in {:?}", raw)))
}
