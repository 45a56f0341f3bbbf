//! Date lexing and the display layouts used on statements.

use chrono::NaiveDate;

use crate::errors::{BillingError, Result};

/// Input layout, e.g. `4/1/2022`.
pub const CSV_LAYOUT: &str = "%m/%d/%Y";
/// Compact layout for displaying input-style dates without zero padding.
pub const SHORT_LAYOUT: &str = "%-m/%-d/%Y";
/// Invoice naming layout, e.g. `2022-Sep`.
pub const INVOICE_LAYOUT: &str = "%Y-%b";
/// Long layout, e.g. `September 30, 2022`.
pub const FULL_LAYOUT: &str = "%B %-d, %Y";

/// Dates before this are treated as data-entry mistakes.
pub fn earliest_valid() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parses an `M/D/YYYY` date without checking its range.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), CSV_LAYOUT)
        .map_err(|_| BillingError::MalformedDate(text.to_string()))
}

/// Parses an `M/D/YYYY` date and rejects anything before 1900.
pub fn parse_checked_date(text: &str) -> Result<NaiveDate> {
    let date = parse_date(text)?;
    if date < earliest_valid() {
        return Err(BillingError::InvalidInput(format!("date is too old: {date}")));
    }
    Ok(date)
}

pub fn short(date: NaiveDate) -> String {
    date.format(SHORT_LAYOUT).to_string()
}

pub fn full(date: NaiveDate) -> String {
    date.format(FULL_LAYOUT).to_string()
}

pub fn invoice_month(date: NaiveDate) -> String {
    date.format(INVOICE_LAYOUT).to_string()
}
