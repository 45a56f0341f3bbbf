use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{BillingError, Result};
use crate::utils::dates;

const PERIOD_MONTHS: u32 = 6;
const START_MONTHS: [u32; 2] = [4, 10];

/// A six-month billing period. Periods start on April 1st or October 1st
/// and close the day before the next period starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    start: NaiveDate,
    close: NaiveDate,
}

impl Period {
    /// Builds the period beginning on `start` without checking the start day.
    pub fn from_start(start: NaiveDate) -> Result<Self> {
        let close = start
            .checked_add_months(Months::new(PERIOD_MONTHS))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| BillingError::InvalidPeriodStart {
                date: dates::short(start),
                reason: "period end is out of range".into(),
            })?;
        Ok(Self { start, close })
    }

    /// Parses an `M/D/YYYY` period start and validates it.
    pub fn parse_start(text: &str) -> Result<Self> {
        let period = Self::from_start(dates::parse_date(text)?)?;
        period.validate()?;
        Ok(period)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start.day() != 1 {
            return Err(self.invalid("periods start on the first of the month"));
        }
        if !START_MONTHS.contains(&self.start.month()) {
            return Err(self.invalid("periods start in April (4) and October (10)"));
        }
        Ok(())
    }

    pub fn starting(&self) -> NaiveDate {
        self.start
    }

    pub fn closing(&self) -> NaiveDate {
        self.close
    }

    fn invalid(&self, reason: &str) -> BillingError {
        BillingError::InvalidPeriodStart {
            date: dates::short(self.start),
            reason: reason.into(),
        }
    }
}
