use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::currency::{self, Amount};
use crate::errors::{BillingError, Result};
use crate::ledger::Period;
use crate::utils::dates;

use super::common::Validate;

/// Annual taxes and insurance are paid during the period starting in October.
const ANNUAL_EXPENSE_MONTH: u32 = 10;

/// How shares are weighted for a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Every active connection carries weight 1.
    Introductory,
    /// Commercial connections carry weight 2.
    Normal,
}

impl FromStr for Method {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Method::Normal),
            "introductory" => Ok(Method::Introductory),
            _ => Err(BillingError::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Normal => f.write_str("Normal"),
            Method::Introductory => f.write_str("Introductory"),
        }
    }
}

/// Accounts that are disconnected for a cycle and consume no share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InactiveSet(BTreeSet<String>);

impl InactiveSet {
    /// Parses a comma separated list of account names; whitespace is ignored.
    pub fn parse(text: &str) -> Self {
        let cleaned: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
        Self(
            cleaned
                .split(',')
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, account_name: &str) -> bool {
        self.0.contains(account_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for InactiveSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The cost of running the water system for one billing cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCycle {
    pub period: Period,
    /// Treatment, chemicals, and lab analysis.
    pub operations: Amount,
    /// Electricity.
    pub utilities: Amount,
    /// General liability insurance; entered annually.
    pub insurance: Amount,
    /// Property taxes, licensing, and certification; entered annually.
    pub taxes: Amount,
    /// Date the statement is issued.
    pub bill_date: NaiveDate,
    pub method: Method,
    /// Target ratio of earnings above cost.
    pub margin: f64,
    /// Denominator used to divide the scaled total into shares.
    pub effective_connections: usize,
    #[serde(default)]
    pub inactive: InactiveSet,
}

impl ExpenseCycle {
    /// Operations, utilities, taxes, and insurance together.
    pub fn total_expenses(&self) -> Amount {
        currency::sum([self.operations, self.utilities, self.taxes, self.insurance])
    }

    /// `1 + margin`.
    pub fn savings_rate(&self) -> f64 {
        1.0 + self.margin
    }

    /// Total expenses scaled by the savings rate, truncated to the cent.
    pub fn scaled_total(&self) -> Amount {
        self.total_expenses().scale(self.savings_rate())
    }

    /// [`ExpenseCycle::scaled_total`] that fails with
    /// [`BillingError::InvalidExpense`] instead of overflowing.
    pub fn checked_scaled_total(&self) -> Result<Amount> {
        currency::checked_sum([self.operations, self.utilities, self.taxes, self.insurance])
            .and_then(|total| total.checked_scale(self.savings_rate()))
            .ok_or_else(|| {
                BillingError::InvalidExpense(format!("expenses for {} overflow", self.label()))
            })
    }

    /// A statement issued before the period closes is an estimate.
    pub fn is_estimated(&self) -> bool {
        self.bill_date < self.period.closing()
    }

    /// Date balances are reported as of: the bill date, or the closing date
    /// for estimates.
    pub fn effective_bill_date(&self) -> NaiveDate {
        if self.is_estimated() {
            self.period.closing()
        } else {
            self.bill_date
        }
    }

    pub fn has_annual_expenses(&self) -> bool {
        !self.taxes.is_zero() || !self.insurance.is_zero()
    }

    pub fn label(&self) -> String {
        format!(
            "{}..{}",
            dates::invoice_month(self.period.starting()),
            dates::invoice_month(self.period.closing())
        )
    }
}

impl Validate for ExpenseCycle {
    fn validate(&self) -> Result<()> {
        self.period.validate()?;
        if self.operations.units() <= 0 {
            return Err(BillingError::InvalidExpense(
                "operations must be positive".into(),
            ));
        }
        if self.utilities.units() <= 0 {
            return Err(BillingError::InvalidExpense(
                "utilities must be positive".into(),
            ));
        }
        if self.insurance.units() < 0 {
            return Err(BillingError::InvalidExpense(
                "insurance cannot be negative".into(),
            ));
        }
        if self.taxes.units() < 0 {
            return Err(BillingError::InvalidExpense("taxes cannot be negative".into()));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(BillingError::InvalidExpense(format!(
                "margin must be a non-negative number: {}",
                self.margin
            )));
        }
        if self.effective_connections == 0 {
            return Err(BillingError::InvalidExpense(
                "effective connections must be positive".into(),
            ));
        }
        self.checked_scaled_total()?;
        Ok(())
    }
}

/// Spreads annual taxes and insurance across each pair of cycles.
///
/// Annual amounts live on the even-indexed cycles (0, 2, 4, ...). Each is split
/// in half; the first half stays, the second moves to the following cycle, which
/// must not carry annual amounts of its own. A trailing unpaired cycle keeps only
/// its first half.
pub fn split_annual(cycles: &mut [ExpenseCycle]) -> Result<()> {
    for idx in (0..cycles.len()).step_by(2) {
        let taxes = cycles[idx].taxes.split(2);
        let insurance = cycles[idx].insurance.split(2);

        if cycles[idx].has_annual_expenses()
            && cycles[idx].period.starting().month() != ANNUAL_EXPENSE_MONTH
        {
            tracing::warn!(
                cycle = %cycles[idx].label(),
                "annual expenses entered on a cycle that does not start in October"
            );
        }

        cycles[idx].taxes = taxes[0];
        cycles[idx].insurance = insurance[0];

        match cycles.get_mut(idx + 1) {
            Some(next) => {
                if next.has_annual_expenses() {
                    return Err(BillingError::AnnualSplitConflict(next.label()));
                }
                next.taxes = taxes[1];
                next.insurance = insurance[1];
            }
            None => {
                if !taxes[1].is_zero() || !insurance[1].is_zero() {
                    tracing::warn!(
                        cycle = %cycles[idx].label(),
                        taxes = %taxes[1],
                        insurance = %insurance[1],
                        "no following cycle; second half of annual expenses is not billed"
                    );
                }
            }
        }
    }
    Ok(())
}
