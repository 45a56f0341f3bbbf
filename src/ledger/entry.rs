use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::currency::Amount;
use crate::errors::{BillingError, Result};
use crate::utils::dates;

/// A single payment received from a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub date: NaiveDate,
    pub account_name: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Payment {
    pub fn new(date: NaiveDate, account_name: impl Into<String>, amount: Amount) -> Self {
        Self {
            date,
            account_name: account_name.into(),
            amount,
            comments: None,
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        let comments = comments.into();
        self.comments = (!comments.trim().is_empty()).then_some(comments);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.date < dates::earliest_valid() {
            return Err(BillingError::InvalidInput(format!(
                "date is too old: {}",
                self.date
            )));
        }
        if self.account_name.trim().is_empty() {
            return Err(BillingError::InvalidInput(
                "empty payment account name".into(),
            ));
        }
        if self.amount.units() < 0 {
            return Err(BillingError::InvalidInput(format!(
                "negative payment is invalid: {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// One line of an account's ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEntry {
    Charge { date: NaiveDate, amount: Amount },
    Payment(Payment),
}

impl LedgerEntry {
    pub fn date(&self) -> NaiveDate {
        match self {
            LedgerEntry::Charge { date, .. } => *date,
            LedgerEntry::Payment(payment) => payment.date,
        }
    }

    /// Effect on the amount owed: charges add, payments subtract.
    pub fn signed_amount(&self) -> Amount {
        match self {
            LedgerEntry::Charge { amount, .. } => *amount,
            LedgerEntry::Payment(payment) => Amount::ZERO.difference(payment.amount),
        }
    }

    pub fn is_payment(&self) -> bool {
        matches!(self, LedgerEntry::Payment(_))
    }
}
