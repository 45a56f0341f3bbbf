use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::currency::Amount;

use super::entry::{LedgerEntry, Payment};

/// A customer's running ledger of charges and payments.
///
/// Entries are kept in insertion order; the account never sorts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    #[serde(default)]
    entries: Vec<LedgerEntry>,
}

impl Account {
    /// Creates an account with an empty ledger.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn enter_payment(&mut self, payment: Payment) {
        self.entries.push(LedgerEntry::Payment(payment));
    }

    pub fn enter_amount_due(&mut self, date: NaiveDate, amount: Amount) {
        self.entries.push(LedgerEntry::Charge { date, amount });
    }

    /// Charges minus payments, counting only entries dated on or before `as_of`.
    pub fn balance(&self, as_of: NaiveDate) -> Amount {
        self.entries
            .iter()
            .filter(|entry| entry.date() <= as_of)
            .map(LedgerEntry::signed_amount)
            .sum()
    }

    /// The most recent payment by date. Among payments sharing that date the
    /// one entered last wins.
    pub fn last_payment(&self) -> Option<&Payment> {
        self.payments().fold(None, |latest, payment| match latest {
            Some(current) if current.date > payment.date => Some(current),
            _ => Some(payment),
        })
    }

    /// Like [`Account::last_payment`], ignoring payments dated after `as_of`.
    pub fn last_payment_as_of(&self, as_of: NaiveDate) -> Option<&Payment> {
        self.payments()
            .filter(|payment| payment.date <= as_of)
            .fold(None, |latest, payment| match latest {
                Some(current) if current.date > payment.date => Some(current),
                _ => Some(payment),
            })
    }

    pub fn payments(&self) -> impl Iterator<Item = &Payment> {
        self.entries.iter().filter_map(|entry| match entry {
            LedgerEntry::Payment(payment) => Some(payment),
            LedgerEntry::Charge { .. } => None,
        })
    }

    pub fn charge_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.is_payment()).count()
    }
}
