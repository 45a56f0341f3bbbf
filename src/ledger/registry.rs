use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{BillingError, Result};

use super::account::Account;
use super::entry::Payment;

/// Every customer account known to a billing run, keyed by account name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountRegistry {
    accounts: BTreeMap<String, Account>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an empty account under `name`.
    pub fn register(&mut self, name: &str) -> Result<&mut Account> {
        if self.accounts.contains_key(name) {
            return Err(BillingError::DuplicateAccount(name.to_string()));
        }
        Ok(self
            .accounts
            .entry(name.to_string())
            .or_insert_with(|| Account::new(name)))
    }

    pub fn lookup(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Account> {
        self.accounts.get_mut(name)
    }

    /// Posts a payment to the account it names.
    pub fn enter_payment(&mut self, payment: Payment) -> Result<()> {
        let account = self
            .accounts
            .get_mut(&payment.account_name)
            .ok_or_else(|| BillingError::UnknownAccount(payment.account_name.clone()))?;
        account.enter_payment(payment);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}
