//! Drives a billing run: ledger setup, annual split, then one allocation per cycle.

use tracing::info;

use crate::domain::{split_annual, Business, Customer, ExpenseCycle};
use crate::errors::{BillingError, Result};
use crate::ledger::{AccountRegistry, Payment};

use super::allocation::AllocationEngine;
use super::statement::{
    BillingResult, CustomerStatement, CycleStatement, StatementBalances, StatementRecord,
};

/// Everything a run needs, already parsed and validated.
#[derive(Debug, Clone)]
pub struct BillingInputs {
    pub customers: Vec<Customer>,
    pub business: Business,
    pub cycles: Vec<ExpenseCycle>,
    pub payments: Vec<Payment>,
}

/// A prepared billing run.
///
/// Construction registers one account per customer, replays every payment, and
/// orders the cycles with annual expenses split. [`Orchestrator::run`] then
/// bills the cycles oldest first.
#[derive(Debug)]
pub struct Orchestrator {
    customers: Vec<Customer>,
    business: Business,
    cycles: Vec<ExpenseCycle>,
    accounts: AccountRegistry,
}

impl Orchestrator {
    pub fn new(inputs: BillingInputs) -> Result<Self> {
        let BillingInputs {
            customers,
            business,
            mut cycles,
            payments,
        } = inputs;

        let mut accounts = AccountRegistry::new();
        for customer in &customers {
            accounts.register(&customer.account_name)?;
        }
        for payment in payments {
            accounts.enter_payment(payment)?;
        }

        cycles.sort_by_key(|cycle| cycle.period.starting());
        if let Some(pair) = cycles
            .windows(2)
            .find(|pair| pair[0].period.starting() == pair[1].period.starting())
        {
            return Err(BillingError::DuplicateCycle(pair[1].label()));
        }
        split_annual(&mut cycles)?;

        Ok(Self {
            customers,
            business,
            cycles,
            accounts,
        })
    }

    /// Cycles in billing order after the annual split.
    pub fn cycles(&self) -> &[ExpenseCycle] {
        &self.cycles
    }

    pub fn accounts(&self) -> &AccountRegistry {
        &self.accounts
    }

    /// Bills every cycle in order, entering each customer's charge on their
    /// ledger before the next cycle is allocated.
    pub fn run(mut self) -> Result<BillingResult> {
        let mut statements = Vec::with_capacity(self.cycles.len());
        for cycle in &self.cycles {
            info!(
                period = %cycle.label(),
                expenses = %cycle.total_expenses(),
                savings_rate = cycle.savings_rate(),
                effective_connections = cycle.effective_connections,
                method = %cycle.method,
                "billing cycle"
            );

            let allocation = AllocationEngine::allocate(cycle, &self.customers)?;
            let closing = cycle.period.closing();
            let as_of = cycle.effective_bill_date();

            let mut issued = Vec::with_capacity(allocation.allocations.len());
            for entry in &allocation.allocations {
                let customer = entry.customer;
                let account = self
                    .accounts
                    .lookup_mut(&customer.account_name)
                    .ok_or_else(|| BillingError::UnknownAccount(customer.account_name.clone()))?;

                let prior = account.balance(as_of);
                account.enter_amount_due(closing, entry.result.owed);
                let balances = StatementBalances {
                    prior,
                    total_due: account.balance(as_of),
                    last_payment: account.last_payment_as_of(as_of),
                };

                issued.push(CustomerStatement {
                    account_name: customer.account_name.clone(),
                    user_name: customer.user_name.clone(),
                    service_address: customer.service_address.clone(),
                    billing_address: customer.billing_address.clone(),
                    allocation: entry.result,
                    record: StatementRecord::new(cycle, &entry.result, &balances),
                });
            }

            statements.push(CycleStatement {
                cycle: cycle.clone(),
                invoice_name: CycleStatement::invoice_name_for(cycle),
                scaled_total: allocation.scaled,
                unallocated: allocation.unallocated,
                statements: issued,
            });
        }

        Ok(BillingResult {
            business: self.business,
            cycles: statements,
            accounts: self.accounts,
        })
    }
}
