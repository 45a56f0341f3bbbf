//! Result records handed to the statement renderer.

use serde::Serialize;

use crate::currency::Amount;
use crate::domain::{Address, Business, ExpenseCycle};
use crate::ledger::{AccountRegistry, Payment};
use crate::utils::dates;

use super::allocation::AllocationResult;

/// Display-ready values for one customer's statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementRecord {
    pub start_full_date: String,
    pub start_month_date: String,
    pub close_full_date: String,
    pub close_month_date: String,
    pub issue_full_date: String,
    /// Date of the latest payment dated on or before the effective bill date.
    /// Payments recorded after that date do not appear on this statement.
    pub last_payment_received: Option<String>,

    pub effective_connections: usize,
    pub weight: usize,
    pub estimated: bool,

    pub percent: String,
    pub fraction: String,
    pub margin: String,

    /// Semi-annual expenses before margin.
    pub total_cost: String,
    /// This customer's share of the cycle.
    pub pay: String,
    /// Balance before this cycle's charge.
    pub prior_balance: String,
    /// Balance including this cycle's charge.
    pub total_due: String,
    /// Amount of that same payment, chosen with the same as-of rule.
    pub last_payment: Option<String>,

    pub operations: String,
    pub utilities: String,
    pub taxes: String,
    pub insurance: String,
}

/// Balances looked up from the ledger for one statement.
#[derive(Debug, Clone, Copy)]
pub struct StatementBalances<'a> {
    pub prior: Amount,
    pub total_due: Amount,
    /// Latest payment as of the effective bill date.
    pub last_payment: Option<&'a Payment>,
}

impl StatementRecord {
    pub fn new(
        cycle: &ExpenseCycle,
        result: &AllocationResult,
        balances: &StatementBalances<'_>,
    ) -> Self {
        let start = cycle.period.starting();
        let close = cycle.period.closing();
        Self {
            start_full_date: dates::full(start),
            start_month_date: dates::invoice_month(start),
            close_full_date: dates::full(close),
            close_month_date: dates::invoice_month(close),
            issue_full_date: dates::full(cycle.bill_date),
            last_payment_received: balances.last_payment.map(|p| dates::full(p.date)),

            effective_connections: cycle.effective_connections,
            weight: result.weight,
            estimated: cycle.is_estimated(),

            percent: format!("{:.2}%", result.fraction * 100.0),
            fraction: format!("{:.4}", result.fraction),
            margin: format!("{:.0}%", cycle.margin * 100.0),

            total_cost: cycle.total_expenses().display(),
            pay: result.owed.display(),
            prior_balance: balances.prior.display(),
            total_due: balances.total_due.display(),
            last_payment: balances.last_payment.map(|p| p.amount.display()),

            operations: cycle.operations.display(),
            utilities: cycle.utilities.display(),
            taxes: cycle.taxes.display(),
            insurance: cycle.insurance.display(),
        }
    }
}

/// One customer's statement for one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerStatement {
    pub account_name: String,
    pub user_name: String,
    pub service_address: Address,
    pub billing_address: Address,
    pub allocation: AllocationResult,
    pub record: StatementRecord,
}

/// Every statement issued for one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleStatement {
    /// The cycle after annual expenses were split.
    pub cycle: ExpenseCycle,
    /// `YYYY-Mon` of the closing date, with `-Estimate` for early bills.
    pub invoice_name: String,
    pub scaled_total: Amount,
    pub unallocated: Amount,
    pub statements: Vec<CustomerStatement>,
}

impl CycleStatement {
    pub fn invoice_name_for(cycle: &ExpenseCycle) -> String {
        let mut name = dates::invoice_month(cycle.period.closing());
        if cycle.is_estimated() {
            name.push_str("-Estimate");
        }
        name
    }

    pub fn total_owed(&self) -> Amount {
        self.statements.iter().map(|s| s.allocation.owed).sum()
    }
}

/// Everything a billing run produces.
#[derive(Debug, Clone, Serialize)]
pub struct BillingResult {
    pub business: Business,
    pub cycles: Vec<CycleStatement>,
    #[serde(skip)]
    pub accounts: AccountRegistry,
}
