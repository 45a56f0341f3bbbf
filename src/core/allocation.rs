//! Splits a cycle's scaled cost into per-customer shares.

use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::currency::Amount;
use crate::domain::{Customer, ExpenseCycle};
use crate::errors::{BillingError, Result};

/// One customer's part of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub owed: Amount,
    /// `weight / effective_connections`.
    pub fraction: f64,
    pub weight: usize,
}

impl AllocationResult {
    pub fn inactive() -> Self {
        Self {
            owed: Amount::ZERO,
            fraction: 0.0,
            weight: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CustomerAllocation<'a> {
    pub customer: &'a Customer,
    pub result: AllocationResult,
}

/// Outcome of allocating a single cycle.
#[derive(Debug, Clone)]
pub struct CycleAllocation<'a> {
    /// Total expenses scaled by the savings rate.
    pub scaled: Amount,
    /// Eligible customers in input order.
    pub allocations: Vec<CustomerAllocation<'a>>,
    /// Shares no customer consumed.
    pub unallocated: Amount,
}

impl CycleAllocation<'_> {
    pub fn total_owed(&self) -> Amount {
        self.allocations.iter().map(|a| a.result.owed).sum()
    }
}

pub struct AllocationEngine;

impl AllocationEngine {
    /// Allocates `cycle` across `customers`.
    ///
    /// Customers whose first period starts after this cycle are left out of the
    /// result entirely. Inactive customers get a zero result and consume no
    /// share. Fails with [`BillingError::OverAllocation`] when the weighted count
    /// of active customers exceeds the cycle's effective connections.
    pub fn allocate<'a>(
        cycle: &ExpenseCycle,
        customers: &'a [Customer],
    ) -> Result<CycleAllocation<'a>> {
        let scaled = cycle.checked_scaled_total()?;
        let effective = cycle.effective_connections;

        let weighted = weighted_count(cycle, customers);
        if weighted > effective {
            return Err(over_allocation(cycle, weighted));
        }

        let shares = scaled.split(effective);
        let shuffled = shuffle_shares(&shares, shuffle_seed(cycle.period.closing()));
        let mut cursor = shuffled.into_iter();

        let mut allocations = Vec::with_capacity(customers.len());
        for customer in customers {
            if !customer.is_billed_in(&cycle.period) {
                continue;
            }
            let result = if cycle.inactive.contains(&customer.account_name) {
                AllocationResult::inactive()
            } else {
                let weight = customer.weight(cycle.method);
                let mut owed = Amount::ZERO;
                for _ in 0..weight {
                    let share = cursor
                        .next()
                        .ok_or_else(|| over_allocation(cycle, weighted))?;
                    owed = owed + share;
                }
                AllocationResult {
                    owed,
                    fraction: weight as f64 / effective as f64,
                    weight,
                }
            };
            debug!(
                account = %customer.account_name,
                owed = %result.owed,
                weight = result.weight,
                "allocated share"
            );
            allocations.push(CustomerAllocation { customer, result });
        }

        Ok(CycleAllocation {
            scaled,
            allocations,
            unallocated: cursor.sum(),
        })
    }
}

/// Sum of weights over every customer not marked inactive for `cycle`.
pub fn weighted_count(cycle: &ExpenseCycle, customers: &[Customer]) -> usize {
    customers
        .iter()
        .filter(|customer| !cycle.inactive.contains(&customer.account_name))
        .map(|customer| customer.weight(cycle.method))
        .sum()
}

/// Seed derived from a closing date: nanoseconds since the Unix epoch at
/// midnight UTC.
pub fn shuffle_seed(closing: NaiveDate) -> u64 {
    let midnight = closing.and_time(chrono::NaiveTime::MIN).and_utc();
    let nanos = midnight
        .timestamp_nanos_opt()
        .unwrap_or_else(|| midnight.timestamp().wrapping_mul(1_000_000_000));
    nanos as u64
}

/// Returns a Fisher-Yates permutation of `shares` driven by `seed`.
///
/// The generator is ChaCha8 and indices are drawn as `u64`, so the same seed
/// yields the same order on every platform.
pub fn shuffle_shares(shares: &[Amount], seed: u64) -> Vec<Amount> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut shuffled = shares.to_vec();
    for idx in (1..shuffled.len()).rev() {
        let pick = rng.gen_range(0..=idx as u64) as usize;
        shuffled.swap(idx, pick);
    }
    shuffled
}

fn over_allocation(cycle: &ExpenseCycle, weighted: usize) -> BillingError {
    BillingError::OverAllocation {
        period: cycle.label(),
        weighted,
        effective: cycle.effective_connections,
    }
}
