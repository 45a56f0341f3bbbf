use chrono::NaiveDate;
use proptest::prelude::*;

use water_billing::{
    core::{allocation, AllocationEngine},
    currency::Amount,
    domain::{split_annual, Address, Customer, ExpenseCycle, InactiveSet, Method},
    ledger::{Account, Payment, Period},
};

fn period(year: i32, october: bool) -> Period {
    let month = if october { 10 } else { 4 };
    Period::from_start(NaiveDate::from_ymd_opt(year, month, 1).unwrap()).unwrap()
}

fn customers(commercial: &[bool]) -> Vec<Customer> {
    commercial
        .iter()
        .enumerate()
        .map(|(idx, &commercial)| Customer {
            account_name: format!("Account{idx}"),
            user_name: format!("User {idx}"),
            service_address: Address::new("1 Main St"),
            billing_address: Address::new("1 Main St"),
            first_period_start: period(2000, true),
            commercial,
        })
        .collect()
}

fn cycle(
    period: Period,
    operations: i64,
    utilities: i64,
    method: Method,
    margin: f64,
    effective: usize,
) -> ExpenseCycle {
    ExpenseCycle {
        period,
        operations: Amount::from_cents(operations),
        utilities: Amount::from_cents(utilities),
        insurance: Amount::ZERO,
        taxes: Amount::ZERO,
        bill_date: period.closing(),
        method,
        margin,
        effective_connections: effective,
        inactive: InactiveSet::default(),
    }
}

fn method() -> impl Strategy<Value = Method> {
    prop_oneof![Just(Method::Introductory), Just(Method::Normal)]
}

proptest! {
    #[test]
    fn split_conserves_and_balances(units in -10_000_000i64..10_000_000, parts in 1usize..64) {
        let amount = Amount::from_cents(units);
        let pieces = amount.split(parts);
        prop_assert_eq!(pieces.len(), parts);
        prop_assert_eq!(pieces.iter().sum::<Amount>(), amount);
        let max = pieces.iter().max().unwrap().units();
        let min = pieces.iter().min().unwrap().units();
        prop_assert!(max - min <= 1);
    }

    #[test]
    fn annual_split_conserves_taxes_and_insurance(
        annual in proptest::collection::vec((0i64..5_000_000, 0i64..5_000_000), 1..8),
    ) {
        let mut cycles: Vec<ExpenseCycle> = annual
            .iter()
            .enumerate()
            .map(|(idx, _)| {
                let year = 2000 + (idx as i32 + 1) / 2;
                cycle(period(year, idx % 2 == 0), 100, 100, Method::Normal, 0.0, 1)
            })
            .collect();
        for (idx, (taxes, insurance)) in annual.iter().enumerate() {
            if idx % 2 == 0 {
                cycles[idx].taxes = Amount::from_cents(*taxes);
                cycles[idx].insurance = Amount::from_cents(*insurance);
            }
        }
        split_annual(&mut cycles).unwrap();

        for pair in annual.chunks(2).zip(cycles.chunks(2)) {
            let (entered, split) = pair;
            let (taxes, insurance) = entered[0];
            let taxes_after: Amount = split.iter().map(|c| c.taxes).sum();
            let insurance_after: Amount = split.iter().map(|c| c.insurance).sum();
            if split.len() == 2 {
                prop_assert_eq!(taxes_after.units(), taxes);
                prop_assert_eq!(insurance_after.units(), insurance);
            } else {
                prop_assert_eq!(taxes_after, Amount::from_cents(taxes).split(2)[0]);
                prop_assert_eq!(insurance_after, Amount::from_cents(insurance).split(2)[0]);
            }
        }
    }

    #[test]
    fn fully_subscribed_cycles_allocate_every_cent(
        commercial in proptest::collection::vec(any::<bool>(), 1..24),
        operations in 1i64..50_000_000,
        utilities in 1i64..50_000_000,
        margin in 0.0f64..1.0,
        method in method(),
    ) {
        let customers = customers(&commercial);
        let weighted: usize = customers.iter().map(|c| c.weight(method)).sum();
        let cycle = cycle(period(2001, false), operations, utilities, method, margin, weighted);

        let result = AllocationEngine::allocate(&cycle, &customers).unwrap();
        prop_assert_eq!(result.total_owed(), cycle.scaled_total());
        prop_assert_eq!(result.unallocated, Amount::ZERO);
        prop_assert!(result.scaled >= cycle.total_expenses());
    }

    #[test]
    fn spare_connections_are_reported_as_unallocated(
        count in 1usize..12,
        spare in 0usize..6,
        total in 1i64..10_000_000,
    ) {
        let customers = customers(&vec![false; count]);
        let cycle = cycle(period(2001, true), total, total, Method::Introductory, 0.0, count + spare);
        let result = AllocationEngine::allocate(&cycle, &customers).unwrap();
        prop_assert_eq!(result.total_owed() + result.unallocated, result.scaled);
        for entry in &result.allocations {
            let share = entry.result.owed.units();
            let base = result.scaled.units() / (count + spare) as i64;
            prop_assert!(share == base || share == base + 1);
        }
    }

    #[test]
    fn allocation_is_deterministic(
        commercial in proptest::collection::vec(any::<bool>(), 1..16),
        total in 1i64..10_000_000,
        method in method(),
    ) {
        let customers = customers(&commercial);
        let weighted: usize = customers.iter().map(|c| c.weight(method)).sum();
        let cycle = cycle(period(2003, true), total, 7, method, 0.05, weighted + 1);
        let first = AllocationEngine::allocate(&cycle, &customers).unwrap();
        let second = AllocationEngine::allocate(&cycle, &customers).unwrap();
        let owed = |a: &allocation::CycleAllocation<'_>| {
            a.allocations.iter().map(|e| e.result.owed).collect::<Vec<_>>()
        };
        prop_assert_eq!(owed(&first), owed(&second));
    }

    #[test]
    fn balance_counts_only_entries_up_to_the_date(
        entries in proptest::collection::vec((0u32..720, 0i64..100_000, any::<bool>()), 0..40),
        probe in 0u32..720,
    ) {
        let origin = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let day = |offset: u32| origin + chrono::Days::new(offset as u64);
        let mut account = Account::new("Account0");
        let mut expected = 0i64;
        for (offset, cents, is_payment) in &entries {
            let amount = Amount::from_cents(*cents);
            if *is_payment {
                account.enter_payment(Payment::new(day(*offset), "Account0", amount));
            } else {
                account.enter_amount_due(day(*offset), amount);
            }
            if *offset <= probe {
                expected += if *is_payment { -cents } else { *cents };
            }
        }
        prop_assert_eq!(account.balance(day(probe)).units(), expected);
    }
}
