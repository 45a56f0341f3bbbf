//! Allocation engine throughput.
//!
//! Run with: cargo bench --bench allocation

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use water_billing::{
    core::AllocationEngine,
    currency::Amount,
    domain::{Address, Customer, ExpenseCycle, InactiveSet, Method},
    ledger::Period,
};

fn customers(count: usize) -> Vec<Customer> {
    let first = Period::from_start(NaiveDate::from_ymd_opt(2020, 10, 1).unwrap()).unwrap();
    (0..count)
        .map(|idx| Customer {
            account_name: format!("Account{idx}"),
            user_name: format!("User {idx}"),
            service_address: Address::new("1 Main St"),
            billing_address: Address::new("1 Main St"),
            first_period_start: first,
            commercial: idx % 10 == 0,
        })
        .collect()
}

fn cycle(effective: usize) -> ExpenseCycle {
    let period = Period::from_start(NaiveDate::from_ymd_opt(2022, 4, 1).unwrap()).unwrap();
    ExpenseCycle {
        period,
        operations: Amount::from_cents(1_234_567),
        utilities: Amount::from_cents(345_678),
        insurance: Amount::from_cents(120_000),
        taxes: Amount::from_cents(80_001),
        bill_date: period.closing(),
        method: Method::Normal,
        margin: 0.1,
        effective_connections: effective,
        inactive: InactiveSet::parse("Account1,Account2"),
    }
}

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");

    for size in [10usize, 100, 1000].iter() {
        let customers = customers(*size);
        let cycle = cycle(size + size / 10);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| AllocationEngine::allocate(black_box(&cycle), black_box(&customers)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_allocate);
criterion_main!(benches);
