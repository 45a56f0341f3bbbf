//! Customers, the billing business, and per-cycle expense records.

pub mod business;
pub mod common;
pub mod customer;
pub mod expense;

pub use business::Business;
pub use common::{parse_flag, Address, Validate};
pub use customer::Customer;
pub use expense::{split_annual, ExpenseCycle, InactiveSet, Method};
