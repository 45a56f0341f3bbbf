//! Per-customer ledgers, the account registry, and billing periods.

pub mod account;
pub mod entry;
pub mod period;
pub mod registry;

pub use account::Account;
pub use entry::{LedgerEntry, Payment};
pub use period::Period;
pub use registry::AccountRegistry;
