//! Cost allocation and the billing run built on top of it.

pub mod allocation;
pub mod orchestrator;
pub mod statement;

pub use allocation::{AllocationEngine, AllocationResult, CustomerAllocation, CycleAllocation};
pub use orchestrator::{BillingInputs, Orchestrator};
pub use statement::{
    BillingResult, CustomerStatement, CycleStatement, StatementBalances, StatementRecord,
};
