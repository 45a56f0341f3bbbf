#![doc(test(attr(deny(warnings))))]

//! Water Billing splits the semi-annual cost of running a small water system
//! across its connections and keeps each customer's running ledger of charges
//! and payments.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Water Billing tracing initialized.");
    });
}
