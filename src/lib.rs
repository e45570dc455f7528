#![doc(test(attr(deny(warnings))))]

//! Renobudget keeps a renovation budget as an ordered ledger of line
//! items and offers aggregation, persistence, and export surfaces on top,
//! plus the interactive shell that drives them.

pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Renobudget tracing initialized.");
    });
}
