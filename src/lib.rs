#![doc(test(attr(deny(warnings))))]

//! SplitBite records shared expenses for a small group, month by month, and
//! works out who overpaid and who still owes their share.
//!
//! The settlement and month logic live in [`core`]; persistence sits behind the
//! [`storage::KeyValueStore`] trait so the same session runs against a JSON
//! directory on disk or an in-memory map in tests.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod report;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("SplitBite tracing initialized.");
    });
}
