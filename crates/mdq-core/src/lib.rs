//! mdq-core: engine for the queued multi-worker music download manager.
//!
//! Ownership model: one [`ledger::Ledger`] holds the work queue and every
//! piece of state the status view reads. The worker pool, the status
//! renderer, and the CLI dispatcher each hold an `Arc` to it; nothing else
//! is shared between tasks.

pub mod config;
pub mod control;
pub mod fetch;
pub mod ledger;
pub mod logging;
pub mod pool;
pub mod render;
pub mod storage;
