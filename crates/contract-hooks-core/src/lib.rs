//! # contract-hooks-core
//!
//! Foundation types shared by the hook registry, the dispatcher, and the
//! hooks-handler server:
//!
//! - [`HookKind`] — the eight lifecycle points a hook can attach to
//! - [`Transaction`] — one request/response exchange under contract test
//! - [`HookError`] — error type for registration, dispatch, and the wire
//! - [`HookLog`] — per-run log sink handed to every hook
//! - [`logging`] — `tracing` subscriber setup and test capture helpers

#![deny(unsafe_code)]

pub mod errors;
pub mod hook_log;
pub mod logging;
pub mod transaction;
pub mod types;

pub use errors::{HookError, Result};
pub use hook_log::HookLog;
pub use transaction::Transaction;
pub use types::{HookInfo, HookKind, HookScope};
