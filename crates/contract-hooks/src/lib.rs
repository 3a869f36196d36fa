//! # contract-hooks
//!
//! Lifecycle hooks for an API contract-testing tool.
//!
//! Hooks attach to eight points around transaction execution. A run with a
//! single transaction reaches them in this order:
//!
//! ```text
//! beforeAll
//!   beforeEach → before(name) → beforeEachValidation → beforeValidation(name)
//!   (transaction executed and validated by the tool)
//!   after(name) → afterEach
//! afterAll
//! ```
//!
//! The three named kinds only fire for the transaction whose name equals the
//! hook's selector.
//!
//! ## Pieces
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `handler` | [`HookHandler`](handler::HookHandler) trait and closure adapters |
//! | `registry` | Explicit handler table, built at startup |
//! | `dispatcher` | Runs registered hooks in lifecycle order |
//! | `protocol` | Newline-delimited JSON messages exchanged with the tool |
//! | `server` | TCP hooks-handler the tool connects to |
//!
//! Hooks complete by returning. An `Err` stops the remaining hooks for that
//! lifecycle point and is surfaced to whoever invoked the dispatcher.
//!
//! ## Example
//!
//! ```rust
//! use contract_hooks::dispatcher::HookDispatcher;
//! use contract_hooks::registry::HookRegistry;
//! use contract_hooks::Transaction;
//!
//! let mut registry = HookRegistry::new();
//! registry.before_each(|_transaction, log| {
//!     log.log("before each");
//!     Ok(())
//! });
//!
//! let dispatcher = HookDispatcher::new(registry);
//! let mut transactions = vec![Transaction::named("Machines > List")];
//! dispatcher.run(&mut transactions, |_| Ok(())).unwrap();
//! assert_eq!(dispatcher.log().lines(), vec!["before each"]);
//! ```

#![deny(unsafe_code)]

pub mod dispatcher;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod server;

pub use contract_hooks_core::{
    HookError, HookInfo, HookKind, HookLog, HookScope, Result, Transaction,
};
