//! Hook dispatcher.
//!
//! Invokes registered hooks for one lifecycle point at a time, or drives a
//! whole run in lifecycle order. Each dispatcher owns the [`HookLog`] its
//! hooks write to.
//!
//! # Execution Model
//!
//! Hooks for a lifecycle point run sequentially in registration order. The
//! first error stops the remaining hooks for that point and is returned to
//! the caller; nothing is retried or swallowed here.
//!
//! A transaction a hook flags `skip` during `beforeEach`/`before` is neither
//! executed nor validated, so its validation hooks do not fire. Its
//! `after`/`afterEach` hooks still do.

use std::sync::Arc;

use contract_hooks_core::{HookError, HookKind, HookLog, HookScope, Result, Transaction};
use tracing::{debug, instrument};

use crate::handler::HookPayload;
use crate::registry::HookRegistry;

/// Runs hooks from a [`HookRegistry`] in lifecycle order.
pub struct HookDispatcher {
    registry: Arc<HookRegistry>,
    log: HookLog,
}

impl HookDispatcher {
    /// Create a dispatcher owning `registry`, with a fresh log.
    #[must_use]
    pub fn new(registry: HookRegistry) -> Self {
        Self::from_shared(Arc::new(registry))
    }

    /// Create a dispatcher over a shared registry, with a fresh log.
    #[must_use]
    pub fn from_shared(registry: Arc<HookRegistry>) -> Self {
        Self {
            registry,
            log: HookLog::new(),
        }
    }

    /// The log hooks write to.
    pub fn log(&self) -> &HookLog {
        &self.log
    }

    /// The registry hooks are drawn from.
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Run every `kind` hook over the whole transaction list.
    ///
    /// Only valid for run-scoped kinds (`beforeAll`, `afterAll`).
    #[instrument(skip_all, fields(kind = %kind, transactions = transactions.len()))]
    pub fn dispatch_all(&self, kind: HookKind, transactions: &mut [Transaction]) -> Result<()> {
        if kind.scope() != HookScope::Run {
            return Err(HookError::Protocol(format!(
                "{kind} hooks take a single transaction"
            )));
        }

        for registration in self.registry.handlers_for(kind, None) {
            debug!(order = registration.order, "Invoking hook");
            registration
                .handler
                .handle(HookPayload::Transactions(&mut *transactions), &self.log)?;
        }
        Ok(())
    }

    /// Run every `kind` hook that applies to `transaction`.
    ///
    /// Only valid for transaction-scoped kinds; named kinds fire only when
    /// the transaction's name equals their selector.
    #[instrument(skip_all, fields(kind = %kind, transaction = %transaction.name))]
    pub fn dispatch(&self, kind: HookKind, transaction: &mut Transaction) -> Result<()> {
        if kind.scope() != HookScope::Transaction {
            return Err(HookError::Protocol(format!(
                "{kind} hooks take the transaction list"
            )));
        }

        let name = transaction.name.clone();
        for registration in self.registry.handlers_for(kind, Some(&name)) {
            debug!(
                order = registration.order,
                selector = registration.selector.as_deref().unwrap_or("-"),
                "Invoking hook"
            );
            registration
                .handler
                .handle(HookPayload::Transaction(&mut *transaction), &self.log)?;
        }
        Ok(())
    }

    /// Drive a complete run.
    ///
    /// `execute` stands in for the contract-testing tool: it is called where
    /// the tool would send the request and validate the response.
    pub fn run<F>(&self, transactions: &mut [Transaction], mut execute: F) -> Result<()>
    where
        F: FnMut(&mut Transaction) -> Result<()>,
    {
        self.dispatch_all(HookKind::BeforeAll, transactions)?;

        for transaction in transactions.iter_mut() {
            self.dispatch(HookKind::BeforeEach, transaction)?;
            self.dispatch(HookKind::Before, transaction)?;

            if transaction.skip {
                debug!(transaction = %transaction.name, "Transaction skipped");
            } else {
                self.dispatch(HookKind::BeforeEachValidation, transaction)?;
                self.dispatch(HookKind::BeforeValidation, transaction)?;
                execute(transaction)?;
            }

            self.dispatch(HookKind::After, transaction)?;
            self.dispatch(HookKind::AfterEach, transaction)?;
        }

        self.dispatch_all(HookKind::AfterAll, transactions)
    }
}

impl std::fmt::Debug for HookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookDispatcher")
            .field("registry", &self.registry)
            .field("log", &self.log)
            .finish()
    }
}
