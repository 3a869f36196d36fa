//! Hook handler trait.
//!
//! Defines the [`HookHandler`] trait every hook body satisfies, plus the
//! closure adapters the registry's `before_all`/`before_each`/... calls wrap
//! their arguments in.

use contract_hooks_core::{HookError, HookLog, Result, Transaction};

/// What a hook receives, depending on its kind's scope.
#[derive(Debug)]
pub enum HookPayload<'a> {
    /// Every transaction of the run (`beforeAll`, `afterAll`).
    Transactions(&'a mut [Transaction]),
    /// The transaction the lifecycle is currently at.
    Transaction(&'a mut Transaction),
}

impl HookPayload<'_> {
    fn shape(&self) -> &'static str {
        match self {
            Self::Transactions(_) => "transaction list",
            Self::Transaction(_) => "single transaction",
        }
    }
}

/// A lifecycle hook body.
///
/// Returning completes the hook; there is no separate completion signal.
/// A hook may log through `log` and may flag the transaction (`skip`,
/// `fail`), but should otherwise treat the payload as read-only.
pub trait HookHandler: Send + Sync {
    /// Execute the hook.
    fn handle(&self, payload: HookPayload<'_>, log: &HookLog) -> Result<()>;
}

/// Adapter for closures over the whole transaction list.
pub struct RunHook<F>(pub F);

impl<F> HookHandler for RunHook<F>
where
    F: Fn(&mut [Transaction], &HookLog) -> Result<()> + Send + Sync,
{
    fn handle(&self, payload: HookPayload<'_>, log: &HookLog) -> Result<()> {
        match payload {
            HookPayload::Transactions(transactions) => (self.0)(transactions, log),
            other => Err(HookError::Protocol(format!(
                "run-scoped hook received a {}",
                other.shape()
            ))),
        }
    }
}

/// Adapter for closures over a single transaction.
pub struct TransactionHook<F>(pub F);

impl<F> HookHandler for TransactionHook<F>
where
    F: Fn(&mut Transaction, &HookLog) -> Result<()> + Send + Sync,
{
    fn handle(&self, payload: HookPayload<'_>, log: &HookLog) -> Result<()> {
        match payload {
            HookPayload::Transaction(transaction) => (self.0)(transaction, log),
            other => Err(HookError::Protocol(format!(
                "transaction-scoped hook received a {}",
                other.shape()
            ))),
        }
    }
}
