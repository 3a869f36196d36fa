//! Hook registry.
//!
//! An explicit handler table, built once at startup and handed to the
//! dispatcher. Hooks run in registration order within each kind; named
//! hooks carry the transaction name they are scoped to.

use std::collections::HashMap;
use std::sync::Arc;

use contract_hooks_core::{HookError, HookInfo, HookKind, HookLog, HookScope, Result, Transaction};
use tracing::{debug, warn};

use crate::handler::{HookHandler, RunHook, TransactionHook};

/// One registered hook.
#[derive(Clone)]
pub struct Registration {
    /// Lifecycle point.
    pub kind: HookKind,
    /// Transaction name for named kinds.
    pub selector: Option<String>,
    /// Global registration position.
    pub order: usize,
    /// Hook body.
    pub handler: Arc<dyn HookHandler>,
}

impl Registration {
    /// Whether this hook fires for a transaction named `name`.
    ///
    /// Unnamed hooks fire for every transaction.
    pub fn applies_to(&self, name: Option<&str>) -> bool {
        match (&self.selector, name) {
            (None, _) => true,
            (Some(selector), Some(name)) => selector == name,
            (Some(_), None) => false,
        }
    }
}

/// Registry of lifecycle hooks, organized by [`HookKind`].
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<HookKind, Vec<Registration>>,
    next_order: usize,
}

impl HookRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook body for `kind`.
    ///
    /// Named kinds (`before`, `beforeValidation`, `after`) require a
    /// selector; all other kinds must not have one.
    pub fn register(
        &mut self,
        kind: HookKind,
        selector: Option<String>,
        handler: Arc<dyn HookHandler>,
    ) -> Result<()> {
        match (kind.is_named(), &selector) {
            (true, None) => {
                return Err(HookError::Registration(format!(
                    "{kind} hooks need a transaction name"
                )));
            }
            (true, Some(s)) if s.is_empty() => {
                return Err(HookError::Registration(format!(
                    "{kind} hooks need a non-empty transaction name"
                )));
            }
            (false, Some(s)) => {
                return Err(HookError::Registration(format!(
                    "{kind} hooks apply to every transaction, got selector '{s}'"
                )));
            }
            _ => {}
        }

        debug!(kind = %kind, selector = selector.as_deref().unwrap_or("-"), order = self.next_order, "Registering hook");
        self.hooks.entry(kind).or_default().push(Registration {
            kind,
            selector,
            order: self.next_order,
            handler,
        });
        self.next_order += 1;
        Ok(())
    }

    fn push_unchecked(
        &mut self,
        kind: HookKind,
        selector: Option<String>,
        handler: Arc<dyn HookHandler>,
    ) {
        if let Err(e) = self.register(kind, selector, handler) {
            // Only reachable through an empty selector.
            warn!(error = %e, "Hook not registered");
        }
    }

    fn push_run<F>(&mut self, kind: HookKind, hook: F)
    where
        F: Fn(&mut [Transaction], &HookLog) -> Result<()> + Send + Sync + 'static,
    {
        debug_assert_eq!(kind.scope(), HookScope::Run);
        self.push_unchecked(kind, None, Arc::new(RunHook(hook)))
    }

    fn push_transaction<F>(&mut self, kind: HookKind, selector: Option<String>, hook: F)
    where
        F: Fn(&mut Transaction, &HookLog) -> Result<()> + Send + Sync + 'static,
    {
        debug_assert_eq!(kind.scope(), HookScope::Transaction);
        self.push_unchecked(kind, selector, Arc::new(TransactionHook(hook)))
    }

    /// Run once before any transaction.
    pub fn before_all<F>(&mut self, hook: F)
    where
        F: Fn(&mut [Transaction], &HookLog) -> Result<()> + Send + Sync + 'static,
    {
        self.push_run(HookKind::BeforeAll, hook)
    }

    /// Run before every transaction.
    pub fn before_each<F>(&mut self, hook: F)
    where
        F: Fn(&mut Transaction, &HookLog) -> Result<()> + Send + Sync + 'static,
    {
        self.push_transaction(HookKind::BeforeEach, None, hook)
    }

    /// Run before the transaction named `name`.
    pub fn before<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn(&mut Transaction, &HookLog) -> Result<()> + Send + Sync + 'static,
    {
        self.push_transaction(HookKind::Before, Some(name.into()), hook)
    }

    /// Run before every transaction is validated.
    pub fn before_each_validation<F>(&mut self, hook: F)
    where
        F: Fn(&mut Transaction, &HookLog) -> Result<()> + Send + Sync + 'static,
    {
        self.push_transaction(HookKind::BeforeEachValidation, None, hook)
    }

    /// Run before the transaction named `name` is validated.
    pub fn before_validation<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn(&mut Transaction, &HookLog) -> Result<()> + Send + Sync + 'static,
    {
        self.push_transaction(HookKind::BeforeValidation, Some(name.into()), hook)
    }

    /// Run after the transaction named `name`.
    pub fn after<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn(&mut Transaction, &HookLog) -> Result<()> + Send + Sync + 'static,
    {
        self.push_transaction(HookKind::After, Some(name.into()), hook)
    }

    /// Run after every transaction.
    pub fn after_each<F>(&mut self, hook: F)
    where
        F: Fn(&mut Transaction, &HookLog) -> Result<()> + Send + Sync + 'static,
    {
        self.push_transaction(HookKind::AfterEach, None, hook)
    }

    /// Run once after every transaction has run.
    pub fn after_all<F>(&mut self, hook: F)
    where
        F: Fn(&mut [Transaction], &HookLog) -> Result<()> + Send + Sync + 'static,
    {
        self.push_run(HookKind::AfterAll, hook)
    }

    /// Hooks of `kind` that apply to a transaction named `name`, in
    /// registration order. Pass `None` for run-scoped kinds.
    #[must_use]
    pub fn handlers_for(&self, kind: HookKind, name: Option<&str>) -> Vec<Registration> {
        self.hooks
            .get(&kind)
            .map(|regs| regs.iter().filter(|r| r.applies_to(name)).cloned().collect())
            .unwrap_or_default()
    }

    /// Information about every registered hook, in registration order.
    #[must_use]
    pub fn list_all(&self) -> Vec<HookInfo> {
        let mut infos: Vec<HookInfo> = self
            .hooks
            .values()
            .flatten()
            .map(|r| HookInfo {
                kind: r.kind,
                selector: r.selector.clone(),
                order: r.order,
            })
            .collect();
        infos.sort_by_key(|info| info.order);
        infos
    }

    /// Total number of registered hooks.
    #[must_use]
    pub fn count(&self) -> usize {
        self.hooks.values().map(Vec::len).sum()
    }

    /// Remove every registered hook.
    pub fn clear(&mut self) {
        self.hooks.clear();
        self.next_order = 0;
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hook_count", &self.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HookPayload;
    use assert_matches::assert_matches;

    struct Noop;

    impl HookHandler for Noop {
        fn handle(&self, _payload: HookPayload<'_>, _log: &HookLog) -> Result<()> {
            Ok(())
        }
    }

    fn noop() -> Arc<dyn HookHandler> {
        Arc::new(Noop)
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = HookRegistry::new();
        assert_eq!(registry.count(), 0);
        assert!(registry.list_all().is_empty());
    }

    #[test]
    fn register_unnamed_kind() {
        let mut registry = HookRegistry::new();
        registry.register(HookKind::BeforeEach, None, noop()).unwrap();
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.handlers_for(HookKind::BeforeEach, Some("any")).len(), 1);
    }

    #[test]
    fn named_kind_requires_selector() {
        let mut registry = HookRegistry::new();
        assert_matches!(
            registry.register(HookKind::Before, None, noop()),
            Err(HookError::Registration(_))
        );
        assert_matches!(
            registry.register(HookKind::After, Some(String::new()), noop()),
            Err(HookError::Registration(_))
        );
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn unnamed_kind_rejects_selector() {
        let mut registry = HookRegistry::new();
        assert_matches!(
            registry.register(HookKind::AfterAll, Some("x".to_string()), noop()),
            Err(HookError::Registration(_))
        );
    }

    #[test]
    fn named_hooks_filter_by_transaction_name() {
        let mut registry = HookRegistry::new();
        registry.before("A > B", |_, _| Ok(()));
        registry.before("A > C", |_, _| Ok(()));
        assert_eq!(registry.handlers_for(HookKind::Before, Some("A > B")).len(), 1);
        assert_eq!(registry.handlers_for(HookKind::Before, Some("A > C")).len(), 1);
        assert!(registry.handlers_for(HookKind::Before, Some("A > D")).is_empty());
        assert!(registry.handlers_for(HookKind::Before, None).is_empty());
    }

    #[test]
    fn handlers_keep_registration_order() {
        let mut registry = HookRegistry::new();
        registry.after_each(|_, log| {
            log.log("first");
            Ok(())
        });
        registry.after_each(|_, log| {
            log.log("second");
            Ok(())
        });
        let regs = registry.handlers_for(HookKind::AfterEach, Some("t"));
        assert_eq!(regs.len(), 2);
        assert!(regs[0].order < regs[1].order);
    }

    #[test]
    fn list_all_in_registration_order() {
        let mut registry = HookRegistry::new();
        registry.after_all(|_, _| Ok(()));
        registry.before("X", |_, _| Ok(()));
        registry.before_all(|_, _| Ok(()));
        let kinds: Vec<_> = registry.list_all().iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![HookKind::AfterAll, HookKind::Before, HookKind::BeforeAll]
        );
        assert_eq!(registry.list_all()[1].selector.as_deref(), Some("X"));
    }

    #[test]
    fn empty_selector_via_builder_is_dropped() {
        let mut registry = HookRegistry::new();
        registry.after("", |_, _| Ok(()));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn clear_resets() {
        let mut registry = HookRegistry::new();
        registry.before_each(|_, _| Ok(()));
        registry.after_each(|_, _| Ok(()));
        registry.clear();
        assert_eq!(registry.count(), 0);
        registry.before_each(|_, _| Ok(()));
        assert_eq!(registry.list_all()[0].order, 0);
    }

    #[test]
    fn applies_to_rules() {
        let unnamed = Registration {
            kind: HookKind::BeforeEach,
            selector: None,
            order: 0,
            handler: noop(),
        };
        assert!(unnamed.applies_to(None));
        assert!(unnamed.applies_to(Some("x")));

        let named = Registration {
            selector: Some("x".to_string()),
            kind: HookKind::Before,
            ..unnamed
        };
        assert!(named.applies_to(Some("x")));
        assert!(!named.applies_to(Some("y")));
        assert!(!named.applies_to(None));
    }

    #[test]
    fn debug_impl() {
        let registry = HookRegistry::new();
        let debug = format!("{registry:?}");
        assert!(debug.contains("HookRegistry"));
        assert!(debug.contains("hook_count"));
    }
}
