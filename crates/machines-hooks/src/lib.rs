//! # machines-hooks
//!
//! Lifecycle hooks for the Machines API contract tests. Every hook logs a
//! fixed line and completes; three of them are scoped to the
//! [`GET_MACHINES`] transaction.
//!
//! Hooks are registered into an explicit [`HookRegistry`] built at startup,
//! which the binary hands to the hooks-handler server.

#![deny(unsafe_code)]

use contract_hooks::registry::HookRegistry;

/// Transaction the named hooks are scoped to.
pub const GET_MACHINES: &str = "Machines > Machines collection > Get Machines";

/// Register the Machines hooks into `registry`.
pub fn register(hooks: &mut HookRegistry) {
    hooks.before_all(|_transactions, log| {
        log.log("before all");
        Ok(())
    });

    hooks.before_each(|_transaction, log| {
        log.log("before each");
        Ok(())
    });

    hooks.before(GET_MACHINES, |_transaction, log| {
        log.log("before");
        Ok(())
    });

    hooks.before_each_validation(|_transaction, log| {
        log.log("before each validation");
        Ok(())
    });

    hooks.before_validation(GET_MACHINES, |_transaction, log| {
        log.log("before validation");
        Ok(())
    });

    hooks.after(GET_MACHINES, |_transaction, log| {
        log.log("after");
        Ok(())
    });

    hooks.after_each(|_transaction, log| {
        log.log("after each");
        Ok(())
    });

    hooks.after_all(|_transactions, log| {
        log.log("after all");
        Ok(())
    });
}

/// A fresh registry holding only the Machines hooks.
#[must_use]
pub fn registry() -> HookRegistry {
    let mut hooks = HookRegistry::new();
    register(&mut hooks);
    hooks
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract_hooks::dispatcher::HookDispatcher;
    use contract_hooks::{HookKind, Transaction};

    #[test]
    fn registers_eight_hooks_in_order() {
        let kinds: Vec<_> = registry().list_all().iter().map(|i| i.kind).collect();
        assert_eq!(kinds, HookKind::all());
    }

    #[test]
    fn named_hooks_share_selector() {
        for info in registry().list_all() {
            let expected = info.kind.is_named().then_some(GET_MACHINES);
            assert_eq!(info.selector.as_deref(), expected, "{}", info.kind);
        }
    }

    #[test]
    fn each_kind_logs_its_line_once() {
        let cases = [
            (HookKind::BeforeEach, "before each"),
            (HookKind::Before, "before"),
            (HookKind::BeforeEachValidation, "before each validation"),
            (HookKind::BeforeValidation, "before validation"),
            (HookKind::After, "after"),
            (HookKind::AfterEach, "after each"),
        ];
        for (kind, line) in cases {
            let dispatcher = HookDispatcher::new(registry());
            let mut tx = Transaction::named(GET_MACHINES);
            dispatcher.dispatch(kind, &mut tx).unwrap();
            assert_eq!(dispatcher.log().lines(), vec![line], "{kind}");
        }

        for (kind, line) in [(HookKind::BeforeAll, "before all"), (HookKind::AfterAll, "after all")] {
            let dispatcher = HookDispatcher::new(registry());
            let mut txs = vec![Transaction::named(GET_MACHINES)];
            dispatcher.dispatch_all(kind, &mut txs).unwrap();
            assert_eq!(dispatcher.log().lines(), vec![line], "{kind}");
        }
    }

    #[test]
    fn hooks_leave_payload_untouched() {
        let dispatcher = HookDispatcher::new(registry());
        let original = Transaction {
            full_path: Some("/machines".to_string()),
            request: Some(serde_json::json!({"method": "GET"})),
            ..Transaction::named(GET_MACHINES)
        };
        let mut txs = vec![original.clone()];
        dispatcher.run(&mut txs, |_| Ok(())).unwrap();
        assert_eq!(txs, vec![original]);
    }
}
