//! Core types for the hook system.
//!
//! Hook kinds serialize with the camelCase event names used on the
//! hooks-handler wire (`beforeAll`, `beforeEachValidation`, ...).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::HookError;

/// Lifecycle point a hook attaches to.
///
/// Variants are declared in the order the dispatcher reaches them during a
/// run with a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookKind {
    /// Once, before any transaction runs.
    BeforeAll,
    /// Before every transaction.
    BeforeEach,
    /// Before one named transaction.
    Before,
    /// Before every transaction is validated.
    BeforeEachValidation,
    /// Before one named transaction is validated.
    BeforeValidation,
    /// After one named transaction.
    After,
    /// After every transaction.
    AfterEach,
    /// Once, after every transaction has run.
    AfterAll,
}

/// What a hook of a given kind receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookScope {
    /// The whole ordered list of transactions.
    Run,
    /// A single transaction.
    Transaction,
}

impl HookKind {
    /// Returns all hook kinds in lifecycle order.
    #[must_use]
    pub fn all() -> &'static [HookKind] {
        &[
            Self::BeforeAll,
            Self::BeforeEach,
            Self::Before,
            Self::BeforeEachValidation,
            Self::BeforeValidation,
            Self::After,
            Self::AfterEach,
            Self::AfterAll,
        ]
    }

    /// Whether hooks of this kind are scoped to one transaction by name.
    #[must_use]
    pub fn is_named(self) -> bool {
        matches!(self, Self::Before | Self::BeforeValidation | Self::After)
    }

    /// Payload scope for this kind.
    #[must_use]
    pub fn scope(self) -> HookScope {
        match self {
            Self::BeforeAll | Self::AfterAll => HookScope::Run,
            _ => HookScope::Transaction,
        }
    }

    /// Event name used on the hooks-handler wire.
    #[must_use]
    pub fn event_name(self) -> &'static str {
        match self {
            Self::BeforeAll => "beforeAll",
            Self::BeforeEach => "beforeEach",
            Self::Before => "before",
            Self::BeforeEachValidation => "beforeEachValidation",
            Self::BeforeValidation => "beforeValidation",
            Self::After => "after",
            Self::AfterEach => "afterEach",
            Self::AfterAll => "afterAll",
        }
    }
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.event_name())
    }
}

impl FromStr for HookKind {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.event_name() == s)
            .ok_or_else(|| HookError::UnknownEvent(s.to_string()))
    }
}

/// Summary of one registered hook, for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookInfo {
    /// Lifecycle point.
    pub kind: HookKind,
    /// Transaction name the hook is scoped to, for named kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Position in registration order (zero-based).
    pub order: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_kinds_in_lifecycle_order() {
        let all = HookKind::all();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], HookKind::BeforeAll);
        assert_eq!(all[7], HookKind::AfterAll);
        let mut sorted = all.to_vec();
        sorted.sort();
        assert_eq!(sorted, all);
    }

    #[test]
    fn named_kinds() {
        let named: Vec<_> = HookKind::all().iter().filter(|k| k.is_named()).collect();
        assert_eq!(
            named,
            vec![&HookKind::Before, &HookKind::BeforeValidation, &HookKind::After]
        );
    }

    #[test]
    fn run_scope_only_for_all_hooks() {
        for kind in HookKind::all() {
            let expected = matches!(kind, HookKind::BeforeAll | HookKind::AfterAll);
            assert_eq!(kind.scope() == HookScope::Run, expected, "{kind}");
        }
    }

    #[test]
    fn serde_matches_event_name() {
        for kind in HookKind::all() {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.event_name().to_string()));
        }
    }

    #[test]
    fn display_honours_width() {
        assert_eq!(format!("{:<8}|", HookKind::After), "after   |");
    }

    #[test]
    fn from_str_known_and_unknown() {
        assert_eq!(
            "beforeEachValidation".parse::<HookKind>().unwrap(),
            HookKind::BeforeEachValidation
        );
        assert!("beforeLunch".parse::<HookKind>().is_err());
        assert!("BeforeAll".parse::<HookKind>().is_err());
    }

    #[test]
    fn hook_info_omits_missing_selector() {
        let info = HookInfo {
            kind: HookKind::AfterAll,
            selector: None,
            order: 7,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "afterAll", "order": 7}));
    }
}
