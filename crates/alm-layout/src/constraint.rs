//! Linear constraints over tab values.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::tab::{TabArena, TabId};

/// Label attached to temporary constraints created by edit actions.
pub const EDIT_HELPER_LABEL: &str = "edit-helper";

/// Label attached to synthesized non-overlap constraints.
pub const OVERLAP_LABEL: &str = "overlap";

/// Stable identifier for a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintId(u64);

impl ConstraintId {
    pub const MIN: Self = Self(1);

    pub fn new(raw: u64) -> Result<Self, LayoutError> {
        if raw == 0 {
            return Err(LayoutError::ZeroId { kind: "constraint" });
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub fn checked_next(self) -> Result<Self, LayoutError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(LayoutError::IdOverflow {
                kind: "constraint",
                current: self.0,
            });
        };
        Self::new(next)
    }
}

impl std::fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Eq,
    Ge,
    Le,
}

/// Solver strength. Only `Required` constraints can make a layout infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
    Required,
}

/// `coefficient * tab`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub coefficient: f64,
    pub tab: TabId,
}

impl Term {
    pub const fn new(coefficient: f64, tab: TabId) -> Self {
        Self { coefficient, tab }
    }
}

/// `sum(terms) <relation> rhs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: ConstraintId,
    pub terms: Vec<Term>,
    pub relation: Relation,
    pub rhs: f64,
    pub strength: Strength,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Constraint {
    /// Tab of the first summand, if any.
    #[must_use]
    pub fn first_tab(&self) -> Option<TabId> {
        self.terms.first().map(|term| term.tab)
    }

    #[must_use]
    pub fn references(&self, tab: TabId) -> bool {
        self.terms.iter().any(|term| term.tab == tab)
    }

    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }

    /// Left-hand side evaluated with the current tab values.
    #[must_use]
    pub fn lhs(&self, tabs: &TabArena) -> Option<f64> {
        self.terms.iter().try_fold(0.0, |acc, term| {
            tabs.value(term.tab).map(|value| acc + term.coefficient * value)
        })
    }

    /// Whether the current tab values satisfy the constraint within `tolerance`.
    #[must_use]
    pub fn is_satisfied(&self, tabs: &TabArena, tolerance: f64) -> bool {
        let Some(lhs) = self.lhs(tabs) else {
            return false;
        };
        match self.relation {
            Relation::Eq => (lhs - self.rhs).abs() <= tolerance,
            Relation::Ge => lhs >= self.rhs - tolerance,
            Relation::Le => lhs <= self.rhs + tolerance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alm_core::geometry::Axis;

    #[test]
    fn ordering_constraint_is_evaluated_against_tab_values() {
        let mut tabs = TabArena::default();
        let a = tabs.alloc(Axis::X, 50.0).expect("alloc");
        let b = tabs.alloc(Axis::X, 60.0).expect("alloc");
        let constraint = Constraint {
            id: ConstraintId::MIN,
            terms: vec![Term::new(-1.0, a), Term::new(1.0, b)],
            relation: Relation::Ge,
            rhs: 0.0,
            strength: Strength::Required,
            label: Some(OVERLAP_LABEL.to_owned()),
        };
        assert_eq!(constraint.lhs(&tabs), Some(10.0));
        assert!(constraint.is_satisfied(&tabs, 1e-5));
        tabs.set_value(b, 40.0);
        assert!(!constraint.is_satisfied(&tabs, 1e-5));
        assert_eq!(constraint.first_tab(), Some(a));
        assert!(constraint.has_label(OVERLAP_LABEL));
    }

    #[test]
    fn unknown_tab_is_never_satisfied() {
        let tabs = TabArena::default();
        let constraint = Constraint {
            id: ConstraintId::MIN,
            terms: vec![Term::new(1.0, TabId::MIN)],
            relation: Relation::Eq,
            rhs: 0.0,
            strength: Strength::Weak,
            label: None,
        };
        assert!(!constraint.is_satisfied(&tabs, 1.0));
    }

    #[test]
    fn strengths_order_from_weak_to_required() {
        assert!(Strength::Weak < Strength::Medium);
        assert!(Strength::Strong < Strength::Required);
    }
}
