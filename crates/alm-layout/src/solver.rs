//! LP feasibility check backed by the `kasuari` Cassowary solver.
//!
//! A fresh solver is built for every call. Required constraints are added
//! first so the first unsatisfiable one is reported as infeasibility rather
//! than being traded off against soft constraints.

use std::collections::{BTreeMap, HashMap};

use alm_core::{debug, debug_span, warn};
use kasuari::WeightedRelation::{EQ, GE, LE};
use kasuari::{
    AddConstraintError, Constraint as SolverConstraint, Expression, Solver,
    Strength as SolverStrength, Term as SolverTerm, Variable,
};

use crate::area::AreaSide;
use crate::constraint::{Relation, Strength};
use crate::error::LayoutError;
use crate::layout::Layout;
use crate::tab::TabId;

/// Result of a feasibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    Feasible,
    Infeasible,
}

impl Feasibility {
    #[must_use]
    pub const fn is_feasible(self) -> bool {
        matches!(self, Self::Feasible)
    }
}

/// Tab values of a feasible layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    values: BTreeMap<TabId, f64>,
}

impl Solution {
    #[must_use]
    pub fn value(&self, tab: TabId) -> Option<f64> {
        self.values.get(&tab).copied()
    }

    /// Solved values in tab ID order.
    pub fn values(&self) -> impl Iterator<Item = (TabId, f64)> + '_ {
        self.values.iter().map(|(tab, value)| (*tab, *value))
    }
}

const fn strength(strength: Strength) -> SolverStrength {
    match strength {
        Strength::Required => SolverStrength::REQUIRED,
        Strength::Strong => SolverStrength::STRONG,
        Strength::Medium => SolverStrength::MEDIUM,
        Strength::Weak => SolverStrength::WEAK,
    }
}

/// Tab to solver variable mapping for one solve.
struct Variables {
    by_tab: BTreeMap<TabId, Variable>,
}

impl Variables {
    fn new(layout: &Layout) -> Self {
        let by_tab = layout
            .tabs()
            .iter()
            .map(|(tab, _)| (tab, Variable::new()))
            .collect();
        Self { by_tab }
    }

    fn get(&self, tab: TabId) -> Result<Variable, LayoutError> {
        self.by_tab
            .get(&tab)
            .copied()
            .ok_or(LayoutError::UnknownTab { tab })
    }

    fn expression(&self, terms: &[(f64, TabId)]) -> Result<Expression, LayoutError> {
        let terms = terms
            .iter()
            .map(|&(coefficient, tab)| Ok(SolverTerm::new(self.get(tab)?, coefficient)))
            .collect::<Result<Vec<_>, LayoutError>>()?;
        Ok(Expression::new(terms, 0.0))
    }

    /// `far - near`
    fn extent(&self, near: TabId, far: TabId) -> Result<Expression, LayoutError> {
        self.expression(&[(1.0, far), (-1.0, near)])
    }
}

fn relation(
    expression: Expression,
    relation: Relation,
    strength: SolverStrength,
    rhs: f64,
) -> SolverConstraint {
    match relation {
        Relation::Eq => expression | EQ(strength) | rhs,
        Relation::Ge => expression | GE(strength) | rhs,
        Relation::Le => expression | LE(strength) | rhs,
    }
}

/// Required constraints of `layout`: borders, size bounds, and every
/// `Required` layout constraint.
fn required_constraints(
    layout: &Layout,
    vars: &Variables,
) -> Result<Vec<SolverConstraint>, LayoutError> {
    let required = SolverStrength::REQUIRED;
    let size = layout.size();
    let mut out = vec![
        relation(vars.expression(&[(1.0, layout.left())])?, Relation::Eq, required, 0.0),
        relation(vars.expression(&[(1.0, layout.top())])?, Relation::Eq, required, 0.0),
        relation(
            vars.expression(&[(1.0, layout.right())])?,
            Relation::Eq,
            required,
            size.width,
        ),
        relation(
            vars.expression(&[(1.0, layout.bottom())])?,
            Relation::Eq,
            required,
            size.height,
        ),
    ];

    for area in layout.areas() {
        let width = vars.extent(area.left, area.right)?;
        let height = vars.extent(area.top, area.bottom)?;
        out.push(relation(
            width.clone(),
            Relation::Ge,
            required,
            area.min_size.width.max(0.0),
        ));
        out.push(relation(
            height.clone(),
            Relation::Ge,
            required,
            area.min_size.height.max(0.0),
        ));
        if let Some(max) = area.max_size {
            out.push(relation(width, Relation::Le, required, max.width));
            out.push(relation(height, Relation::Le, required, max.height));
        }
    }

    for constraint in layout.constraints() {
        if constraint.strength != Strength::Required {
            continue;
        }
        let terms: Vec<(f64, TabId)> = constraint
            .terms
            .iter()
            .map(|term| (term.coefficient, term.tab))
            .collect();
        out.push(relation(
            vars.expression(&terms)?,
            constraint.relation,
            required,
            constraint.rhs,
        ));
    }
    Ok(out)
}

/// Soft constraints: non-required layout constraints at their strength,
/// preferred sizes at medium, and a weak stay on every tab.
fn soft_constraints(
    layout: &Layout,
    vars: &Variables,
) -> Result<Vec<SolverConstraint>, LayoutError> {
    let mut out = Vec::new();
    for constraint in layout.constraints() {
        if constraint.strength == Strength::Required {
            continue;
        }
        let terms: Vec<(f64, TabId)> = constraint
            .terms
            .iter()
            .map(|term| (term.coefficient, term.tab))
            .collect();
        out.push(relation(
            vars.expression(&terms)?,
            constraint.relation,
            strength(constraint.strength),
            constraint.rhs,
        ));
    }

    for area in layout.areas() {
        if let Some(preferred) = area.preferred_size {
            out.push(relation(
                vars.extent(area.tab(AreaSide::Left), area.tab(AreaSide::Right))?,
                Relation::Eq,
                SolverStrength::MEDIUM,
                preferred.width,
            ));
            out.push(relation(
                vars.extent(area.tab(AreaSide::Top), area.tab(AreaSide::Bottom))?,
                Relation::Eq,
                SolverStrength::MEDIUM,
                preferred.height,
            ));
        }
    }

    for (tab, slot) in layout.tabs().iter() {
        out.push(relation(
            vars.expression(&[(1.0, tab)])?,
            Relation::Eq,
            SolverStrength::WEAK,
            slot.value,
        ));
    }
    Ok(out)
}

/// Solve `layout` without modifying it.
///
/// Returns `Ok(None)` when a required constraint cannot be satisfied.
pub fn solve(layout: &Layout) -> Result<Option<Solution>, LayoutError> {
    let _span = debug_span!(
        "alm.solver.solve",
        areas = layout.area_count(),
        constraints = layout.constraints().len()
    )
    .entered();

    let vars = Variables::new(layout);
    let mut solver = Solver::new();

    for constraint in required_constraints(layout, &vars)? {
        match solver.add_constraint(constraint) {
            Ok(()) => {}
            Err(AddConstraintError::UnsatisfiableConstraint) => {
                debug!("required constraint unsatisfiable");
                return Ok(None);
            }
            Err(err) => {
                warn!("solver rejected required constraint: {:?}", err);
                return Err(LayoutError::Solver {
                    message: format!("{err:?}"),
                });
            }
        }
    }
    for constraint in soft_constraints(layout, &vars)? {
        if let Err(err) = solver.add_constraint(constraint) {
            warn!("solver rejected soft constraint: {:?}", err);
            return Err(LayoutError::Solver {
                message: format!("{err:?}"),
            });
        }
    }

    // Variables missing from the change list are still at zero.
    let tab_of: HashMap<Variable, TabId> =
        vars.by_tab.iter().map(|(tab, var)| (*var, *tab)).collect();
    let mut values: BTreeMap<TabId, f64> = vars.by_tab.keys().map(|tab| (*tab, 0.0)).collect();
    for &(variable, value) in solver.fetch_changes() {
        if let Some(tab) = tab_of.get(&variable) {
            values.insert(*tab, value);
        }
    }
    Ok(Some(Solution { values }))
}
