use std::collections::BTreeSet;
use std::fmt;

use crate::solver::Assignment;

/// Opaque identity of a boolean variable.
///
/// Identities are dense indices handed out by
/// [`VarLayout`](crate::encoder::VarLayout); two equal ids always denote the
/// same solver variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) u32);

impl VarId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Immutable boolean formula, solver-agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// Variable reference.
    Var(VarId),
    /// Boolean literal.
    Const(bool),
    /// Conjunction; empty means `true`.
    And(Vec<Formula>),
    /// Disjunction; empty means `false`.
    Or(Vec<Formula>),
    Not(Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
}

#[allow(clippy::should_implement_trait)]
impl Formula {
    pub fn var(id: VarId) -> Self {
        Formula::Var(id)
    }

    pub fn constant(b: bool) -> Self {
        Formula::Const(b)
    }

    pub fn and(terms: Vec<Formula>) -> Self {
        Formula::And(terms)
    }

    pub fn or(terms: Vec<Formula>) -> Self {
        Formula::Or(terms)
    }

    pub fn not(self) -> Self {
        Formula::Not(Box::new(self))
    }

    pub fn implies(self, other: Formula) -> Self {
        Formula::Implies(Box::new(self), Box::new(other))
    }

    /// Evaluate under `assignment`.
    ///
    /// Returns `None` when a variable the result depends on has no value.
    pub fn eval(&self, assignment: &Assignment) -> Option<bool> {
        match self {
            Formula::Var(id) => assignment.get(*id),
            Formula::Const(b) => Some(*b),
            Formula::And(terms) => {
                let mut unknown = false;
                for t in terms {
                    match t.eval(assignment) {
                        Some(false) => return Some(false),
                        Some(true) => {}
                        None => unknown = true,
                    }
                }
                (!unknown).then_some(true)
            }
            Formula::Or(terms) => {
                let mut unknown = false;
                for t in terms {
                    match t.eval(assignment) {
                        Some(true) => return Some(true),
                        Some(false) => {}
                        None => unknown = true,
                    }
                }
                (!unknown).then_some(false)
            }
            Formula::Not(inner) => inner.eval(assignment).map(|b| !b),
            Formula::Implies(lhs, rhs) => match (lhs.eval(assignment), rhs.eval(assignment)) {
                (Some(false), _) | (_, Some(true)) => Some(true),
                (Some(true), Some(false)) => Some(false),
                _ => None,
            },
        }
    }

    /// All variables mentioned anywhere in the formula, in id order.
    pub fn collect_vars(&self) -> BTreeSet<VarId> {
        let mut out = BTreeSet::new();
        self.collect_vars_into(&mut out);
        out
    }

    fn collect_vars_into(&self, out: &mut BTreeSet<VarId>) {
        match self {
            Formula::Var(id) => {
                out.insert(*id);
            }
            Formula::Const(_) => {}
            Formula::And(terms) | Formula::Or(terms) => {
                for t in terms {
                    t.collect_vars_into(out);
                }
            }
            Formula::Not(inner) => inner.collect_vars_into(out),
            Formula::Implies(lhs, rhs) => {
                lhs.collect_vars_into(out);
                rhs.collect_vars_into(out);
            }
        }
    }

    /// Number of nodes in the expression tree.
    pub fn size(&self) -> usize {
        match self {
            Formula::Var(_) | Formula::Const(_) => 1,
            Formula::And(terms) | Formula::Or(terms) => {
                1 + terms.iter().map(Formula::size).sum::<usize>()
            }
            Formula::Not(inner) => 1 + inner.size(),
            Formula::Implies(lhs, rhs) => 1 + lhs.size() + rhs.size(),
        }
    }
}
