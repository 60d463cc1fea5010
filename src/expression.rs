//! Deferred verification predicates.
//!
//! `check_transcript` does not return a bare boolean: it returns a
//! [`BooleanExpression`] so that a parent fragment can conjoin the checks of
//! many children, and the caller at the top decides when (and whether) to
//! force evaluation.

use group::prime::PrimeGroup;

/// An unevaluated verification predicate over group elements.
#[derive(Clone, Debug)]
pub enum BooleanExpression<G: PrimeGroup> {
    /// A predicate already decided when the expression was built.
    Holds(bool),
    /// Equality of two group elements.
    ElementsEqual {
        /// Left-hand side.
        lhs: G,
        /// Right-hand side.
        rhs: G,
    },
    /// Conjunction of sub-predicates.
    All(Vec<BooleanExpression<G>>),
}

impl<G: PrimeGroup> BooleanExpression<G> {
    /// Conjunction over an iterator of expressions.
    pub fn all(exprs: impl IntoIterator<Item = Self>) -> Self {
        BooleanExpression::All(exprs.into_iter().collect())
    }

    /// Conjoins `self` with another expression.
    pub fn and(self, other: Self) -> Self {
        match self {
            BooleanExpression::All(mut exprs) => {
                exprs.push(other);
                BooleanExpression::All(exprs)
            }
            expr => BooleanExpression::All(vec![expr, other]),
        }
    }

    /// Forces the predicate.
    pub fn evaluate(&self) -> bool {
        match self {
            BooleanExpression::Holds(b) => *b,
            BooleanExpression::ElementsEqual { lhs, rhs } => lhs == rhs,
            BooleanExpression::All(exprs) => exprs.iter().all(|e| e.evaluate()),
        }
    }
}
