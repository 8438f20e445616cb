//! Expression vectors.
//!
//! A vector lifts the algebra to `k` patterns tracked in lockstep: one DFA
//! state per reachable vector of derivatives. Coordinate order is
//! semantically significant, it decides which pattern a nullable coordinate
//! is attributed to.

use std::rc::Rc;

use super::char_set::CharSet;
use super::expr::{combine_maps, DerivationMapOf, Expr};

/// An ordered vector of expressions.
///
/// Two vectors are equal iff they are coordinate-wise equal in the same
/// order; together with the canonical form of the algebra this is the
/// derivative-equivalence test the compiler interns states under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ExprVec {
    exprs: Vec<Rc<Expr>>,
}

/// The partitioned derivative of an expression vector.
pub(crate) type VecDerivationMap = DerivationMapOf<ExprVec>;

impl ExprVec {
    pub(crate) fn new(exprs: Vec<Rc<Expr>>) -> Self {
        ExprVec { exprs }
    }

    #[allow(dead_code)]
    pub(crate) fn len(&self) -> usize {
        self.exprs.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Rc<Expr>> {
        self.exprs.iter()
    }

    /// A vector is nullable iff any coordinate is nullable.
    pub(crate) fn nullable(&self) -> bool {
        self.exprs.iter().any(|e| e.nullable())
    }

    /// A vector is final iff all coordinates are final. The empty vector is
    /// vacuously final, which gives the empty context its non-accepting
    /// final start state.
    pub(crate) fn is_final(&self) -> bool {
        self.exprs.iter().all(|e| e.is_final())
    }

    /// Coordinate-wise single-character derivative; the reference the tests
    /// check the partitioned variant against.
    #[allow(dead_code)]
    pub(crate) fn derive(&self, c: char) -> ExprVec {
        ExprVec {
            exprs: self.exprs.iter().map(|e| e.derive(c)).collect(),
        }
    }

    /// The partitioned derivative, obtained by folding the pairwise
    /// intersect-then-difference combinator across all coordinates.
    pub(crate) fn derive_classes(&self) -> VecDerivationMap {
        let mut classes: Vec<(Vec<Rc<Expr>>, CharSet)> = Vec::new();
        let mut default: Vec<Rc<Expr>> = Vec::new();
        for expr in &self.exprs {
            let coord = expr.derive_classes();
            let combined = combine_maps(
                &classes,
                &default,
                &coord.classes,
                &coord.default,
                true,
                |acc, next| {
                    let mut exprs = acc.clone();
                    exprs.push(next.clone());
                    exprs
                },
            );
            classes = combined.classes;
            default = combined.default;
        }
        VecDerivationMap::new(
            classes
                .into_iter()
                .map(|(exprs, set)| (ExprVec::new(exprs), set))
                .collect(),
            ExprVec::new(default),
        )
    }
}

impl std::fmt::Display for ExprVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, expr) in self.exprs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", expr)?;
        }
        write!(f, ")")
    }
}
