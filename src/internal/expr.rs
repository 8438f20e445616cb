//! The regular expression algebra.
//!
//! Expressions are immutable trees behind `Rc` handles, kept in a canonical
//! form by the smart constructors in this module: alternation and
//! intersection chains are flattened, sorted and deduplicated, concatenation
//! chains are right-associated, and the unit/zero/involution laws are applied
//! eagerly. Canonicalization turns equivalence under those laws into derived
//! structural equality, which is what makes the set of derivatives of any
//! expression finite and lets the compiler intern state vectors in a hash
//! map.
//!
//! The module also implements the two derivative operators: `derive` with
//! respect to a single character, and `derive_classes`, which partitions the
//! alphabet into finitely many classes with one successor expression each.

use std::rc::Rc;

use super::char_set::CharSet;

/// A regular expression in canonical form.
///
/// Values are only ever created through the constructor functions below;
/// building variants directly would break the canonical-form invariant that
/// equality and hashing rely on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Expr {
    /// Matches no string at all.
    EmptySet,
    /// Matches exactly the empty string.
    EmptyString,
    /// Matches exactly one arbitrary character.
    Any,
    /// Matches exactly one specific character.
    Symbol(char),
    /// Sequence; right-associated.
    Concat(Rc<Expr>, Rc<Expr>),
    /// Alternation; flattened, sorted, deduplicated.
    Or(Rc<Expr>, Rc<Expr>),
    /// Intersection; flattened, sorted, deduplicated.
    And(Rc<Expr>, Rc<Expr>),
    /// Kleene closure.
    Star(Rc<Expr>),
    /// Complement.
    Not(Rc<Expr>),
}

pub(crate) fn empty_set() -> Rc<Expr> {
    Rc::new(Expr::EmptySet)
}

pub(crate) fn empty_string() -> Rc<Expr> {
    Rc::new(Expr::EmptyString)
}

pub(crate) fn any() -> Rc<Expr> {
    Rc::new(Expr::Any)
}

pub(crate) fn symbol(c: char) -> Rc<Expr> {
    Rc::new(Expr::Symbol(c))
}

fn is_empty_set(e: &Rc<Expr>) -> bool {
    matches!(**e, Expr::EmptySet)
}

fn is_empty_string(e: &Rc<Expr>) -> bool {
    matches!(**e, Expr::EmptyString)
}

fn is_not_empty_set(e: &Rc<Expr>) -> bool {
    match &**e {
        Expr::Not(inner) => matches!(**inner, Expr::EmptySet),
        _ => false,
    }
}

/// `r · s` with the unit and zero laws applied and the chain
/// right-associated.
pub(crate) fn concat(r: Rc<Expr>, s: Rc<Expr>) -> Rc<Expr> {
    if is_empty_set(&r) || is_empty_set(&s) {
        return empty_set();
    }
    if is_empty_string(&r) {
        return s;
    }
    if is_empty_string(&s) {
        return r;
    }
    if let Expr::Concat(a, b) = &*r {
        let tail = concat(b.clone(), s);
        return Rc::new(Expr::Concat(a.clone(), tail));
    }
    Rc::new(Expr::Concat(r, s))
}

/// `r ∨ s`, canonicalized into a sorted, deduplicated operand chain.
pub(crate) fn or(r: Rc<Expr>, s: Rc<Expr>) -> Rc<Expr> {
    if is_empty_set(&r) {
        return s;
    }
    if is_empty_set(&s) {
        return r;
    }
    if is_not_empty_set(&r) {
        return r;
    }
    if is_not_empty_set(&s) {
        return s;
    }
    let mut operands = Vec::new();
    collect_or_operands(&r, &mut operands);
    collect_or_operands(&s, &mut operands);
    rebuild_chain(operands, Expr::Or)
}

/// `r ∧ s`, canonicalized into a sorted, deduplicated operand chain.
pub(crate) fn and(r: Rc<Expr>, s: Rc<Expr>) -> Rc<Expr> {
    if is_empty_set(&r) || is_empty_set(&s) {
        return empty_set();
    }
    if is_not_empty_set(&r) {
        return s;
    }
    if is_not_empty_set(&s) {
        return r;
    }
    let mut operands = Vec::new();
    collect_and_operands(&r, &mut operands);
    collect_and_operands(&s, &mut operands);
    rebuild_chain(operands, Expr::And)
}

/// `r*`; collapses nested stars and the trivial bases.
pub(crate) fn star(r: Rc<Expr>) -> Rc<Expr> {
    match &*r {
        Expr::Star(_) => r.clone(),
        Expr::EmptySet | Expr::EmptyString => empty_string(),
        _ => Rc::new(Expr::Star(r)),
    }
}

/// `¬r`; collapses double complement.
pub(crate) fn not(r: Rc<Expr>) -> Rc<Expr> {
    match &*r {
        Expr::Not(inner) => inner.clone(),
        _ => Rc::new(Expr::Not(r)),
    }
}

fn collect_or_operands(e: &Rc<Expr>, out: &mut Vec<Rc<Expr>>) {
    if let Expr::Or(a, b) = &**e {
        collect_or_operands(a, out);
        collect_or_operands(b, out);
    } else {
        out.push(e.clone());
    }
}

fn collect_and_operands(e: &Rc<Expr>, out: &mut Vec<Rc<Expr>>) {
    if let Expr::And(a, b) = &**e {
        collect_and_operands(a, out);
        collect_and_operands(b, out);
    } else {
        out.push(e.clone());
    }
}

fn rebuild_chain(mut operands: Vec<Rc<Expr>>, make: fn(Rc<Expr>, Rc<Expr>) -> Expr) -> Rc<Expr> {
    operands.sort_unstable();
    operands.dedup();
    let mut iter = operands.into_iter().rev();
    let mut acc = iter.next().expect("operand chain cannot be empty");
    for operand in iter {
        acc = Rc::new(make(operand, acc));
    }
    acc
}

impl Expr {
    /// Does the expression match the empty string?
    pub(crate) fn nullable(&self) -> bool {
        match self {
            Expr::EmptySet | Expr::Any | Expr::Symbol(_) => false,
            Expr::EmptyString | Expr::Star(_) => true,
            Expr::Concat(r, s) | Expr::And(r, s) => r.nullable() && s.nullable(),
            Expr::Or(r, s) => r.nullable() || s.nullable(),
            Expr::Not(r) => !r.nullable(),
        }
    }

    /// Is the expression's acceptance decision fixed for every extension of
    /// the input?
    ///
    /// This is a compositional under-approximation; `EmptySet` is the
    /// canonical final expression, and a final-and-nullable expression
    /// accepts every extension while a final-and-non-nullable one rejects
    /// every extension.
    pub(crate) fn is_final(&self) -> bool {
        match self {
            Expr::EmptySet => true,
            Expr::EmptyString | Expr::Any | Expr::Symbol(_) => false,
            Expr::Star(r) => r.is_final() && r.nullable(),
            Expr::Not(r) => r.is_final(),
            Expr::Or(r, s) => {
                (r.is_final() && r.nullable())
                    || (s.is_final() && s.nullable())
                    || (r.is_final() && s.is_final())
            }
            Expr::And(r, s) => {
                (r.is_final() && !r.nullable())
                    || (s.is_final() && !s.nullable())
                    || (r.is_final() && s.is_final())
            }
            Expr::Concat(r, s) => r.is_final() && (!r.nullable() || s.is_final()),
        }
    }

    /// The Brzozowski derivative with respect to a single character.
    /// The compiler works on the partitioned variant below; this one is the
    /// reference implementation the tests check it against.
    #[allow(dead_code)]
    pub(crate) fn derive(&self, c: char) -> Rc<Expr> {
        match self {
            Expr::EmptySet | Expr::EmptyString => empty_set(),
            Expr::Any => empty_string(),
            Expr::Symbol(a) => {
                if *a == c {
                    empty_string()
                } else {
                    empty_set()
                }
            }
            Expr::Concat(r, s) => {
                let left = concat(r.derive(c), s.clone());
                if r.nullable() {
                    or(left, s.derive(c))
                } else {
                    left
                }
            }
            Expr::Or(r, s) => or(r.derive(c), s.derive(c)),
            Expr::And(r, s) => and(r.derive(c), s.derive(c)),
            Expr::Star(r) => concat(r.derive(c), star(r.clone())),
            Expr::Not(r) => not(r.derive(c)),
        }
    }

    /// The partitioned derivative: a finite classification of the alphabet
    /// into character classes with one successor expression each, plus the
    /// successor for every character outside all classes.
    pub(crate) fn derive_classes(&self) -> DerivationMap {
        match self {
            Expr::EmptySet | Expr::EmptyString => DerivationMap::uniform(empty_set()),
            Expr::Any => DerivationMap::uniform(empty_string()),
            Expr::Symbol(a) => DerivationMap::new(
                vec![(empty_string(), CharSet::single(*a))],
                empty_set(),
            ),
            Expr::Star(r) => {
                let rep = star(r.clone());
                r.derive_classes().map(|d| concat(d, rep.clone()))
            }
            Expr::Not(r) => r.derive_classes().map(not),
            Expr::Or(r, s) => {
                let left = r.derive_classes();
                let right = s.derive_classes();
                combine_maps(
                    &left.classes,
                    &left.default,
                    &right.classes,
                    &right.default,
                    true,
                    |a, b| or(a.clone(), b.clone()),
                )
            }
            Expr::And(r, s) => {
                let left = r.derive_classes();
                let right = s.derive_classes();
                combine_maps(
                    &left.classes,
                    &left.default,
                    &right.classes,
                    &right.default,
                    true,
                    |a, b| and(a.clone(), b.clone()),
                )
            }
            Expr::Concat(r, s) => {
                let left = r.derive_classes().map(|d| concat(d, s.clone()));
                if r.nullable() {
                    let right = s.derive_classes();
                    combine_maps(
                        &left.classes,
                        &left.default,
                        &right.classes,
                        &right.default,
                        true,
                        |a, b| or(a.clone(), b.clone()),
                    )
                } else {
                    left
                }
            }
        }
    }
}

/// A partition of the alphabet into classes with distinct successors.
///
/// The class sets are pairwise disjoint; every character outside all of them
/// maps to `default`. The same shape serves single expressions
/// (`T = Rc<Expr>`) and expression vectors.
#[derive(Debug, Clone)]
pub(crate) struct DerivationMapOf<T> {
    pub(crate) classes: Vec<(T, CharSet)>,
    pub(crate) default: T,
}

/// The partitioned derivative of a single expression.
pub(crate) type DerivationMap = DerivationMapOf<Rc<Expr>>;

impl<T: PartialEq> DerivationMapOf<T> {
    pub(crate) fn new(classes: Vec<(T, CharSet)>, default: T) -> Self {
        normalize_classes(classes, default)
    }

    /// A map that sends the whole alphabet to one successor.
    pub(crate) fn uniform(default: T) -> Self {
        DerivationMapOf {
            classes: Vec::new(),
            default,
        }
    }

    /// The successor for a specific character.
    #[allow(dead_code)]
    pub(crate) fn lookup(&self, c: char) -> &T {
        for (succ, set) in &self.classes {
            if set.contains(c) {
                return succ;
            }
        }
        &self.default
    }

    /// Apply `f` to every successor, including the default.
    fn map(self, mut f: impl FnMut(T) -> T) -> Self {
        let classes = self
            .classes
            .into_iter()
            .map(|(succ, set)| (f(succ), set))
            .collect();
        DerivationMapOf::new(classes, f(self.default))
    }
}

/// Merge classes with equal successors and drop classes that agree with the
/// default, so the partition stays small and interval sets stay wide.
fn normalize_classes<T: PartialEq>(classes: Vec<(T, CharSet)>, default: T) -> DerivationMapOf<T> {
    let mut merged: Vec<(T, CharSet)> = Vec::with_capacity(classes.len());
    for (succ, set) in classes {
        if set.is_empty() || succ == default {
            continue;
        }
        match merged.iter_mut().find(|(other, _)| *other == succ) {
            Some((_, existing)) => *existing = existing.union(&set),
            None => merged.push((succ, set)),
        }
    }
    DerivationMapOf {
        classes: merged,
        default,
    }
}

/// Combine two derivation maps with the pairwise intersect-then-difference
/// algorithm.
///
/// For every pair of classes the intersection gets the combined successor;
/// leftovers of the left map combine with the right default and vice versa;
/// the defaults combine into the new default. `keep_right_only` controls the
/// right-leftover step, which a concatenation with a non-nullable left
/// operand must skip.
pub(crate) fn combine_maps<L, R, T: PartialEq>(
    left: &[(L, CharSet)],
    left_default: &L,
    right: &[(R, CharSet)],
    right_default: &R,
    keep_right_only: bool,
    mut op: impl FnMut(&L, &R) -> T,
) -> DerivationMapOf<T> {
    let mut classes = Vec::new();
    let mut common = CharSet::empty();
    for (a, a_set) in left {
        for (b, b_set) in right {
            let intersection = a_set.intersect(b_set);
            if !intersection.is_empty() {
                common = common.union(&intersection);
                classes.push((op(a, b), intersection));
            }
        }
    }
    for (a, a_set) in left {
        let rest = a_set.difference(&common);
        if !rest.is_empty() {
            classes.push((op(a, right_default), rest));
        }
    }
    if keep_right_only {
        for (b, b_set) in right {
            let rest = b_set.difference(&common);
            if !rest.is_empty() {
                classes.push((op(left_default, b), rest));
            }
        }
    }
    let default = op(left_default, right_default);
    normalize_classes(classes, default)
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn hash_of(e: &Rc<Expr>) -> u64 {
        let mut hasher = DefaultHasher::new();
        e.hash(&mut hasher);
        hasher.finish()
    }

    fn digits() -> Rc<Expr> {
        ('0'..='9').fold(empty_set(), |acc, c| or(acc, symbol(c)))
    }

    #[test]
    fn test_idempotence() {
        init();
        let a = symbol('a');
        assert_eq!(or(a.clone(), a.clone()), a);
        assert_eq!(and(a.clone(), a.clone()), a);
        assert_eq!(star(star(a.clone())), star(a.clone()));
        assert_eq!(not(not(a.clone())), a);
    }

    #[test]
    fn test_units_and_zeros() {
        init();
        let a = symbol('a');
        assert_eq!(concat(empty_string(), a.clone()), a);
        assert_eq!(concat(a.clone(), empty_string()), a);
        assert_eq!(concat(empty_set(), a.clone()), empty_set());
        assert_eq!(concat(a.clone(), empty_set()), empty_set());
        assert_eq!(or(empty_set(), a.clone()), a);
        assert_eq!(or(a.clone(), empty_set()), a);
        assert_eq!(or(not(empty_set()), a.clone()), not(empty_set()));
        assert_eq!(and(not(empty_set()), a.clone()), a);
        assert_eq!(and(a.clone(), not(empty_set())), a);
        assert_eq!(and(empty_set(), a.clone()), empty_set());
    }

    #[test]
    fn test_star_collapses_trivial_bases() {
        init();
        assert_eq!(star(empty_string()), empty_string());
        assert_eq!(star(empty_set()), empty_string());
    }

    #[test]
    fn test_commutativity_and_associativity() {
        init();
        let a = symbol('a');
        let b = symbol('b');
        let c = symbol('c');
        assert_eq!(or(a.clone(), b.clone()), or(b.clone(), a.clone()));
        assert_eq!(
            or(or(a.clone(), b.clone()), c.clone()),
            or(a.clone(), or(b.clone(), c.clone()))
        );
        assert_eq!(
            or(or(c.clone(), a.clone()), b.clone()),
            or(b.clone(), or(a.clone(), c.clone()))
        );
        assert_eq!(and(a.clone(), b.clone()), and(b.clone(), a.clone()));
        assert_eq!(
            and(and(a.clone(), b.clone()), c.clone()),
            and(a.clone(), and(b.clone(), c.clone()))
        );
        assert_eq!(
            concat(concat(a.clone(), b.clone()), c.clone()),
            concat(a.clone(), concat(b.clone(), c.clone()))
        );
    }

    #[test]
    fn test_equal_values_have_equal_hashes() {
        init();
        let a = symbol('a');
        let b = symbol('b');
        let c = symbol('c');
        let pairs = [
            (or(a.clone(), b.clone()), or(b.clone(), a.clone())),
            (
                or(or(a.clone(), b.clone()), c.clone()),
                or(c.clone(), or(b.clone(), a.clone())),
            ),
            (or(a.clone(), a.clone()), a.clone()),
            (
                concat(concat(a.clone(), b.clone()), c.clone()),
                concat(a.clone(), concat(b.clone(), c.clone())),
            ),
            (not(not(star(a.clone()))), star(a.clone())),
        ];
        for (left, right) in &pairs {
            assert_eq!(left, right);
            assert_eq!(hash_of(left), hash_of(right));
        }
    }

    #[test]
    fn test_nullable() {
        init();
        assert!(!Expr::EmptySet.nullable());
        assert!(Expr::EmptyString.nullable());
        assert!(!symbol('a').nullable());
        assert!(star(symbol('a')).nullable());
        assert!(or(symbol('a'), empty_string()).nullable());
        assert!(!concat(symbol('a'), star(symbol('b'))).nullable());
        assert!(not(symbol('a')).nullable());
        assert!(!not(empty_string()).nullable());
    }

    #[test]
    fn test_is_final() {
        init();
        assert!(Expr::EmptySet.is_final());
        assert!(!Expr::EmptyString.is_final());
        assert!(!symbol('a').is_final());
        assert!(!star(symbol('a')).is_final());
        // The complement of the empty set accepts every extension.
        assert!(not(empty_set()).is_final());
        assert!(star(not(empty_set())).is_final());
    }

    #[test]
    fn test_derivative_equations() {
        init();
        let a = symbol('a');
        let b = symbol('b');
        // d(ab, a) = b
        assert_eq!(concat(a.clone(), b.clone()).derive('a'), b);
        // d(ab, b) = ∅
        assert_eq!(concat(a.clone(), b.clone()).derive('b'), empty_set());
        // d(a|b, a) = ε
        assert_eq!(or(a.clone(), b.clone()).derive('a'), empty_string());
        // d(a*, a) = a*
        assert_eq!(star(a.clone()).derive('a'), star(a.clone()));
        // d(., x) = ε
        assert_eq!(any().derive('x'), empty_string());
        // d(¬a, a) = ¬ε
        assert_eq!(not(a.clone()).derive('a'), not(empty_string()));
    }

    #[test]
    fn test_derive_agrees_with_derive_classes() {
        init();
        let alphabet = "ab019 -x";
        let exprs = vec![
            empty_set(),
            empty_string(),
            any(),
            symbol('a'),
            digits(),
            concat(symbol('a'), symbol('b')),
            concat(digits(), digits()),
            or(concat(symbol('a'), symbol('b')), symbol('b')),
            and(any(), not(or(symbol('1'), symbol('3')))),
            star(digits()),
            concat(star(symbol('a')), concat(symbol('a'), symbol('b'))),
            not(star(symbol('a'))),
            concat(or(empty_string(), symbol('-')), digits()),
        ];
        for expr in &exprs {
            let map = expr.derive_classes();
            for c in alphabet.chars() {
                assert_eq!(
                    &expr.derive(c),
                    map.lookup(c),
                    "derivative mismatch for {:?} at '{}'",
                    expr,
                    c
                );
            }
        }
    }

    #[test]
    fn test_derive_classes_merges_equal_successors() {
        init();
        // Every digit derives to ε, so the partition is a single wide class.
        let map = digits().derive_classes();
        assert_eq!(map.classes.len(), 1);
        let (succ, set) = &map.classes[0];
        assert_eq!(*succ, empty_string());
        assert_eq!(*set, CharSet::range('0', '9'));
        assert_eq!(map.default, empty_set());
    }

    #[test]
    fn test_derive_classes_of_negated_set() {
        init();
        let expr = and(any(), not(or(symbol('a'), symbol('b'))));
        let map = expr.derive_classes();
        assert_eq!(*map.lookup('x'), empty_string());
        assert!(!map.lookup('a').nullable());
        assert!(!map.lookup('b').nullable());
    }
}
