//! Lattice operations the dispatch engine needs beyond plain subtyping:
//! intersection, leaf tests, and the tuple/union/typevar/vararg predicates.
//!
//! `is_subtype_of`, `specificity`, and `substitute`/`instantiate` live next to
//! the enum in `julia_type/`. The operations here (chiefly `intersect`) are
//! new, built from `is_subtype_of` the same way `specificity` is built from
//! structural recursion over the enum.

use super::JuliaType;

impl JuliaType {
    /// Greatest lower bound of `self` and `other` in the subtype lattice.
    /// Returns `Bottom` when the two types share no values.
    ///
    /// This is necessarily approximate for parametric/struct types this crate
    /// treats opaquely (it falls back to "disjoint unless one side subsumes
    /// the other"), which is sufficient for the ambiguity analyzer and
    /// the canonicalizer's guard-set computation: both only need to
    /// know whether two signatures *could* both match a call, not compute the
    /// precise intersection type.
    pub fn intersect(&self, other: &JuliaType) -> JuliaType {
        if self == other {
            return self.clone();
        }
        if self.is_subtype_of(other) {
            return self.clone();
        }
        if other.is_subtype_of(self) {
            return other.clone();
        }

        match (self, other) {
            (JuliaType::Union(ts), _) => {
                let parts: Vec<_> = ts
                    .iter()
                    .map(|t| t.intersect(other))
                    .filter(|t| !matches!(t, JuliaType::Bottom))
                    .collect();
                JuliaType::union_of(parts)
            }
            (_, JuliaType::Union(_)) => other.intersect(self),
            (JuliaType::TupleOf(a), JuliaType::TupleOf(b)) if a.len() == b.len() => {
                let mut out = Vec::with_capacity(a.len());
                for (x, y) in a.iter().zip(b.iter()) {
                    let xi = x.intersect(y);
                    if matches!(xi, JuliaType::Bottom) {
                        return JuliaType::Bottom;
                    }
                    out.push(xi);
                }
                JuliaType::TupleOf(out)
            }
            (JuliaType::Vararg(ea, _), JuliaType::Vararg(eb, _)) => {
                let ei = ea.intersect(eb);
                if matches!(ei, JuliaType::Bottom) {
                    JuliaType::Bottom
                } else {
                    JuliaType::Vararg(Box::new(ei), None)
                }
            }
            _ => JuliaType::Bottom,
        }
    }

    /// Collapse a list of non-bottom union arms back into a type: empty means
    /// `Bottom`, one arm collapses to that arm, otherwise a fresh `Union`.
    fn union_of(parts: Vec<JuliaType>) -> JuliaType {
        match parts.len() {
            0 => JuliaType::Bottom,
            1 => parts.into_iter().next().unwrap(),
            _ => JuliaType::Union(parts),
        }
    }

    /// Whether `self` is a fully concrete type with no free type variables
    /// anywhere in its structure — the typemap's gate for treating a
    /// signature slot as a leaf ().
    pub fn is_leaf(&self) -> bool {
        match self {
            JuliaType::TypeVar(_, _) => false,
            JuliaType::Union(_) => false,
            JuliaType::UnionAll { .. } => false,
            JuliaType::Bottom => false,
            JuliaType::VectorOf(e) | JuliaType::MatrixOf(e) => e.is_leaf(),
            JuliaType::TupleOf(elems) => elems.iter().all(|e| e.is_leaf()),
            JuliaType::TypeOf(inner) => inner.is_leaf(),
            JuliaType::Vararg(elem, n) => n.is_some() && elem.is_leaf(),
            _ => self.is_concrete(),
        }
    }

    /// Whether this is (or denotes) a tuple signature type.
    pub fn is_tuple(&self) -> bool {
        matches!(self, JuliaType::Tuple | JuliaType::TupleOf(_))
    }

    /// Whether this is a union of alternatives.
    pub fn is_union(&self) -> bool {
        matches!(self, JuliaType::Union(_))
    }

    /// Whether this is a free type variable (bound or not).
    pub fn is_typevar(&self) -> bool {
        matches!(self, JuliaType::TypeVar(_, _))
    }

    /// Whether this is a variadic tail (`Vararg{T}` / `Vararg{T,N}`).
    pub fn is_vararg_tail(&self) -> bool {
        matches!(self, JuliaType::Vararg(_, _))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_disjoint_concrete_is_bottom() {
        assert_eq!(
            JuliaType::Int64.intersect(&JuliaType::String),
            JuliaType::Bottom
        );
    }

    #[test]
    fn intersect_subtype_pair_is_the_narrower_side() {
        assert_eq!(
            JuliaType::Int64.intersect(&JuliaType::Number),
            JuliaType::Int64
        );
        assert_eq!(
            JuliaType::Number.intersect(&JuliaType::Int64),
            JuliaType::Int64
        );
    }

    #[test]
    fn intersect_is_commutative_on_these_cases() {
        let a = JuliaType::Int64;
        let b = JuliaType::Float64;
        assert_eq!(a.intersect(&b), b.intersect(&a));
    }

    #[test]
    fn leaf_vs_non_leaf() {
        assert!(JuliaType::Int64.is_leaf());
        assert!(!JuliaType::Any.is_leaf());
        assert!(!JuliaType::TypeVar("T".into(), None).is_leaf());
        assert!(!JuliaType::Vararg(Box::new(JuliaType::Int64), None).is_leaf());
        assert!(JuliaType::Vararg(Box::new(JuliaType::Int64), Some(2)).is_leaf());
    }
}
