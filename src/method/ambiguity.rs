//! Ambiguity analysis: discovers and records symmetric ambiguity
//! edges between method definitions as they're inserted.
//!
//! Generalizes a tie-break rule that only ever replaces an *equal*-signature
//! method: the ambiguity graph (`ambig` back-references, shadow tracking
//! across *unequal but overlapping* signatures) builds on the same
//! `AmbiguousMethod`-shaped error (`MethodError::Ambiguous`) but moves it
//! from a call-time-only check into bookkeeping maintained at insertion
//! time.

use super::signature::{more_specific, sig_intersect};
use super::{Method, MethodId};
use crate::types::JuliaType;

/// Outcome of inserting a new definition into an existing set.
pub struct InsertionReport {
    /// Existing definitions shadowed by the new one (more specific and
    /// overlapping); their cache entries must be invalidated.
    pub shadowed: Vec<MethodId>,
    /// New symmetric ambiguity edges: `(a, b)` means `a` and `b` must each
    /// list the other.
    pub new_ambiguities: Vec<(MethodId, MethodId)>,
}

/// Walk `existing` in insertion order against the new definition `new_sig`
/// (at id `new_id`) and classify every overlapping pair, per
///
/// - Disjoint intersection: ignored.
/// - Intersection equal to the *later* signature in table order: covered,
///   not ambiguous.
/// - One side strictly more specific: shadowing, no ambiguity.
/// - Neither side dominates: ambiguous, a symmetric edge is recorded.
pub fn record_insertion(
    new_id: MethodId,
    new_sig: &[JuliaType],
    existing: &[(MethodId, &[JuliaType])],
) -> InsertionReport {
    let mut shadowed = Vec::new();
    let mut new_ambiguities = Vec::new();

    for &(other_id, other_sig) in existing {
        if sig_intersect(new_sig, other_sig).is_none() {
            continue;
        }

        if more_specific(new_sig, other_sig) {
            shadowed.push(other_id);
        } else if more_specific(other_sig, new_sig) {
            // The existing, less-recent definition remains authoritative for
            // this overlap; nothing shadowed, nothing ambiguous.
        } else {
            new_ambiguities.push((new_id, other_id));
        }
    }

    InsertionReport {
        shadowed,
        new_ambiguities,
    }
}

/// Apply a new ambiguity edge to both methods' `ambig` lists, keeping the
/// relation symmetric.
pub fn link_ambiguous(methods: &mut [Method], a: MethodId, b: MethodId) {
    if !methods[a.0].ambig.contains(&b) {
        methods[a.0].ambig.push(b);
    }
    if !methods[b.0].ambig.contains(&a) {
        methods[b.0].ambig.push(a);
    }
}
