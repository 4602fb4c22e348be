//! Typemap store: a trie over tuple-type signatures, supporting
//! exact, by-type, and intersection lookups.
//!
//! Implemented as a flat `Vec<TypemapEntry>` walked linearly in definition
//! order rather than nested per-position hashtables: the operational
//! contract is a linear-scan-equivalent lookup, and at the scale a generic
//! function's method count actually reaches — hundreds, not millions, of
//! definitions — a trie buys nothing a flat scan doesn't already give.

use crate::method::signature::{arity_matches, sig_intersect, sig_subtype};
use crate::method::MethodId;
use crate::types::JuliaType;

/// What a typemap entry resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypemapPayload {
    /// A method definition itself (used in the definition typemap).
    Method(MethodId),
    /// A cached specialization for a particular owning method
    /// (used in the dispatch-cache typemap).
    Specialization {
        method: MethodId,
        spec_types: Vec<JuliaType>,
    },
}

impl TypemapPayload {
    pub fn method_id(&self) -> MethodId {
        match self {
            TypemapPayload::Method(id) => *id,
            TypemapPayload::Specialization { method, .. } => *method,
        }
    }
}

/// A single node: a signature, its guard/acceptance metadata, and a payload.
#[derive(Debug, Clone)]
pub struct TypemapEntry {
    pub sig: Vec<JuliaType>,
    /// A coarsened key that gates fast acceptance (rule 5 of the
    /// canonicalizer,).
    pub simplesig: Option<Vec<JuliaType>>,
    /// Signatures that, if matched first, disqualify this entry.
    pub guardsigs: Vec<Vec<JuliaType>>,
    /// Concrete, no free type variables anywhere in the signature.
    pub isleafsig: bool,
    pub payload: TypemapPayload,
}

impl TypemapEntry {
    pub fn is_pure_leaf(&self) -> bool {
        self.isleafsig && self.simplesig.is_none() && self.guardsigs.is_empty()
    }

    fn guards_reject(&self, args: &[JuliaType]) -> bool {
        self.guardsigs
            .iter()
            .any(|g| arity_matches(g, args.len()) && sig_subtype(args, g))
    }
}

/// Match mode for `assoc_by_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The query signature must equal a stored signature exactly.
    Exact,
    /// The query signature is matched via subtyping, accepting the first
    /// (most specific, since entries are walked in specificity order by the
    /// caller) definition whose signature contains it.
    Inexact,
    /// Like `Inexact` but also accepts partial/ambiguous overlaps — used by
    /// `matching_methods` to enumerate every compatible definition instead
    /// of just the best one.
    Loose,
}

/// Flat, ordered collection of typemap entries with the three operations
///
#[derive(Debug, Default)]
pub struct Typemap {
    entries: Vec<TypemapEntry>,
}

impl Typemap {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, entry: TypemapEntry) {
        self.entries.push(entry);
    }

    pub fn remove_by(&mut self, mut pred: impl FnMut(&TypemapEntry) -> bool) {
        self.entries.retain(|e| !pred(e));
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypemapEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match an actual argument-type vector against leaf signatures,
    /// rejecting entries whose guards fire. Returns the first entry whose
    /// `sig` exactly equals `args` and passes its guards.
    pub fn assoc_exact(&self, args: &[JuliaType]) -> Option<&TypemapEntry> {
        self.entries.iter().find(|e| {
            e.isleafsig
                && arity_matches(&e.sig, args.len())
                && e.sig == args
                && !e.guards_reject(args)
        })
    }

    /// Match a tuple type against declared signatures.
    pub fn assoc_by_type(&self, query: &[JuliaType], mode: MatchMode) -> Option<&TypemapEntry> {
        match mode {
            MatchMode::Exact => self.entries.iter().find(|e| e.sig == query),
            MatchMode::Inexact => {
                // Most specific match wins; ties go to whichever was
                // defined first, mirroring `dispatch_inner`'s scan order.
                let mut best: Option<&TypemapEntry> = None;
                let mut best_score = 0u32;
                for e in &self.entries {
                    if !sig_subtype(query, &e.sig) {
                        continue;
                    }
                    let score = crate::method::signature::sig_specificity(&e.sig);
                    if best.is_none() || score > best_score {
                        best = Some(e);
                        best_score = score;
                    }
                }
                best
            }
            MatchMode::Loose => self
                .entries
                .iter()
                .find(|e| sig_intersect(query, &e.sig).is_some()),
        }
    }

    /// Every entry in definition order whose signature non-trivially
    /// intersects `query`.
    pub fn intersection_visitor<'a>(
        &'a self,
        query: &'a [JuliaType],
    ) -> impl Iterator<Item = (&'a TypemapEntry, Vec<JuliaType>)> {
        self.entries
            .iter()
            .filter_map(move |e| sig_intersect(query, &e.sig).map(|isect| (e, isect)))
    }
}
