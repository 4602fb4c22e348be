//! A single method definition and the bookkeeping the dispatch engine hangs
//! off it: its specialization cache, its `invoke` cache, and its ambiguity
//! back-references.
//!
//! Extends a `MethodSig`-shaped definition with fields it doesn't otherwise
//! carry: a per-method specialization registry, an `invokes` cache, and an
//! ambiguity list. A signature-only match table caches the chosen
//! definition's index, not a compiled instance; this crate's data model
//! needs the compiled-instance layer on top of that.

pub(crate) mod ambiguity;
pub mod signature;

#[cfg(test)]
mod tests;

pub use ambiguity::record_insertion;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::specialization::LambdaInfo;
use crate::types::JuliaType;

/// Index of a [`Method`] within its owning [`crate::method_table::MethodTable`].
///
/// A plain index rather than an owning or `Weak` pointer, favoring
/// index-based cross-references (`global_index`-style) over pointer
/// graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MethodId(pub usize);

/// Where a method was declared, carried through to diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

/// A single branch of a generic function.
#[derive(Debug)]
pub struct Method {
    /// Declared tuple-type signature. If the last element is
    /// `JuliaType::Vararg(..)`, the method accepts a variable tail.
    pub sig: Vec<JuliaType>,
    /// Names of the type variables bound by this method's `where` clause.
    pub tvars: Vec<String>,
    /// For each fixed parameter position, whether `sig[i]` was declared
    /// exactly `Any` (as opposed to a narrower type or a type variable).
    /// Feeds rule 4 of the canonicalizer: an `Any`-declared slot gains
    /// nothing from caching the call under the argument's concrete runtime
    /// type, so the cache key collapses it back to `Any`.
    pub any_slots: Vec<bool>,
    /// Uninstantiated code template. Out of scope for this crate beyond an
    /// opaque marker: codegen is an external collaborator.
    pub has_template: bool,
    /// Generated per call-site from the argument types rather than compiled
    /// once ('re specialized).
    pub isstaged: bool,
    /// Whether this method's body resulted from macro expansion; inference
    /// is skipped for these.
    pub is_macro_expanded: bool,
    /// For each fixed parameter position, whether the argument was ever
    /// observed being called as a function (feeds rule 5 of the
    /// canonicalizer.
    pub called: Vec<bool>,
    /// Sibling methods this one is ambiguous with. Symmetric: if `m.ambig`
    /// contains `n`, `n.ambig` contains `m`.
    pub ambig: Vec<MethodId>,
    /// Per-method map from instantiated `specTypes` to compiled instance,
    /// keyed the same way a table-wide dispatch cache is keyed.
    pub specializations: RefCell<HashMap<Vec<JuliaType>, LambdaInfo>>,
    /// Cache used only by `invoke`, keyed separately from the table-wide
    /// dispatch cache because `invoke` pins a specific definition rather
    /// than going through ordinary by-type lookup.
    pub invokes: RefCell<HashMap<Vec<JuliaType>, LambdaInfo>>,
    /// Set by `trace_method`/cleared by `untrace_method`.
    pub traced: Cell<bool>,
    pub source: SourceLocation,
}

impl Method {
    pub fn new(sig: Vec<JuliaType>, tvars: Vec<String>) -> Self {
        let fixed = Self::fixed_arity_of(&sig);
        let any_slots = sig[..fixed]
            .iter()
            .map(|t| matches!(t, JuliaType::Any))
            .collect();
        Self {
            sig,
            tvars,
            any_slots,
            has_template: true,
            isstaged: false,
            is_macro_expanded: false,
            called: vec![false; fixed],
            ambig: Vec::new(),
            specializations: RefCell::new(HashMap::new()),
            invokes: RefCell::new(HashMap::new()),
            traced: Cell::new(false),
            source: SourceLocation::default(),
        }
    }

    pub fn with_source(mut self, file: impl Into<String>, line: u32) -> Self {
        self.source = SourceLocation {
            file: file.into(),
            line,
        };
        self
    }

    pub fn staged(mut self) -> Self {
        self.isstaged = true;
        self
    }

    /// The trailing `Vararg{T[,N]}` element, if this method's signature ends
    /// in one.
    pub fn vararg_tail(&self) -> Option<(&JuliaType, Option<usize>)> {
        match self.sig.last() {
            Some(JuliaType::Vararg(elem, n)) => Some((elem.as_ref(), *n)),
            _ => None,
        }
    }

    /// Number of non-vararg, positionally-fixed parameters.
    pub fn fixed_arity(&self) -> usize {
        Self::fixed_arity_of(&self.sig)
    }

    fn fixed_arity_of(sig: &[JuliaType]) -> usize {
        if matches!(sig.last(), Some(JuliaType::Vararg(_, _))) {
            sig.len() - 1
        } else {
            sig.len()
        }
    }

    /// Mark that argument position `i` (0-indexed among fixed parameters)
    /// was invoked as a function at some call site.
    pub fn mark_called(&mut self, i: usize) {
        if let Some(slot) = self.called.get_mut(i) {
            *slot = true;
        }
    }

    pub fn is_called(&self, i: usize) -> bool {
        self.called.get(i).copied().unwrap_or(false)
    }
}
