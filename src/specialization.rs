//! Specialization registry: per-method map from a concrete argument
//! tuple to a compiled instance.
//!
//! Follows a `dispatch_cache: RefCell<HashMap<Vec<JuliaType>, usize>>`-shaped
//! interior-mutability pattern (a `RefCell`-guarded map keyed on
//! `Vec<JuliaType>`, populated from a read-only dispatch path), generalized
//! from "cache the winning method index" to "cache the compiled
//! specialization itself" since this crate
//! models specialization as a first-class artifact rather than a dispatch
//! shortcut.

use std::sync::Arc;

use crate::types::JuliaType;

/// Opaque handle to code produced by the (out-of-scope) code generator.
/// This crate never inspects what's inside; it only tracks whether a handle
/// is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeHandle(pub u64);

/// A Method instantiated for one concrete argument tuple and static
/// parameter binding.
#[derive(Debug, Clone)]
pub struct LambdaInfo {
    /// The instantiated tuple type this specialization was built for.
    pub spec_types: Vec<JuliaType>,
    /// Static parameter values bound for this instantiation (from the
    /// owning method's `tvars`, in declaration order).
    pub sparam_vals: Vec<JuliaType>,
    /// Present once the code generator has produced a handle; absent while
    /// only inferred (or not yet inferred at all).
    pub code: Option<CodeHandle>,
    pub inferred: bool,
    pub in_inference: bool,
    /// Shared fallback used when per-call-site specialization was skipped
    /// (the method's `unspecialized_ducttape`,).
    pub unspecialized_fallback: Option<Arc<LambdaInfo>>,
}

impl LambdaInfo {
    pub fn new(spec_types: Vec<JuliaType>, sparam_vals: Vec<JuliaType>) -> Self {
        Self {
            spec_types,
            sparam_vals,
            code: None,
            inferred: false,
            in_inference: false,
            unspecialized_fallback: None,
        }
    }

    /// A LambdaInfo observed with no code and no fallback, and not even
    /// inferred, is a state dispatch must never return to a caller (
    /// invariant 5) — callers call this after every place a LambdaInfo is
    /// about to be handed back.
    pub fn is_dispatchable(&self) -> bool {
        self.code.is_some() || self.unspecialized_fallback.is_some() || self.inferred
    }

    pub fn is_ready(&self) -> bool {
        self.code.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_lambda_info_without_fallback_is_not_dispatchable() {
        let li = LambdaInfo::new(vec![JuliaType::Int64], vec![]);
        assert!(!li.is_dispatchable());
    }

    #[test]
    fn lambda_info_with_fallback_is_dispatchable() {
        let fallback = Arc::new(LambdaInfo {
            code: Some(CodeHandle(1)),
            ..LambdaInfo::new(vec![JuliaType::Any], vec![])
        });
        let mut li = LambdaInfo::new(vec![JuliaType::Int64], vec![]);
        li.unspecialized_fallback = Some(fallback);
        assert!(li.is_dispatchable());
    }
}
