//! Inference bridge: the guarded, re-entrant call boundary into the
//! (out-of-scope) type inference service.
//!
//! The inference service itself is an injected `dyn InferenceService` — code
//! generation and type inference are external collaborators, out of scope
//! here; this module models only the call boundary and its re-entrancy
//! guards.

use crate::config::CompileMode;
use crate::method::Method;
use crate::specialization::LambdaInfo;
use crate::types::JuliaType;

/// The inference collaborator this crate calls out to. An embedder
/// provides a real implementation; this crate only needs the shape of the
/// call.
pub trait InferenceService {
    fn infer(&mut self, spec_types: &[JuliaType]) -> Result<LambdaInfo, InferenceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceError(pub String);

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "inference failed: {}", self.0)
    }
}

impl std::error::Error for InferenceError {}

/// RAII guard marking a `LambdaInfo` as under active inference
/// (`inInference`). Released on `Drop` so a panic or early `?` return still
/// clears the flag, pairing lock-acquisition-style drop semantics with a
/// plain bool rather than a lock.
pub struct InferenceGuard<'a> {
    linfo: &'a mut LambdaInfo,
}

impl<'a> InferenceGuard<'a> {
    fn enter(linfo: &'a mut LambdaInfo) -> Self {
        linfo.in_inference = true;
        Self { linfo }
    }
}

impl Drop for InferenceGuard<'_> {
    fn drop(&mut self) {
        self.linfo.in_inference = false;
    }
}

/// Process-wide re-entrancy gate: prevents inference from recursively
/// inferring its own methods, except when `force` is set.
#[derive(Debug, Default)]
pub struct InferenceRecursionGuard {
    depth: std::cell::Cell<u32>,
}

impl InferenceRecursionGuard {
    pub fn would_recurse(&self) -> bool {
        self.depth.get() > 0
    }
}

/// `type_infer(L, force)`.
///
/// Skips inference entirely (returning `linfo` unchanged) for macro-expanded
/// methods, for staged methods not yet specialized, and when compilation is
/// globally disabled.
pub fn type_infer(
    runtime: &crate::runtime::Runtime,
    service: &mut dyn InferenceService,
    recursion: &InferenceRecursionGuard,
    method: &Method,
    mut linfo: LambdaInfo,
    force: bool,
) -> Result<LambdaInfo, InferenceError> {
    if method.is_macro_expanded {
        return Ok(linfo);
    }
    if method.isstaged && linfo.code.is_none() {
        return Ok(linfo);
    }
    if matches!(runtime.config.compile_mode, CompileMode::Off) {
        return Ok(linfo);
    }
    if recursion.would_recurse() && !force {
        return Ok(linfo);
    }

    debug_assert!(
        !linfo.in_inference,
        "type_infer called re-entrantly on the same LambdaInfo"
    );

    let _codegen = runtime.codegen_lock();
    let _typeinf = runtime.typeinf_lock();
    let mut _guard = InferenceGuard::enter(&mut linfo);
    recursion.depth.set(recursion.depth.get() + 1);
    let result = service.infer(&_guard.linfo.spec_types);
    recursion.depth.set(recursion.depth.get() - 1);

    let mut inferred = result?;
    inferred.inferred = true;
    Ok(inferred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;

    struct AlwaysSucceeds;
    impl InferenceService for AlwaysSucceeds {
        fn infer(&mut self, spec_types: &[JuliaType]) -> Result<LambdaInfo, InferenceError> {
            Ok(LambdaInfo::new(spec_types.to_vec(), vec![]))
        }
    }

    struct AlwaysFails;
    impl InferenceService for AlwaysFails {
        fn infer(&mut self, _spec_types: &[JuliaType]) -> Result<LambdaInfo, InferenceError> {
            Err(InferenceError("no type information".into()))
        }
    }

    #[test]
    fn infers_and_marks_the_result_inferred() {
        let runtime = Runtime::new();
        let method = Method::new(vec![JuliaType::Int64], Vec::<String>::new());
        let linfo = LambdaInfo::new(vec![JuliaType::Int64], vec![]);
        let recursion = InferenceRecursionGuard::default();
        let mut svc = AlwaysSucceeds;
        let result = type_infer(&runtime, &mut svc, &recursion, &method, linfo, false).unwrap();
        assert!(result.inferred);
    }

    #[test]
    fn macro_expanded_methods_skip_inference() {
        let runtime = Runtime::new();
        let mut method = Method::new(vec![JuliaType::Int64], Vec::<String>::new());
        method.is_macro_expanded = true;
        let linfo = LambdaInfo::new(vec![JuliaType::Int64], vec![]);
        let recursion = InferenceRecursionGuard::default();
        let mut svc = AlwaysFails;
        let result = type_infer(&runtime, &mut svc, &recursion, &method, linfo, false).unwrap();
        assert!(!result.inferred);
    }
}
