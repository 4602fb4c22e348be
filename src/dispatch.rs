//! The dispatch engine: `apply_generic`, `invoke`, and the
//! hot-path argument-tuple construction.
//!
//! The miss path below — by-type lookup on the definition map, then
//! canonicalize-and-cache — follows the usual cache-then-scan split: a
//! cache is checked first and the call falls through to an uncached scan
//! on a miss, exactly as `apply_generic` does here with its extra
//! callsite-cache tier layered on top.

use crate::method::MethodId;
use crate::method_table::MethodTable;
use crate::runtime::{CallsiteId, Runtime};
use crate::types::{JuliaType, MethodError};

/// A runtime value as this crate's interface sees it: something whose
/// Julia-level type can be asked for, and which may itself be a type
/// (enabling `Type{X}` dispatch). The code generator and the embedder's
/// object model are out of scope; this trait is the only seam dispatch
/// needs.
pub trait TypedValue {
    fn julia_type(&self) -> JuliaType;
    /// If this value is itself a type (a `DataType`/class object), the type
    /// it denotes — used so `arg_type_tuple` can build `Type{X}` instead of
    /// `typeof(x)`.
    fn as_type_value(&self) -> Option<JuliaType> {
        None
    }
}

/// `arg_type_tuple`: for each argument, the tuple position receives
/// `Type(a)` if `a` is itself a type value, else `typeof(a)`.
pub fn arg_type_tuple<V: TypedValue>(args: &[V]) -> Vec<JuliaType> {
    args.iter()
        .map(|a| match a.as_type_value() {
            Some(t) => JuliaType::TypeOf(Box::new(t)),
            None => a.julia_type(),
        })
        .collect()
}

/// Outcome of a successful dispatch: which method resolved the call and the
/// (possibly despecialized) cache key it was filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub method: MethodId,
    pub cache_key: Vec<JuliaType>,
}

/// `apply_generic(args, n)`: the hot dispatch path.
///
/// `site` stands in for a return-address-derived callsite fingerprint (this
/// crate has no return-address/unwind access, so the embedder supplies a
/// stable per-call-site token instead).
pub fn apply_generic(
    runtime: &Runtime,
    mt: &mut MethodTable,
    site: CallsiteId,
    arg_types: &[JuliaType],
) -> Result<Resolved, MethodError> {
    // 1-3: callsite micro-cache.
    if let Some((method, sig)) = runtime.micro_cache().lookup(site, arg_types) {
        return Ok(Resolved {
            method: *method,
            cache_key: sig.clone(),
        });
    }

    // 4: table-wide dispatch cache, via assoc_exact.
    if let Some(entry) = mt.cache_lookup_exact(arg_types) {
        let method = entry.payload.method_id();
        if entry.is_pure_leaf() {
            runtime
                .micro_cache()
                .install(site, (method, entry.sig.clone()));
        }
        return Ok(Resolved {
            method,
            cache_key: entry.sig.clone(),
        });
    }
    if let Some(entry) = mt.cache_lookup_by_type(arg_types) {
        let method = entry.payload.method_id();
        return Ok(Resolved {
            method,
            cache_key: entry.sig.clone(),
        });
    }

    // 5: further miss — by-type lookup on the definition map.
    let method_id = mt.dispatch_by_type(arg_types).ok_or_else(|| MethodError::NoMethod {
        name: mt.name.clone(),
        arg_types: arg_types.to_vec(),
    })?;

    let matched = mt.method(method_id);
    if matched.ambig.iter().any(|other| {
        crate::method::signature::sig_intersect(arg_types, &mt.method(*other).sig).is_some()
    }) {
        let candidates = std::iter::once(matched.sig.clone())
            .chain(matched.ambig.iter().map(|o| mt.method(*o).sig.clone()))
            .collect();
        return Err(MethodError::Ambiguous {
            name: mt.name.clone(),
            arg_types: arg_types.to_vec(),
            candidates,
        });
    }

    let cache_key = mt.cache_insert(method_id, arg_types);
    Ok(Resolved {
        method: method_id,
        cache_key,
    })
}

/// `invoke(types0, args, n)`: dispatch against an explicit
/// signature rather than the argument types' natural most-specific match.
pub fn invoke(mt: &MethodTable, explicit_sig: &[JuliaType]) -> Result<MethodId, MethodError> {
    mt.find_by_type(explicit_sig, false)
        .ok_or_else(|| MethodError::NoMethod {
            name: mt.name.clone(),
            arg_types: explicit_sig.to_vec(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    fn setup() -> (Runtime, MethodTable) {
        let runtime = Runtime::new();
        let mt = MethodTable::new("f");
        (runtime, mt)
    }

    #[test]
    fn concrete_dispatch_prefers_the_specific_overload() {
        let (runtime, mut mt) = setup();
        mt.table_insert(
            &runtime,
            Method::new(vec![JuliaType::Int64, JuliaType::Int64], vec![]),
        );
        mt.table_insert(
            &runtime,
            Method::new(vec![JuliaType::Any, JuliaType::Any], vec![]),
        );
        let r = apply_generic(
            &runtime,
            &mut mt,
            CallsiteId(1),
            &[JuliaType::Int64, JuliaType::Int64],
        )
        .unwrap();
        assert_eq!(mt.method(r.method).sig, vec![JuliaType::Int64, JuliaType::Int64]);

        let r2 = apply_generic(
            &runtime,
            &mut mt,
            CallsiteId(2),
            &[JuliaType::Int64, JuliaType::String],
        )
        .unwrap();
        assert_eq!(mt.method(r2.method).sig, vec![JuliaType::Any, JuliaType::Any]);
    }

    #[test]
    fn ambiguous_call_raises_method_error() {
        let (runtime, mut mt) = setup();
        mt.table_insert(
            &runtime,
            Method::new(vec![JuliaType::Number, JuliaType::Int64], vec![]),
        );
        mt.table_insert(
            &runtime,
            Method::new(vec![JuliaType::Int64, JuliaType::Number], vec![]),
        );
        let err = apply_generic(
            &runtime,
            &mut mt,
            CallsiteId(3),
            &[JuliaType::Int64, JuliaType::Int64],
        )
        .unwrap_err();
        assert!(matches!(err, MethodError::Ambiguous { .. }));
    }

    #[test]
    fn redefinition_invalidates_stale_cache_entry() {
        let (runtime, mut mt) = setup();
        mt.table_insert(&runtime, Method::new(vec![JuliaType::Int64], vec![]));
        let first = apply_generic(&runtime, &mut mt, CallsiteId(4), &[JuliaType::Int64]).unwrap();
        let first_method = first.method;

        let outcome = mt.table_insert(&runtime, Method::new(vec![JuliaType::Int64], vec![]));
        assert_eq!(outcome.overwrote, Some(first_method));

        let second = apply_generic(&runtime, &mut mt, CallsiteId(4), &[JuliaType::Int64]).unwrap();
        assert_eq!(second.method, outcome.id);
    }

    #[test]
    fn invoke_uses_the_explicit_signature_not_the_most_specific() {
        let (runtime, mut mt) = setup();
        mt.table_insert(&runtime, Method::new(vec![JuliaType::Number], vec![]));
        mt.table_insert(&runtime, Method::new(vec![JuliaType::Int64], vec![]));
        let chosen = invoke(&mt, &[JuliaType::Number]).unwrap();
        assert_eq!(mt.method(chosen).sig, vec![JuliaType::Number]);
    }
}
