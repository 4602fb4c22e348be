use super::signature::*;
use super::*;
use crate::types::JuliaType;

fn m(sig: Vec<JuliaType>) -> Method {
    Method::new(sig, vec![])
}

#[test]
fn fixed_arity_excludes_the_vararg_tail() {
    let method = m(vec![
        JuliaType::Int64,
        JuliaType::Vararg(Box::new(JuliaType::Int64), None),
    ]);
    assert_eq!(method.fixed_arity(), 1);
    assert!(method.vararg_tail().is_some());
}

#[test]
fn sig_subtype_accepts_longer_tuples_under_unbounded_vararg() {
    let call = vec![JuliaType::Int64, JuliaType::Int64, JuliaType::Int64];
    let decl = vec![JuliaType::Vararg(Box::new(JuliaType::Int64), None)];
    assert!(sig_subtype(&call, &decl));
}

#[test]
fn sig_subtype_rejects_wrong_fixed_vararg_count() {
    let call = vec![JuliaType::Int64, JuliaType::Int64];
    let decl = vec![JuliaType::Vararg(Box::new(JuliaType::Int64), Some(3))];
    assert!(!sig_subtype(&call, &decl));
}

#[test]
fn more_specific_distinguishes_numeric_tower_overloads() {
    assert!(more_specific(&[JuliaType::Int64], &[JuliaType::Number]));
    assert!(!more_specific(&[JuliaType::Number], &[JuliaType::Int64]));
}

#[test]
fn sig_intersect_is_none_for_disjoint_tuples() {
    assert!(sig_intersect(&[JuliaType::Int64], &[JuliaType::String]).is_none());
}

#[test]
fn cache_method_despecializes_uncalled_function_argument() {
    let decl = vec![JuliaType::Function, JuliaType::Int64];
    let tt = vec![JuliaType::Function, JuliaType::Int64];
    let called = vec![false, false];
    let any_slots = vec![false, false];
    let canon = cache_method(&decl, &tt, &called, &any_slots, false, 8, &[], 32);
    assert_eq!(canon.cache_key[0], JuliaType::Function);
}

#[test]
fn cache_method_caps_vararg_tail_at_max_args() {
    let decl = vec![JuliaType::Vararg(Box::new(JuliaType::Any), None)];
    let tt = vec![
        JuliaType::Int64,
        JuliaType::Int64,
        JuliaType::Int64,
        JuliaType::Int64,
    ];
    let called = vec![];
    let any_slots = vec![];
    let canon = cache_method(&decl, &tt, &called, &any_slots, false, 3, &[], 32);
    assert!(canon.cache_key.len() <= 4);
}

#[test]
fn cache_method_despecializes_any_declared_slot() {
    let decl = vec![JuliaType::Any, JuliaType::Int64];
    let tt = vec![JuliaType::String, JuliaType::Int64];
    let called = vec![false, false];
    let any_slots = vec![true, false];
    let canon = cache_method(&decl, &tt, &called, &any_slots, false, 8, &[], 32);
    assert_eq!(canon.cache_key[0], JuliaType::Any);
    assert_eq!(canon.cache_key[1], JuliaType::Int64);
}

#[test]
fn record_insertion_flags_neither_dominates_as_ambiguous() {
    let a = vec![JuliaType::Number, JuliaType::Int64];
    let b = vec![JuliaType::Int64, JuliaType::Number];
    let report = ambiguity::record_insertion(MethodId(1), &a, &[(MethodId(0), &b)]);
    assert_eq!(report.new_ambiguities, vec![(MethodId(1), MethodId(0))]);
    assert!(report.shadowed.is_empty());
}
