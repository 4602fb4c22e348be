use super::*;

#[test]
fn subtype_is_reflexive_for_concrete_types() {
    assert!(JuliaType::Int64.is_subtype_of(&JuliaType::Int64));
    assert!(!JuliaType::Int64.is_subtype_of(&JuliaType::Float64));
}

#[test]
fn subtype_integer_hierarchy() {
    assert!(JuliaType::Int64.is_subtype_of(&JuliaType::Integer));
    assert!(JuliaType::Int64.is_subtype_of(&JuliaType::Real));
    assert!(JuliaType::Int64.is_subtype_of(&JuliaType::Number));
    assert!(JuliaType::Int64.is_subtype_of(&JuliaType::Any));
}

#[test]
fn subtype_union() {
    let u = JuliaType::Union(vec![JuliaType::Int64, JuliaType::String]);
    assert!(JuliaType::Int64.is_subtype_of(&u));
    assert!(JuliaType::String.is_subtype_of(&u));
    assert!(!JuliaType::Float64.is_subtype_of(&u));
}

#[test]
fn bottom_is_subtype_of_everything() {
    assert!(JuliaType::Bottom.is_subtype_of(&JuliaType::Int64));
    assert!(JuliaType::Bottom.is_subtype_of(&JuliaType::Any));
}

#[test]
fn specificity_orders_the_numeric_tower() {
    assert!(JuliaType::Int64.specificity() > JuliaType::Integer.specificity());
    assert!(JuliaType::Integer.specificity() > JuliaType::Real.specificity());
    assert!(JuliaType::Real.specificity() > JuliaType::Number.specificity());
    assert!(JuliaType::Number.specificity() > JuliaType::Any.specificity());
}

#[test]
fn vararg_subtyping_respects_fixed_count() {
    let unbounded = JuliaType::Vararg(Box::new(JuliaType::Int64), None);
    let fixed3 = JuliaType::Vararg(Box::new(JuliaType::Int64), Some(3));
    assert!(fixed3.is_subtype_of(&unbounded));
    assert!(!unbounded.is_subtype_of(&fixed3));
    assert!(fixed3.specificity() >= unbounded.specificity());
}

#[test]
fn intersect_of_overlapping_abstract_types() {
    assert_eq!(
        JuliaType::Integer.intersect(&JuliaType::Signed),
        JuliaType::Signed
    );
}

#[test]
fn instantiate_unionall_substitutes_body() {
    let vec_t = JuliaType::UnionAll {
        var: "T".to_string(),
        bound: None,
        body: Box::new(JuliaType::VectorOf(Box::new(JuliaType::TypeVar(
            "T".to_string(),
            None,
        )))),
    };
    let instantiated = vec_t.instantiate(&JuliaType::Int64);
    assert_eq!(
        instantiated,
        JuliaType::VectorOf(Box::new(JuliaType::Int64))
    );
}
