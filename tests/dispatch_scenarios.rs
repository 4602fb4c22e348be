use gf_dispatch::method::signature::sig_subtype;
use gf_dispatch::{apply_generic, invoke, CallsiteId, JuliaType, Method, MethodError, MethodTable, Runtime};

fn table(name: &str) -> (Runtime, MethodTable) {
    (Runtime::new(), MethodTable::new(name))
}

#[test]
fn simple_concrete_dispatch() {
    let (runtime, mut mt) = table("f");
    mt.table_insert(
        &runtime,
        Method::new(vec![JuliaType::Int64, JuliaType::Int64], vec![]),
    );
    mt.table_insert(
        &runtime,
        Method::new(vec![JuliaType::Any, JuliaType::Any], vec![]),
    );

    let site = CallsiteId(10);
    let a = apply_generic(&runtime, &mut mt, site, &[JuliaType::Int64, JuliaType::Int64]).unwrap();
    assert_eq!(
        mt.method(a.method).sig,
        vec![JuliaType::Int64, JuliaType::Int64]
    );
    // The micro-cache slot for this call site is now populated.
    assert!(runtime.micro_cache().has_entry_of_arity(site, 2));

    let b = apply_generic(
        &runtime,
        &mut mt,
        CallsiteId(11),
        &[JuliaType::Int64, JuliaType::String],
    )
    .unwrap();
    assert_eq!(
        mt.method(b.method).sig,
        vec![JuliaType::Any, JuliaType::Any]
    );
}

#[test]
fn specificity_tie_break_then_resolution() {
    let (runtime, mut mt) = table("g");
    let number_int = mt.table_insert(
        &runtime,
        Method::new(vec![JuliaType::Number, JuliaType::Int64], vec![]),
    );
    let int_number = mt.table_insert(
        &runtime,
        Method::new(vec![JuliaType::Int64, JuliaType::Number], vec![]),
    );
    assert!(mt.method(number_int.id).ambig.contains(&int_number.id));
    assert!(mt.method(int_number.id).ambig.contains(&number_int.id));

    let err = apply_generic(
        &runtime,
        &mut mt,
        CallsiteId(20),
        &[JuliaType::Int64, JuliaType::Int64],
    )
    .unwrap_err();
    match err {
        MethodError::Ambiguous { candidates, .. } => assert_eq!(candidates.len(), 2),
        other => panic!("expected Ambiguous, got {other:?}"),
    }

    // Adding the exact-match definition resolves the ambiguity for that call.
    let exact = mt.table_insert(
        &runtime,
        Method::new(vec![JuliaType::Int64, JuliaType::Int64], vec![]),
    );
    let resolved = apply_generic(
        &runtime,
        &mut mt,
        CallsiteId(21),
        &[JuliaType::Int64, JuliaType::Int64],
    )
    .unwrap();
    assert_eq!(resolved.method, exact.id);
}

#[test]
fn vararg_cap_despecializes_past_max_args() {
    let (runtime, mut mt) = table("h");
    mt.table_insert(
        &runtime,
        Method::new(
            vec![JuliaType::Vararg(Box::new(JuliaType::Any), None)],
            vec![],
        ),
    );
    mt.max_args = 3;

    let all_int = vec![
        JuliaType::Int64,
        JuliaType::Int64,
        JuliaType::Int64,
        JuliaType::Int64,
        JuliaType::Int64,
    ];
    let resolved = apply_generic(&runtime, &mut mt, CallsiteId(30), &all_int).unwrap();
    assert!(resolved.cache_key.len() <= mt.max_args + 1);

    let mixed = vec![JuliaType::Int64, JuliaType::Bool, JuliaType::String];
    assert!(sig_subtype(&mixed, &mt.method(resolved.method).sig));
}

#[test]
fn type_despecialization_collapses_to_a_single_cache_entry() {
    let (runtime, mut mt) = table("k");
    mt.table_insert(
        &runtime,
        Method::new(vec![JuliaType::Type], vec![]),
    );

    for ty in [JuliaType::Int64, JuliaType::Float64, JuliaType::String] {
        let query = vec![JuliaType::TypeOf(Box::new(ty))];
        apply_generic(&runtime, &mut mt, CallsiteId(40), &query).unwrap();
    }

    let generic_key = vec![JuliaType::TypeOf(Box::new(JuliaType::Any))];
    assert!(mt.cache_lookup_exact(&generic_key).is_some());
}

#[test]
fn redefinition_invalidates_the_old_cache_entry() {
    let (runtime, mut mt) = table("p");
    mt.table_insert(&runtime, Method::new(vec![JuliaType::Int64], vec![]));
    let site = CallsiteId(50);
    apply_generic(&runtime, &mut mt, site, &[JuliaType::Int64]).unwrap();

    let outcome = mt.table_insert(&runtime, Method::new(vec![JuliaType::Int64], vec![]));
    assert!(!runtime.micro_cache().has_entry_of_arity(site, 1));

    let resolved = apply_generic(&runtime, &mut mt, site, &[JuliaType::Int64]).unwrap();
    assert_eq!(resolved.method, outcome.id);
}

#[test]
fn invoke_pins_the_explicit_signature() {
    let (runtime, mut mt) = table("q");
    mt.table_insert(&runtime, Method::new(vec![JuliaType::Number], vec![]));
    mt.table_insert(&runtime, Method::new(vec![JuliaType::Int64], vec![]));

    let chosen = invoke(&mt, &[JuliaType::Number]).unwrap();
    assert_eq!(mt.method(chosen).sig, vec![JuliaType::Number]);
}

#[test]
fn no_matching_method_raises_no_method_error() {
    let (runtime, mut mt) = table("z");
    mt.table_insert(&runtime, Method::new(vec![JuliaType::Int64], vec![]));
    let err = apply_generic(&runtime, &mut mt, CallsiteId(60), &[JuliaType::String]).unwrap_err();
    assert!(matches!(err, MethodError::NoMethod { .. }));
}
