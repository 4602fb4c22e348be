use criterion::{criterion_group, criterion_main, Criterion};

use gf_dispatch::{apply_generic, CallsiteId, JuliaType, Method, MethodTable, Runtime};

fn build_table(n: usize) -> (Runtime, MethodTable) {
    let runtime = Runtime::new();
    let mut mt = MethodTable::new("bench_fn");
    for i in 0..n {
        let ty = match i % 4 {
            0 => JuliaType::Int64,
            1 => JuliaType::Float64,
            2 => JuliaType::String,
            _ => JuliaType::Bool,
        };
        mt.table_insert(&runtime, Method::new(vec![ty], vec![]));
    }
    mt.table_insert(&runtime, Method::new(vec![JuliaType::Any], vec![]));
    (runtime, mt)
}

fn bench_cache_hit(c: &mut Criterion) {
    let (runtime, mut mt) = build_table(16);
    let site = CallsiteId(1);
    // Warm the micro-cache.
    apply_generic(&runtime, &mut mt, site, &[JuliaType::Int64]).unwrap();

    c.bench_function("apply_generic/micro_cache_hit", |b| {
        b.iter(|| apply_generic(&runtime, &mut mt, site, &[JuliaType::Int64]).unwrap());
    });
}

fn bench_cache_miss_then_definition_scan(c: &mut Criterion) {
    let (runtime, mut mt) = build_table(64);

    c.bench_function("apply_generic/definition_scan", |b| {
        b.iter(|| {
            mt.clear_cache();
            apply_generic(&runtime, &mut mt, CallsiteId(99), &[JuliaType::Float64]).unwrap()
        });
    });
}

criterion_group!(benches, bench_cache_hit, bench_cache_miss_then_definition_scan);
criterion_main!(benches);
