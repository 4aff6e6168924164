//! Benchmark for region listing classification

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use scm_provisioner::has_free_capacity;

fn region_listing(regions: usize, free_at: Option<usize>) -> String {
    let mut out = String::from("\n");
    for i in 0..regions {
        let free = if Some(i) == free_at { "3012.0 GiB" } else { "0.0 GiB" };
        out.push_str(&format!(
            "---ISetID=0x{:016x}---\n   PersistentMemoryType=AppDirect\n   FreeCapacity={}\n",
            i, free
        ));
    }
    out
}

fn bench_has_free_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_scan");
    group.throughput(Throughput::Elements(1));

    let full = region_listing(64, None);
    group.bench_function("full_scan_64_regions", |b| {
        b.iter(|| has_free_capacity(black_box(&full)))
    });

    let early = region_listing(64, Some(0));
    group.bench_function("early_return_64_regions", |b| {
        b.iter(|| has_free_capacity(black_box(&early)))
    });

    group.finish();
}

criterion_group!(benches, bench_has_free_capacity);
criterion_main!(benches);
