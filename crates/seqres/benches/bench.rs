use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use seqres::{BioseqInfo, disambiguate, modified_fallback_form, normalize_case};
use std::time::Instant;

// Row-set size per disambiguation call. Real fetches rarely exceed a handful
// of rows; 64 exercises the collapse loop well past that.
const ROWS: usize = 64;

fn candidate_rows() -> Vec<BioseqInfo> {
    (0..ROWS)
        .map(|i| BioseqInfo {
            accession: "NM_000001".into(),
            version: ((i * 7) % 23) as i16,
            seq_id_type: 10,
            gi: i as i64,
            ..BioseqInfo::default()
        })
        .collect()
}

fn bench_disambiguate(c: &mut Criterion) {
    let mut group = c.benchmark_group("disambiguate");
    group.throughput(Throughput::Elements(ROWS as u64));

    group.bench_function(format!("collapse/{ROWS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let rows = candidate_rows();
                black_box(disambiguate(rows, None));
            }
            start.elapsed()
        });
    });

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    group.bench_function("as_is_forms", |b| {
        b.iter(|| {
            let upper = normalize_case(black_box("ref|nc_000001.11|"));
            black_box(modified_fallback_form(&upper))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_disambiguate, bench_normalize);
criterion_main!(benches);
