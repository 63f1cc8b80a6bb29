use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docket_stats::{canonical_filename, count_unique_json, CountOptions, MemoryListing, NoProgress};

const PREFIX: &str = "raw-data/EPA/EPA-HQ-OAR-2021-0317/text-EPA-HQ-OAR-2021-0317/comments/";

/// Keys for `records` comments where every third record has re-downloaded copies.
fn generate_keys(records: usize) -> Vec<String> {
    let mut keys = Vec::with_capacity(records * 2);
    for i in 0..records {
        keys.push(format!("{PREFIX}EPA-HQ-OAR-2021-0317-{i:07}.json"));
        if i % 3 == 0 {
            keys.push(format!("{PREFIX}EPA-HQ-OAR-2021-0317-{i:07}(1).json"));
            keys.push(format!("{PREFIX}EPA-HQ-OAR-2021-0317-{i:07}(1)(2).json"));
        }
    }
    keys
}

fn bench_canonical_filename(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical_filename");

    for key in [
        "EPA-HQ-OAR-2021-0317-0001.json",
        "EPA-HQ-OAR-2021-0317-0001(1)(2)(3).json",
        "EPA-HQ-OAR-2021-0317-0001.htm",
    ] {
        let full = format!("{PREFIX}{key}");
        group.bench_with_input(BenchmarkId::from_parameter(key), &full, |b, full| {
            b.iter(|| canonical_filename(black_box(full)).len())
        });
    }

    group.finish();
}

fn bench_count_unique(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let mut group = c.benchmark_group("count_unique_json");

    for records in [1_000usize, 100_000] {
        let keys = generate_keys(records);
        group.throughput(Throughput::Elements(keys.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(records), &keys, |b, keys| {
            b.iter(|| {
                let pages: Vec<Vec<String>> = keys.chunks(1000).map(|c| c.to_vec()).collect();
                let mut listing = MemoryListing::new(pages);
                runtime
                    .block_on(count_unique_json(
                        &mut listing,
                        CountOptions::default(),
                        &mut NoProgress,
                    ))
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_canonical_filename, bench_count_unique);
criterion_main!(benches);
