use criterion::{criterion_group, criterion_main};
use criterion::{AxisScale, BatchSize, BenchmarkId, Criterion, PlotConfiguration};
use rand::Rng;

use dna_fm_index::data_structures::fmindex::{CompressedIndex, Index};
use dna_fm_index::Text;

fn random_dna_text(n: usize) -> Vec<u8> {
    const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
    let mut rng = rand::thread_rng();
    (0..n).map(|_| BASES[rng.gen_range(0..4)]).collect()
}

pub fn bench(c: &mut Criterion) {
    let plot_config = PlotConfiguration::default().summary_scale(AxisScale::Logarithmic);
    let mut group = c.benchmark_group("construction");
    group.plot_config(plot_config);
    for n in [1_000usize, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("Index", n), n, |b, &n| {
            b.iter_batched(
                || Text::from_bytes(random_dna_text(n)),
                Index::build,
                BatchSize::LargeInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("CompressedIndex", n), n, |b, &n| {
            b.iter_batched(
                || Text::from_bytes(random_dna_text(n)),
                |text| CompressedIndex::build(text, 16),
                BatchSize::LargeInput,
            )
        });
    }
}

criterion_group!(benches, bench);
criterion_main!(benches);
