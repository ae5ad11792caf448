use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use zint_ntt::plan::{plan32, Plan32};
use zint_ntt::mul_u32;

pub fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("ntt_forward");

    for log_n in [10usize, 12, 14, 16, 18] {
        let n = 1 << log_n;
        let plan: &Plan32 = plan32(n);
        let mut data: Vec<u32> = (0..n as u32).map(|i| i.wrapping_mul(2_654_435_761)).collect();
        for x in data.iter_mut() {
            *x %= 754_974_721;
        }

        let id = BenchmarkId::from_parameter(format!("n: {n}"));
        group.bench_with_input(id, &(), |b, _| {
            b.iter(|| {
                plan.forward(0, &mut data);
                black_box(());
            })
        });
    }

    group.finish();
}

pub fn bench_mul_u32(c: &mut Criterion) {
    let mut group = c.benchmark_group("ntt_mul_u32");
    group.sample_size(20);

    for limbs in [1024usize, 4096, 16384, 65536] {
        let a: Vec<u32> = (0..limbs as u32).map(|i| i.wrapping_mul(0x9e37_79b9)).collect();
        let b: Vec<u32> = (0..limbs as u32).map(|i| i.wrapping_mul(0x85eb_ca6b)).collect();
        let mut r = vec![0u32; 2 * limbs];

        let id = BenchmarkId::from_parameter(format!("limbs: {limbs}"));
        group.bench_with_input(id, &(), |bch, _| {
            bch.iter(|| {
                mul_u32(&mut r, &a, &b).unwrap();
                black_box(r[0]);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_forward, bench_mul_u32);
criterion_main!(benches);
