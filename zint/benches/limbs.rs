use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

use zint::limbs;

pub fn bench_add_n(c: &mut Criterion) {
    let mut group = c.benchmark_group("limbs_add_n");
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for n in [4usize, 16, 64, 256, 1024, 4096, 16384, 65536] {
        let a: Vec<u64> = (0..n).map(|_| rng.gen()).collect();
        let b: Vec<u64> = (0..n).map(|_| rng.gen()).collect();
        let mut r = vec![0u64; n];

        group.throughput(Throughput::Elements(n as u64));
        let id = BenchmarkId::from_parameter(format!("limbs: {n}"));
        group.bench_with_input(id, &(), |bch, _| {
            bch.iter(|| black_box(limbs::add_n(&mut r, &a, &b)))
        });
    }

    group.finish();
}

pub fn bench_mul_1(c: &mut Criterion) {
    let mut group = c.benchmark_group("limbs_mul_1");
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for n in [4usize, 16, 64, 256, 1024, 4096, 16384] {
        let a: Vec<u64> = (0..n).map(|_| rng.gen()).collect();
        let mut r = vec![0u64; n];
        let s: u64 = rng.gen();

        group.throughput(Throughput::Elements(n as u64));
        let id = BenchmarkId::from_parameter(format!("limbs: {n}"));
        group.bench_with_input(id, &(), |bch, _| {
            bch.iter(|| black_box(limbs::mul_1(&mut r, &a, s)))
        });
    }

    group.finish();
}

pub fn bench_addmul_1(c: &mut Criterion) {
    let mut group = c.benchmark_group("limbs_addmul_1");
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for n in [4usize, 16, 64, 256, 1024, 4096, 16384] {
        let a: Vec<u64> = (0..n).map(|_| rng.gen()).collect();
        let mut r: Vec<u64> = (0..n).map(|_| rng.gen()).collect();
        let s: u64 = rng.gen();

        group.throughput(Throughput::Elements(n as u64));
        let id = BenchmarkId::from_parameter(format!("limbs: {n}"));
        group.bench_with_input(id, &(), |bch, _| {
            bch.iter(|| black_box(limbs::addmul_1(&mut r, &a, s)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_add_n, bench_mul_1, bench_addmul_1);
criterion_main!(benches);
