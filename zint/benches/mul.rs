use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigUint;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

use zint::{BigInt, Sign};

fn random_value(rng: &mut ChaCha8Rng, limbs: usize) -> BigInt {
    let mag: Vec<u64> = (0..limbs).map(|_| rng.gen()).collect();
    BigInt::from_limbs(Sign::Plus, mag)
}

fn to_num(a: &BigInt) -> BigUint {
    let mut bytes = Vec::with_capacity(a.abs_size() * 8);
    for &limb in a.limbs() {
        bytes.extend_from_slice(&limb.to_le_bytes());
    }
    BigUint::from_bytes_le(&bytes)
}

/// Multiplication across all three regimes, against num-bigint.
pub fn bench_mul(c: &mut Criterion) {
    let mut group = c.benchmark_group("mul");
    group.sample_size(20);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for limbs in [8usize, 31, 33, 128, 512, 1023, 1025, 4096, 16384] {
        let a = random_value(&mut rng, limbs);
        let b = random_value(&mut rng, limbs);

        let id = BenchmarkId::new("zint", format!("limbs: {limbs}"));
        group.bench_with_input(id, &(), |bch, _| b_iter(bch, &a, &b));

        let (na, nb) = (to_num(&a), to_num(&b));
        let id = BenchmarkId::new("num-bigint", format!("limbs: {limbs}"));
        group.bench_with_input(id, &(), |bch, _| {
            bch.iter(|| black_box(&na * &nb));
        });
    }

    group.finish();
}

fn b_iter(bch: &mut criterion::Bencher<'_>, a: &BigInt, b: &BigInt) {
    bch.iter(|| black_box(a * b));
}

pub fn bench_sqr(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqr");
    group.sample_size(20);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for limbs in [31usize, 128, 1025, 4096] {
        let a = random_value(&mut rng, limbs);
        let id = BenchmarkId::from_parameter(format!("limbs: {limbs}"));
        group.bench_with_input(id, &(), |bch, _| {
            bch.iter(|| black_box(a.sqr()));
        });
    }

    group.finish();
}

pub fn bench_div(c: &mut Criterion) {
    let mut group = c.benchmark_group("div");
    group.sample_size(20);
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for (nn, dn) in [(64usize, 32usize), (512, 256), (4096, 2048)] {
        let a = random_value(&mut rng, nn);
        let b = random_value(&mut rng, dn);
        let id = BenchmarkId::from_parameter(format!("{nn}/{dn}"));
        group.bench_with_input(id, &(), |bch, _| {
            bch.iter(|| black_box(a.div_rem(&b).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mul, bench_sqr, bench_div);
criterion_main!(benches);
