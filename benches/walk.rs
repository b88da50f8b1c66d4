use criterion::{criterion_group, criterion_main, Criterion};

use roocrack::kangaroo::JumpTable;
use roocrack::math::{Scalar, Secp256k1};

fn bench_point_add(c: &mut Criterion) {
    let curve = Secp256k1::new();
    let g = curve.generator().clone();
    let g2 = curve.double(&g);
    c.bench_function("point_add", |b| b.iter(|| curve.add(&g, &g2)));
}

fn bench_scalar_mul(c: &mut Criterion) {
    let curve = Secp256k1::new();
    let k = Scalar::from_hex("DEADBEEFCAFEBABE1234").unwrap();
    c.bench_function("scalar_mul", |b| b.iter(|| curve.mul(&k, curve.generator())));
}

fn bench_walk_step(c: &mut Criterion) {
    let curve = Secp256k1::new();
    let table = JumpTable::build(&curve, &Scalar::one().shl(40));
    let start = curve.mul(&Scalar::from_u64(123_456), curve.generator());

    c.bench_function("walk_step", |b| {
        let mut point = start.clone();
        b.iter(|| {
            let entry = table.entry(table.index_for(&point));
            point = curve.add(&point, &entry.step);
        })
    });
}

criterion_group!(benches, bench_point_add, bench_scalar_mul, bench_walk_step);
criterion_main!(benches);
