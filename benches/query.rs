#[macro_use]
extern crate criterion;

use {
    criterion::Criterion,
    gcmap::GcMapBuilder,
    rand_core::{RngCore, SeedableRng},
    rand_xorshift::XorShiftRng,
};

fn query(c: &mut Criterion) {
    let map = {
        let mut builder = GcMapBuilder::new(8000, 64);
        let mut rng = XorShiftRng::seed_from_u64(0);

        for _ in 0..8000 {
            let mut buf = [0u8; 128];
            rng.fill_bytes(&mut buf);
            builder.insert_unchecked(&buf[..]);
        }

        builder.build(500).unwrap()
    };

    c.bench_function("query", move |b| {
        b.iter(|| map.query(&[0u8, 1, 2, 3, 4, 5, 6, 7][..]))
    });
}

criterion_group!(benches, query);
criterion_main!(benches);
