use {
    gcmap::GcMapBuilder,
    rand_core::{RngCore, SeedableRng},
    rand_xorshift::XorShiftRng,
};

const NUM_ITEMS: u32 = 1000;
const E: f64 = 2.718282;

fn main() {
    let mut prng = XorShiftRng::seed_from_u64(0);

    let mut elements = Vec::<[u8; 32]>::with_capacity(NUM_ITEMS as usize);
    for _ in 0..NUM_ITEMS {
        let mut buf = [0u8; 32];
        prng.fill_bytes(&mut buf);
        elements.push(buf);
    }

    println!("plain list: {:?} bytes", NUM_ITEMS as usize * 32);

    // Bloom filter, for comparison.
    {
        let p: f64 = 128.0;
        println!(
            "bloom filter: {:?} bytes",
            (NUM_ITEMS as f64 * E.log2() * p.log2()) as u32 / 8
        );
    }

    // GCM
    {
        let mut builder = GcMapBuilder::new(NUM_ITEMS, 128);
        for elem in &elements {
            builder.insert_unchecked(elem);
        }

        let map = builder.build((NUM_ITEMS / 16).max(1)).unwrap();
        let table_bytes = map.table_size() as usize * (4 /* offset */ + 4 /* count */);
        println!(
            "GCM: {:?} bytes (vector) + {:?} bytes (lookup table)",
            map.bit_len() / 8,
            table_bytes
        );
    }

    // Theoretical minimum.
    {
        println!(
            "Theoretical minimum: {:?} bytes",
            (NUM_ITEMS as f64 * 128f64.log2()) as u32 / 8
        )
    }
}
