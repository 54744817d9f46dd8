use {
    byteorder::{BigEndian, WriteBytesExt},
    gcmap::GcMapBuilder,
    rand_core::{RngCore, SeedableRng},
    rand_xorshift::XorShiftRng,
};

const TRIES: usize = 5000;
const ELEMENTS: u16 = 10000;
const ERROR_RATE: u64 = 8; // 1/8 false-positive rate

fn main() {
    let map = {
        let mut builder = GcMapBuilder::new(ELEMENTS as u32, ERROR_RATE);
        let mut buf = vec![0u8; 2];
        for element in 0..ELEMENTS {
            buf.clear();
            buf.write_u16::<BigEndian>(element).unwrap();
            builder.insert_unchecked(&buf);
        }
        builder.build((ELEMENTS as u32 / 16).max(1)).unwrap()
    };

    // None of the probed values were inserted, so any "found" result below
    // is a false positive.
    let mut prng = XorShiftRng::seed_from_u64(0);
    let mut num = 0;
    let mut buf = [0u8; 4];
    for _ in 0..TRIES {
        prng.fill_bytes(&mut buf);
        if map.query(&buf[..]).is_some() {
            num += 1;
        }
    }

    println!(
        "Expected false positive rate: {:?}%",
        (1.0 / ERROR_RATE as f64) * 100.0
    );
    println!(
        "Observed rate: {:?}%",
        ((num as f64) / (TRIES as f64)) * 100.0
    );
}
