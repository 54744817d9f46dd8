//! The construction pipeline: hash every element, sort, Golomb-code the
//! differenced hashes, and populate the per-bin lookup tables.

use std::marker::PhantomData;

use crate::bits::BitVector;
use crate::hash::GcmHash;
use crate::planner::Params;
use crate::{GcMap, GcmError};

/// One Golomb codeword to be emitted, already deduplicated and with its
/// delta measured per the §4.3 rule (from the bin base for the first
/// element of a bin, from the previous hash otherwise).
struct Emission {
    bin: u32,
    is_first_in_bin: bool,
    delta: u64,
}

/// Accumulates element hashes for one `GcMap` and builds it.
///
/// Mirrors the teacher's `GcsBuilder<D: Digest>`: construct with the
/// expected element count and requested false-positive rate, `insert`
/// elements one at a time, then `build`.
#[derive(Clone, Debug)]
pub struct GcMapBuilder<H: GcmHash = crate::hash::XxHash64Seeded> {
    element_count: u32,
    requested_rate: u64,
    hashes: Vec<u64>,
    _hash: PhantomData<H>,
}

impl<H: GcmHash> GcMapBuilder<H> {
    /// Creates a builder for `element_count` elements at the requested
    /// false-positive rate `1/error_rate` (rounded up to a power of two
    /// during `build`).
    pub fn new(element_count: u32, error_rate: u64) -> Self {
        GcMapBuilder {
            element_count,
            requested_rate: error_rate,
            hashes: Vec::new(),
            _hash: PhantomData,
        }
    }

    /// Adds an entry, returning an error if more than `element_count`
    /// elements have already been added.
    pub fn insert(&mut self, element: impl AsRef<[u8]>) -> Result<(), GcmError> {
        if (self.hashes.len() as u64) < self.element_count as u64 {
            self.hashes.push(H::hash64(element.as_ref()));
            Ok(())
        } else {
            Err(GcmError::BadArguments(
                "more elements inserted than the builder's element_count",
            ))
        }
    }

    /// Adds an entry without the capacity check performed by [`insert`](Self::insert).
    pub fn insert_unchecked(&mut self, element: impl AsRef<[u8]>) {
        self.hashes.push(H::hash64(element.as_ref()));
    }

    /// Consumes the builder and produces the encoded map, using `table_size`
    /// bins for the side lookup index.
    pub fn build(mut self, table_size: u32) -> Result<GcMap<H>, GcmError> {
        let params = Params::new(self.element_count, self.requested_rate, table_size)?;

        // Reduce every hash into the universe and sort. Order among equal
        // hashes is irrelevant — only one representative per duplicate
        // survives differencing (§4.3, invariant 5).
        for h in self.hashes.iter_mut() {
            *h %= params.universe;
        }
        self.hashes.sort_unstable();

        let (emissions, vector_bits) = plan_emissions(&self.hashes, &params);

        let mut vector = BitVector::try_with_bit_len(round_up_64(vector_bits))
            .map_err(|_| GcmError::OutOfMemory)?;

        let mut element_table: Vec<Option<u32>> = Vec::new();
        element_table
            .try_reserve_exact(table_size as usize)
            .map_err(|_| GcmError::OutOfMemory)?;
        element_table.resize(table_size as usize, None);

        let mut element_table_count: Vec<u32> = Vec::new();
        element_table_count
            .try_reserve_exact(table_size as usize)
            .map_err(|_| GcmError::OutOfMemory)?;
        element_table_count.resize(table_size as usize, 0);

        let mut offset = 0u64;
        for emission in &emissions {
            if emission.is_first_in_bin {
                element_table[emission.bin as usize] = Some(offset as u32);
            }
            if (emission.bin as usize + 1) < table_size as usize {
                element_table_count[emission.bin as usize + 1] += 1;
            }

            offset += write_golomb(&mut vector, offset, emission.delta, params.error_rate, params.remainder_size);
        }

        // Cumulative prefix sum: element_table_count[b] becomes the dense
        // index of the first element in bin b.
        for i in 1..element_table_count.len() {
            element_table_count[i] += element_table_count[i - 1];
        }

        Ok(GcMap {
            vector,
            remainder_size: params.remainder_size,
            error_rate: params.error_rate,
            universe: params.universe,
            element_count: emissions.len() as u32,
            element_divisor: params.element_divisor,
            element_table: element_table.into_boxed_slice(),
            element_table_count: element_table_count.into_boxed_slice(),
            _hash: PhantomData,
        })
    }
}

/// Walks the sorted hash list once, applying the delta rule and duplicate
/// suppression from §4.3, and returns the list of codewords to emit along
/// with the total number of bits they will occupy.
fn plan_emissions(sorted_hashes: &[u64], params: &Params) -> (Vec<Emission>, u64) {
    let mut emissions = Vec::with_capacity(sorted_hashes.len());
    let mut total_bits = 0u64;
    let mut cur_bin: i64 = -1; // sentinel distinct from any real bin (>= 0)
    let mut prev_hash = 0u64;

    for &h in sorted_hashes.iter() {
        let bin = params.bin_of(h) as i64;
        let first_in_bin = bin != cur_bin;
        let delta = if first_in_bin {
            h - (bin as u64) * params.element_divisor
        } else {
            h - prev_hash
        };

        if delta == 0 && !first_in_bin {
            // Duplicate hash of a distinct element: collision, not re-encoded.
            continue;
        }

        total_bits += codeword_bits(delta, params.error_rate, params.remainder_size);
        emissions.push(Emission {
            bin: bin as u32,
            is_first_in_bin: first_in_bin,
            delta,
        });

        cur_bin = bin;
        prev_hash = h;
    }

    (emissions, total_bits)
}

fn codeword_bits(delta: u64, p: u64, r: u8) -> u64 {
    (delta / p) + 1 + r as u64
}

/// Writes one Golomb codeword for `delta` at `offset`, chunking unary runs
/// longer than 63 ones exactly as the reference encoder does, and returns
/// the number of bits written.
fn write_golomb(vector: &mut BitVector, offset: u64, delta: u64, p: u64, r: u8) -> u64 {
    let mut quotient = delta / p;
    let remainder = delta % p; // p is a power of two, so this is a mask in practice
    let mut off = offset;

    // Chunk at >= 63 rather than > 63: a quotient of exactly 63 would
    // otherwise leave a final write of 64 bits (quotient + 1), one past
    // what a single `BitVector::write` call accepts.
    while quotient >= 63 {
        vector.write(off, 63, !0u64);
        off += 63;
        quotient -= 63;
    }
    vector.write(off, (quotient + 1) as u8, !1u64);
    off += quotient + 1;
    vector.write(off, r, remainder);
    off += r as u64;

    off - offset
}

fn round_up_64(bits: u64) -> u64 {
    ((bits + 63) / 64) * 64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::XxHash64Seeded;

    #[test]
    fn build_four_single_byte_elements() {
        // Scenario S1.
        let mut builder = GcMapBuilder::<XxHash64Seeded>::new(4, 4);
        for e in [b"a", b"b", b"c", b"d"] {
            builder.insert(e).unwrap();
        }
        let map = builder.build(2).unwrap();

        let mut indices: Vec<u32> = [b"a", b"b", b"c", b"d"]
            .iter()
            .map(|e| map.query(e).expect("inserted element must be found"))
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn insert_rejects_past_capacity() {
        let mut builder = GcMapBuilder::<XxHash64Seeded>::new(1, 4);
        builder.insert(b"a").unwrap();
        assert!(builder.insert(b"b").is_err());
    }

    #[test]
    fn round_up_64_rounds_correctly() {
        assert_eq!(round_up_64(0), 0);
        assert_eq!(round_up_64(1), 64);
        assert_eq!(round_up_64(64), 64);
        assert_eq!(round_up_64(65), 128);
    }
}
