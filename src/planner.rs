//! Parameter planning: given `N` and a requested `1/p`, round `p` up to a
//! power of two and derive the remainder width, hash universe, bin count
//! and bin divisor used by the builder and by queries.

use crate::GcmError;

/// Derived, validated parameters for one `GcMap` construction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Params {
    /// Rounded-up error rate, a power of two `>= 2`.
    pub(crate) error_rate: u64,
    /// `r = log2(error_rate)`.
    pub(crate) remainder_size: u8,
    /// `U = element_count * error_rate`.
    pub(crate) universe: u64,
    /// `D`, the hash-universe span covered by each bin.
    pub(crate) element_divisor: u64,
    /// `T`, the number of bins.
    pub(crate) table_size: u32,
    pub(crate) element_count: u32,
}

impl Params {
    pub(crate) fn new(
        element_count: u32,
        requested_rate: u64,
        table_size: u32,
    ) -> Result<Params, GcmError> {
        if element_count == 0 {
            return Err(GcmError::BadArguments("element_count must be non-zero"));
        }
        if table_size == 0 {
            return Err(GcmError::BadArguments("table_size must be non-zero"));
        }
        if requested_rate < 2 {
            return Err(GcmError::BadArguments("error_rate must be at least 2"));
        }
        // Tightened from the reference `table_size > element_count - 1`
        // (which permits table_size == element_count - 1): scenario S4
        // (N=2, T=1 rejected) only holds under table_size <= element_count - 2.
        // See DESIGN.md for the reasoning.
        if (table_size as u64) >= (element_count as u64).saturating_sub(1) {
            return Err(GcmError::BadArguments(
                "table_size must be at most element_count - 2",
            ));
        }
        if bsr64(requested_rate) > 63 {
            return Err(GcmError::BadArguments("error_rate is too large"));
        }

        // Round error_rate up to the next power of two: error_rate =
        // 2^ceil(log2(requested_rate)). bsr64(requested_rate - 1) is the
        // reference's `__bsr(error_rate - 1)` (requested_rate > 1 here, so
        // requested_rate - 1 is never negative).
        let remainder_size = bsr64(requested_rate - 1) as u8;
        let error_rate = 1u64
            .checked_shl(remainder_size as u32)
            .ok_or(GcmError::BadArguments("error_rate is too large"))?;

        let universe = (element_count as u64)
            .checked_mul(error_rate)
            .ok_or(GcmError::BadArguments("element_count * error_rate overflows"))?;

        // D = ceil(U / T), resolving spec.md's open question about the
        // reference's `p*N/T` + `mod T` formula.
        let t = table_size as u64;
        let element_divisor = (universe + t - 1) / t;

        Ok(Params {
            error_rate,
            remainder_size,
            universe,
            element_divisor,
            table_size,
            element_count,
        })
    }

    pub(crate) fn bin_of(&self, hash: u64) -> u32 {
        (hash / self.element_divisor) as u32
    }
}

#[inline]
fn bsr64(x: u64) -> u32 {
    64 - x.leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_p_up_to_power_of_two() {
        // Property 6 / scenario S3: p in {3, 5, 7} -> {4, 8, 8}, r in {2, 3, 3}.
        let cases = [(3u64, 4u64, 2u8), (5, 8, 3), (7, 8, 3)];
        for (requested, expected_p, expected_r) in cases {
            let params = Params::new(100, requested, 4).unwrap();
            assert_eq!(params.error_rate, expected_p);
            assert_eq!(params.remainder_size, expected_r);
        }
    }

    #[test]
    fn already_power_of_two_is_unchanged() {
        let params = Params::new(100, 256, 4).unwrap();
        assert_eq!(params.error_rate, 256);
        assert_eq!(params.remainder_size, 8);
    }

    #[test]
    fn rejects_n_2_t_1() {
        // Scenario S4.
        assert!(Params::new(2, 4, 1).is_err());
    }

    #[test]
    fn rejects_small_error_rate() {
        assert!(Params::new(10, 1, 2).is_err());
        assert!(Params::new(10, 0, 2).is_err());
    }

    #[test]
    fn rejects_zero_element_count_or_table_size() {
        assert!(Params::new(0, 4, 1).is_err());
        assert!(Params::new(10, 4, 0).is_err());
    }

    #[test]
    fn divisor_keeps_max_bin_in_range() {
        for &(n, p, t) in &[(1000u32, 256u64, 64u32), (7u32, 4u64, 2u32), (999983u32, 1024u64, 997u32)] {
            let params = Params::new(n, p, t).unwrap();
            let max_hash = params.universe - 1;
            let max_bin = params.bin_of(max_hash);
            assert!(
                (max_bin as u32) < params.table_size,
                "max hash {} fell in bin {} >= table_size {}",
                max_hash,
                max_bin,
                params.table_size
            );
        }
    }
}
