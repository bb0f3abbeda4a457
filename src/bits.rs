//! Branchless bit primitives used by the board and the tile spawner.
//!
//! On x86_64 builds with BMI2 enabled these compile down to `pext`/`pdep`.
//! Everywhere else (or with the `portable-bits` feature) a short bit loop
//! computes the same result, so callers and tests see one interface.

#[cfg(all(
    target_arch = "x86_64",
    target_feature = "bmi2",
    not(feature = "portable-bits")
))]
mod imp {
    use core::arch::x86_64::{_pdep_u64, _pext_u64};

    #[inline(always)]
    #[allow(unused_unsafe)]
    pub fn pext(value: u64, mask: u64) -> u64 {
        // SAFETY: this module is only compiled when bmi2 is a target feature.
        unsafe { _pext_u64(value, mask) }
    }

    #[inline(always)]
    #[allow(unused_unsafe)]
    pub fn select(mask: u64, n: u32) -> u32 {
        debug_assert!(n < u64::BITS);
        // SAFETY: as above.
        let isolated = unsafe { _pdep_u64(1u64 << n, mask) };
        isolated.trailing_zeros()
    }
}

#[cfg(not(all(
    target_arch = "x86_64",
    target_feature = "bmi2",
    not(feature = "portable-bits")
)))]
mod imp {
    #[inline]
    pub fn pext(value: u64, mut mask: u64) -> u64 {
        let mut out = 0u64;
        let mut bit = 0u32;
        while mask != 0 {
            let lowest = mask & mask.wrapping_neg();
            if value & lowest != 0 {
                out |= 1 << bit;
            }
            bit += 1;
            mask &= mask - 1;
        }
        out
    }

    #[inline]
    pub fn select(mut mask: u64, n: u32) -> u32 {
        debug_assert!(n < u64::BITS);
        for _ in 0..n {
            mask &= mask.wrapping_sub(1);
        }
        mask.trailing_zeros()
    }
}

/// Gather the bits of `value` selected by `mask` into the low bits of the result.
pub use imp::pext;

/// Bit position of the `n`-th (0-based) set bit of `mask`, or 64 if there are
/// fewer than `n + 1` set bits.
pub use imp::select;

/// Number of set bits.
#[inline(always)]
pub fn popcount(x: u64) -> u32 {
    x.count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_bits(mask: u64) -> Vec<u32> {
        (0..64).filter(|b| mask >> b & 1 == 1).collect()
    }

    #[test]
    fn test_pext_gathers_nibble_lsbs() {
        let mask = 0x1111_1111_1111_1111;
        assert_eq!(pext(0, mask), 0);
        assert_eq!(pext(mask, mask), 0xFFFF);
        assert_eq!(pext(0x0000_0000_0000_0001, mask), 0b1);
        assert_eq!(pext(0x1000_0000_0000_0010, mask), 0b1000_0000_0000_0010);
        // Bits outside the mask are dropped.
        assert_eq!(pext(0xEEEE_EEEE_EEEE_EEEE, mask), 0);
    }

    #[test]
    fn test_select_matches_enumeration() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let mask = rng.u64(..);
            let bits = set_bits(mask);
            for (n, &pos) in bits.iter().enumerate() {
                assert_eq!(select(mask, n as u32), pos, "mask {mask:#x} n {n}");
            }
            if bits.len() < 64 {
                assert_eq!(select(mask, bits.len() as u32), 64);
            }
        }
    }

    #[test]
    fn test_popcount() {
        assert_eq!(popcount(0), 0);
        assert_eq!(popcount(0x1111_1111_1111_1111), 16);
        assert_eq!(popcount(u64::MAX), 64);
    }
}
