//! Hash mixing and capacity arithmetic shared by every table variant
//!
//! Placement quality is decided here: the engine masks a mixed hash down to a
//! power-of-two capacity, so the mix must spread entropy into the low bits
//! even when the key's native hash is poor (sequential integers, pointer-like
//! values). Two mixing strategies are provided:
//!
//! - [`mix_hash`]: a fixed bit-rotation XOR with no per-instance state
//! - [`multiply_mix`]: multiplication by a curated odd constant, rotated per
//!   table growth to decouple placement from any one observable schedule

/// Fixed bit-rotation mix: `h ^ rotl(h, 9) ^ rotl(h, 21)`
///
/// Folds high-order entropy into the low bits that index masking keeps. The
/// rotation amounts are coprime to 64, so every input bit influences several
/// output positions.
#[inline]
pub fn mix_hash(h: u64) -> u64 {
    h ^ h.rotate_left(9) ^ h.rotate_left(21)
}

/// Curated odd multiplicative constants with well-distributed bit patterns.
///
/// Drawn from the splitmix64/xxhash/murmur3 finalizer families; all odd, so
/// multiplication modulo 2^64 is a bijection and no two distinct hashes can
/// be forced to collide by the multiply alone.
pub const MULTIPLIERS: &[u64] = &[
    0x9e37_79b9_7f4a_7c15,
    0xbf58_476d_1ce4_e5b9,
    0x94d0_49bb_1331_11eb,
    0xc2b2_ae3d_27d4_eb4f,
    0x9e37_79b1_85eb_ca87,
    0x1656_67b1_9e37_79f9,
    0x27d4_eb2f_1656_67c5,
    0xff51_afd7_ed55_8ccd,
    0xc4ce_b9fe_1a85_ec53,
    0x2545_f491_4f6c_dd1d,
    0xd6e8_feb8_6659_fd93,
    0xa24b_aed4_963e_e407,
];

/// Multiplicative mix with the high product half folded into the low.
///
/// The low bits of `h * m` alone do not depend on the high bits of `h`;
/// XOR-folding the upper half restores full-width avalanche before masking.
#[inline]
pub fn multiply_mix(h: u64, multiplier: u64) -> u64 {
    let p = h.wrapping_mul(multiplier);
    p ^ (p >> 32)
}

/// Smallest power-of-two capacity able to hold `len` entries at `load_factor`
///
/// The result always leaves at least one empty slot, preserving the probe
/// termination invariant `count < capacity`.
pub fn capacity_for(len: usize, load_factor: f64) -> usize {
    let mut cap = MIN_CAPACITY;
    while threshold_for(cap, load_factor) < len {
        cap = cap
            .checked_mul(2)
            .expect("capacity overflow while sizing table");
    }
    cap
}

/// Round a requested capacity up to the next power of two, at least [`MIN_CAPACITY`]
pub fn optimal_capacity(requested: usize) -> usize {
    requested.max(MIN_CAPACITY).next_power_of_two()
}

/// Growth trigger for a table of `capacity` slots at `load_factor`
///
/// Clamped to `capacity - 1` so a full-to-threshold table still has an empty
/// slot for probes to terminate on, even at load factor 1.0.
pub fn threshold_for(capacity: usize, load_factor: f64) -> usize {
    let raw = (capacity as f64 * load_factor) as usize;
    raw.min(capacity - 1)
}

/// Smallest capacity any table will allocate
pub const MIN_CAPACITY: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_hash_deterministic() {
        assert_eq!(mix_hash(0x1234_5678), mix_hash(0x1234_5678));
        assert_ne!(mix_hash(1), mix_hash(2));
    }

    #[test]
    fn test_mix_hash_spreads_high_bits() {
        // Keys differing only in the top byte must differ in the low bits
        // that capacity masking keeps.
        let a = mix_hash(0x0100_0000_0000_0000) & 0xfff;
        let b = mix_hash(0x0200_0000_0000_0000) & 0xfff;
        assert_ne!(a, b);
    }

    #[test]
    fn test_multipliers_all_odd() {
        for &m in MULTIPLIERS {
            assert_eq!(m & 1, 1, "multiplier {:#x} must be odd", m);
        }
    }

    #[test]
    fn test_multiply_mix_varies_by_constant() {
        let h = 0xdead_beef_u64;
        let outputs: Vec<u64> = MULTIPLIERS.iter().map(|&m| multiply_mix(h, m)).collect();
        for (i, &a) in outputs.iter().enumerate() {
            for &b in &outputs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_capacity_for_leaves_slack() {
        for &len in &[0usize, 1, 3, 4, 7, 100, 1000] {
            for &f in &[0.5, 0.75, 0.9, 1.0] {
                let cap = capacity_for(len, f);
                assert!(cap.is_power_of_two());
                assert!(threshold_for(cap, f) >= len);
                assert!(threshold_for(cap, f) < cap);
            }
        }
    }

    #[test]
    fn test_optimal_capacity() {
        assert_eq!(optimal_capacity(0), MIN_CAPACITY);
        assert_eq!(optimal_capacity(4), 4);
        assert_eq!(optimal_capacity(5), 8);
        assert_eq!(optimal_capacity(100), 128);
    }

    #[test]
    fn test_threshold_clamped_below_capacity() {
        assert_eq!(threshold_for(4, 1.0), 3);
        assert_eq!(threshold_for(8, 0.75), 6);
        assert_eq!(threshold_for(1024, 0.5), 512);
    }
}
