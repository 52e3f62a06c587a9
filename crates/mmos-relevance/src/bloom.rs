//! Bloom filter with double hashing over xxh3.

use xxhash_rust::xxh3::xxh3_64_with_seed;

const SEED_PRIMARY: u64 = 0;
const SEED_SECONDARY: u64 = 0x9E37_79B9_7F4A_7C15;

/// Probabilistic set membership. No false negatives; false positives at
/// roughly the configured rate once `expected_items` keys are inserted.
#[derive(Debug, Clone)]
pub struct BloomFilter {
    bits: Vec<u64>,
    num_bits: u64,
    num_hashes: u32,
    items: usize,
}

impl BloomFilter {
    /// Size the filter for `expected_items` at `fp_rate`:
    /// `m = -n ln p / (ln 2)^2`, `k = (m / n) ln 2`.
    pub fn with_rate(expected_items: usize, fp_rate: f64) -> Self {
        let num_bits = Self::optimal_num_bits(expected_items, fp_rate);
        let num_hashes = Self::optimal_num_hashes(num_bits, expected_items);
        Self {
            bits: vec![0; num_bits.div_ceil(64) as usize],
            num_bits,
            num_hashes,
            items: 0,
        }
    }

    pub fn optimal_num_bits(expected_items: usize, fp_rate: f64) -> u64 {
        let n = expected_items.max(1) as f64;
        let p = fp_rate.clamp(f64::MIN_POSITIVE, 0.999_999);
        let m = (-n * p.ln() / (std::f64::consts::LN_2 * std::f64::consts::LN_2)).ceil();
        (m as u64).max(64)
    }

    pub fn optimal_num_hashes(num_bits: u64, expected_items: usize) -> u32 {
        let n = expected_items.max(1) as f64;
        let k = (num_bits as f64 / n * std::f64::consts::LN_2).round();
        (k as u32).max(1)
    }

    pub fn insert(&mut self, key: &[u8]) {
        let (h1, h2) = Self::hashes(key);
        for i in 0..self.num_hashes as u64 {
            let bit = h1.wrapping_add(i.wrapping_mul(h2)) % self.num_bits;
            self.bits[(bit / 64) as usize] |= 1u64 << (bit % 64);
        }
        self.items += 1;
    }

    pub fn might_contain(&self, key: &[u8]) -> bool {
        let (h1, h2) = Self::hashes(key);
        (0..self.num_hashes as u64).all(|i| {
            let bit = h1.wrapping_add(i.wrapping_mul(h2)) % self.num_bits;
            self.bits[(bit / 64) as usize] & (1u64 << (bit % 64)) != 0
        })
    }

    fn hashes(key: &[u8]) -> (u64, u64) {
        let h1 = xxh3_64_with_seed(key, SEED_PRIMARY);
        // Odd step so probes never collapse onto one bit.
        let h2 = xxh3_64_with_seed(key, SEED_SECONDARY) | 1;
        (h1, h2)
    }

    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Keys inserted so far, counting duplicates.
    pub fn len(&self) -> usize {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Expected false-positive rate at the current fill:
    /// `(1 - e^(-k n / m))^k`.
    pub fn estimated_fp_rate(&self) -> f64 {
        let k = self.num_hashes as f64;
        let exponent = -k * self.items as f64 / self.num_bits as f64;
        (1.0 - exponent.exp()).powf(k)
    }
}
