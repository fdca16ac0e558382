//! Membership Filter Module
//!
//! Fixed-size Bloom filter recording which keys have been requested before.

use std::f64::consts::LN_2;
use std::hash::Hash;

use ahash::RandomState;

use crate::error::GatewayError;

// == Constants ==
/// Smallest bit array ever allocated, one word.
const MIN_BITS: usize = 64;

// Fixed seeds keep bit positions stable from run to run.
const PRIMARY_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];
const SECONDARY_SEEDS: [u64; 4] = [
    0x4528_21e6_38d0_1377,
    0xbe54_66cf_34e9_0c6c,
    0xc0ac_29b7_c97c_50dd,
    0x3f84_d5b5_b547_0917,
];

// == Membership Filter ==
/// Probabilistic set with no false negatives and a bounded false-positive rate.
///
/// Sized once at construction from the expected number of elements and the
/// target error rate; never resized and never cleared.
#[derive(Debug, Clone)]
pub struct MembershipFilter {
    /// Bit array packed into 64-bit words
    words: Vec<u64>,
    /// Number of addressable bits
    num_bits: usize,
    /// Number of bit positions set per key
    num_hashes: u32,
    /// Expected element count the filter was sized for
    expected_items: usize,
    /// Target false-positive probability
    error_rate: f64,
    primary: RandomState,
    secondary: RandomState,
}

impl MembershipFilter {
    // == Constructor ==
    /// Creates a filter sized for `expected_items` keys at `error_rate`.
    ///
    /// # Arguments
    /// * `expected_items` - Number of distinct keys the filter should absorb
    /// * `error_rate` - Target false-positive probability, in (0, 1)
    pub fn new(expected_items: usize, error_rate: f64) -> Result<Self, GatewayError> {
        if expected_items == 0 {
            return Err(GatewayError::InvalidFilterSize(expected_items));
        }
        if !error_rate.is_finite() || error_rate <= 0.0 || error_rate >= 1.0 {
            return Err(GatewayError::InvalidErrorRate(error_rate));
        }

        let too_large = GatewayError::FilterTooLarge(expected_items);
        let (num_bits, num_hashes) =
            optimal_parameters(expected_items, error_rate).ok_or(too_large.clone())?;
        let words = allocate_words(num_bits).ok_or(too_large)?;
        let [a, b, c, d] = PRIMARY_SEEDS;
        let [e, f, g, h] = SECONDARY_SEEDS;

        Ok(Self {
            words,
            num_bits,
            num_hashes,
            expected_items,
            error_rate,
            primary: RandomState::with_seeds(a, b, c, d),
            secondary: RandomState::with_seeds(e, f, g, h),
        })
    }

    // == Insert ==
    /// Records a key. Inserting the same key again changes nothing.
    pub fn insert<K: Hash + ?Sized>(&mut self, key: &K) {
        let (h1, h2) = self.hash_pair(key);
        for i in 0..self.num_hashes {
            let bit = self.bit_index(h1, h2, i);
            self.words[bit / 64] |= 1u64 << (bit % 64);
        }
    }

    // == Might Contain ==
    /// Returns true if the key may have been inserted.
    ///
    /// Always true for inserted keys; true for other keys with probability
    /// bounded by the configured error rate.
    pub fn might_contain<K: Hash + ?Sized>(&self, key: &K) -> bool {
        let (h1, h2) = self.hash_pair(key);
        (0..self.num_hashes).all(|i| {
            let bit = self.bit_index(h1, h2, i);
            self.words[bit / 64] & (1u64 << (bit % 64)) != 0
        })
    }

    /// Number of bits in the filter.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Number of bit positions set per key.
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    pub fn expected_items(&self) -> usize {
        self.expected_items
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Number of bits currently set.
    pub fn bits_set(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    // == Estimated False Positive Rate ==
    /// Probability that an unseen key passes, given the current fill level.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let fill = self.bits_set() as f64 / self.num_bits as f64;
        fill.powi(self.num_hashes as i32)
    }

    fn hash_pair<K: Hash + ?Sized>(&self, key: &K) -> (u64, u64) {
        // Second hash forced nonzero so successive positions move
        (self.primary.hash_one(key), self.secondary.hash_one(key) | 1)
    }

    fn bit_index(&self, h1: u64, h2: u64, i: u32) -> usize {
        (h1.wrapping_add(h2.wrapping_mul(u64::from(i))) % self.num_bits as u64) as usize
    }
}

// == Sizing ==
/// Standard Bloom sizing: m = -n ln(p) / (ln 2)^2, k = (m / n) ln 2.
///
/// Returns None when m does not fit in a `usize`.
fn optimal_parameters(expected_items: usize, error_rate: f64) -> Option<(usize, u32)> {
    let n = expected_items as f64;
    let bits = (-n * error_rate.ln() / (LN_2 * LN_2)).ceil();
    if !bits.is_finite() || bits >= usize::MAX as f64 {
        return None;
    }
    let num_bits = (bits as usize).max(MIN_BITS);
    let num_hashes = ((num_bits as f64 / n) * LN_2).round().max(1.0) as u32;
    Some((num_bits, num_hashes))
}

/// Zeroed bit array, or None if the allocator refuses it.
fn allocate_words(num_bits: usize) -> Option<Vec<u64>> {
    let len = num_bits.div_ceil(64);
    let mut words = Vec::new();
    words.try_reserve_exact(len).ok()?;
    words.resize(len, 0);
    Some(words)
}
