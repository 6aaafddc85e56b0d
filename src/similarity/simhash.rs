//! 128-bit SimHash signatures.
//!
//! Every distinct token is hashed twice with 64-bit FNV-1a (once unseeded,
//! once seeded) to obtain 128 bits. Each bit position keeps a signed
//! accumulator that gains the token's count when the bit is set and loses it
//! otherwise; the signature bit is set when the accumulator is non-negative.

use crate::text::DocumentStatistics;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const HIGH_SEED: u64 = 0x9E37_79B1_85EB_CA87;

/// FNV-1a over `bytes`, with the offset basis XOR-ed by `seed`.
#[must_use]
pub fn fnv1a_64(bytes: &[u8], seed: u64) -> u64 {
    bytes.iter().fold(FNV_OFFSET ^ seed, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// A 128-bit SimHash signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SimHash128 {
    /// Bits 64..128, from the seeded hash.
    pub high: u64,
    /// Bits 0..64, from the unseeded hash.
    pub low: u64,
}

impl SimHash128 {
    /// Signature width in bits.
    pub const BITS: u32 = 128;

    /// Build the signature of a document.
    #[must_use]
    pub fn from_statistics(stats: &DocumentStatistics) -> Self {
        let mut weights = [0i64; 128];
        for (token, count) in stats.iter() {
            let low = fnv1a_64(token.as_bytes(), 0);
            let high = fnv1a_64(token.as_bytes(), HIGH_SEED);
            let weight = i64::try_from(count).unwrap_or(i64::MAX);
            accumulate(&mut weights[..64], low, weight);
            accumulate(&mut weights[64..], high, weight);
        }
        Self {
            low: collapse(&weights[..64]),
            high: collapse(&weights[64..]),
        }
    }

    /// Number of differing bits.
    #[must_use]
    pub fn hamming(&self, other: &Self) -> u32 {
        (self.low ^ other.low).count_ones() + (self.high ^ other.high).count_ones()
    }

    /// Fraction of differing bits, in [0, 1].
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        f64::from(self.hamming(other)) / f64::from(Self::BITS)
    }

    /// `1 - distance`, in [0, 1].
    #[must_use]
    pub fn similarity(&self, other: &Self) -> f64 {
        1.0 - self.distance(other)
    }
}

fn accumulate(weights: &mut [i64], hash: u64, weight: i64) {
    for (bit, acc) in weights.iter_mut().enumerate() {
        if hash & (1u64 << bit) != 0 {
            *acc = acc.saturating_add(weight);
        } else {
            *acc = acc.saturating_sub(weight);
        }
    }
}

fn collapse(weights: &[i64]) -> u64 {
    weights
        .iter()
        .enumerate()
        .filter(|(_, &acc)| acc >= 0)
        .fold(0u64, |out, (bit, _)| out | (1u64 << bit))
}
