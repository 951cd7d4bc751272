/// Linear congruential recurrence constants
const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233280;

/// Deterministic random source seeded from arbitrary text.
///
/// Every random draw in a session goes through one instance of this type:
/// noise seeding, particle placement, color and alpha selection. Two
/// instances built from the same seed yield the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    pub fn new(seed: &str) -> Self {
        Self {
            state: hash(seed) as u64,
        }
    }

    /// Advance the state and return a value in [0, 1)
    pub fn next(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Uniform value in [min, max)
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        self.next() * (max - min) + min
    }

    /// Current internal state (for inspection and tests)
    pub fn state(&self) -> u64 {
        self.state
    }
}

/// Hash a seed string into the initial generator state.
///
/// Accumulates `hash * 31 + unit` over the UTF-16 code units with 32-bit
/// two's-complement wrapping, then takes the absolute value. `i32::MIN`
/// maps to 2147483648, hence the unsigned result.
pub fn hash(seed: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in seed.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}
