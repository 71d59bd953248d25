//! Deterministic random numbers seeded from a string
//!
//! The seed string is folded into four 32-bit words by a streaming
//! multiplicative hash, and those words initialize a small-fast-counter
//! generator with four 32-bit registers. Every operation is a wrapping
//! `u32` operation, so a given seed produces the same stream on every
//! platform and in every implementation that follows the same recipe.

/// Streaming string hash that yields a fresh 32-bit word per call
struct SeedHasher {
    state: u32,
}

impl SeedHasher {
    fn new(seed: &str) -> Self {
        let units: Vec<u16> = seed.encode_utf16().collect();
        let mut h = 1_779_033_703_u32 ^ units.len() as u32;
        for unit in units {
            h = (h ^ u32::from(unit)).wrapping_mul(3_432_918_353);
            h = h.rotate_left(13);
        }
        Self { state: h }
    }

    /// Avalanche the running state and return it
    fn next_word(&mut self) -> u32 {
        let mut h = self.state;
        h = (h ^ (h >> 16)).wrapping_mul(2_246_822_507);
        h = (h ^ (h >> 13)).wrapping_mul(3_266_489_909);
        h ^= h >> 16;
        self.state = h;
        h
    }
}

/// Seeded pseudo-random source
///
/// There is no global generator: every stage that needs randomness takes a
/// `&mut SeededRandom`, which fixes the order in which draws are consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
}

impl SeededRandom {
    /// Create a generator from a seed string
    pub fn new(seed: &str) -> Self {
        let mut hasher = SeedHasher::new(seed);
        let a = hasher.next_word();
        let b = hasher.next_word();
        let c = hasher.next_word();
        let d = hasher.next_word();
        Self { a, b, c, d }
    }

    /// Advance the generator and return one raw 32-bit word
    pub fn next_u32(&mut self) -> u32 {
        let mut t = self.a.wrapping_add(self.b);
        self.a = self.b ^ (self.b >> 9);
        self.b = self.c.wrapping_add(self.c << 3);
        self.c = self.c.rotate_left(21);
        self.d = self.d.wrapping_add(1);
        t = t.wrapping_add(self.d);
        self.c = self.c.wrapping_add(t);
        t
    }

    /// Uniform value in `[0, 1)`
    pub fn random(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Uniform value in `[min, max)`
    pub fn random_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.random() * (max - min)
    }

    /// Uniform integer in `[min, max]` (both ends inclusive)
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1) as f64;
        min + (self.random() * span).floor() as i64
    }

    /// Pick one element of a slice; `None` only when the slice is empty
    pub fn random_choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.random() * items.len() as f64).floor() as usize;
        items.get(index.min(items.len() - 1))
    }

    /// `true` with probability `p`
    ///
    /// Always `false` at `p = 0` and always `true` at `p = 1`.
    pub fn random_chance(&mut self, p: f64) -> bool {
        self.random() < p
    }
}
