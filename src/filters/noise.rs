//! Uniform noise.
//!
//! Noise is deterministic: every application draws a seed from a per-filter
//! atomic counter and feeds it to a small LCG, so a fresh filter produces
//! the same sequence of results on every run while consecutive applications
//! still differ.
//!
//! ## Supported Formats
//!
//! RGB `f32` images of shape (height, width, 3), values 0.0-1.0. Each value
//! receives an independent sample.

use std::sync::atomic::{AtomicU64, Ordering};

use super::core::Image;
use super::Adjustment;

// ============================================================================
// Simple RNG (deterministic for repeatable output)
// ============================================================================

/// Simple linear congruential generator for deterministic noise.
/// Uses MINSTD parameters.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng {
            state: seed.wrapping_add(1), // Avoid zero
        }
    }

    /// Generate next random u32.
    fn next_u32(&mut self) -> u32 {
        // MINSTD LCG
        self.state = self.state.wrapping_mul(48271).wrapping_add(1) % 2147483647;
        self.state as u32
    }

    /// Generate uniform random f32 in [0, 1).
    fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f32) / (2147483647.0f32)
    }
}

// ============================================================================
// Noise
// ============================================================================

/// Add uniform noise in `[-amount, amount)` to every value.
#[derive(Debug)]
pub struct Noise {
    amount: f32,
    next_seed: AtomicU64,
}

impl Noise {
    /// # Arguments
    /// * `adjust` - 0..100, the noise amplitude in percent. The sign is ignored.
    pub fn new(adjust: f32) -> Self {
        Self::with_seed(adjust, 0)
    }

    /// Same as [`Noise::new`], starting the seed counter at `seed`.
    pub fn with_seed(adjust: f32, seed: u64) -> Self {
        Self {
            amount: adjust.abs() * 0.01,
            next_seed: AtomicU64::new(seed),
        }
    }
}

impl Adjustment for Noise {
    fn process(&self, image: &mut Image) {
        let seed = self.next_seed.fetch_add(1, Ordering::Relaxed);
        let mut rng = SimpleRng::new(seed);
        let amount = self.amount;

        for v in image.iter_mut() {
            *v += rng.next_f32() * 2.0 * amount - amount;
        }
    }
}
