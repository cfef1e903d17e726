//! Deterministic random streams for location generation.
//!
//! Every generated batch draws from its own ChaCha stream derived from the
//! master seed and the batch number, so a seeded session reproduces the same
//! ATMs for the same sequence of centers.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct RngManager {
    master_seed: u64,
    generation: u64,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master_seed: seed,
            generation: 0,
        }
    }

    /// Seeds from the thread-local generator for unseeded sessions.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Number of streams handed out so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stream for the next generated batch.
    pub fn next_stream(&mut self) -> GenerationRng {
        let seed = derive_seed(self.master_seed, self.generation);
        self.generation += 1;
        GenerationRng {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RngManager {
    fn default() -> Self {
        Self::new(42)
    }
}

fn derive_seed(master_seed: u64, generation: u64) -> u64 {
    let mut seed = master_seed;
    seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    seed ^= generation.wrapping_mul(69069);
    seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    seed
}

pub struct GenerationRng {
    inner: ChaCha8Rng,
}

impl RngCore for GenerationRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
