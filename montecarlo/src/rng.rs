//! Deterministic random streams for reproducible plays.
//!
//! A game owns one base seed. Every (play, die) pair gets its own `ChaCha8Rng`
//! keyed by an HMAC-SHA256 of the base seed and a domain tag, so dice never
//! share draws and replaying a seed reproduces every table.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::Sha256;

use crate::numbers::index_to_u64;

/// Source of per-die generators for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngStreams {
    seed: u64,
}

impl RngStreams {
    #[must_use]
    pub const fn from_user_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed drawn from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_user_seed(rand::random())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Generator for die `die` during play number `play`.
    #[must_use]
    pub fn die_stream(&self, play: u64, die: usize) -> ChaCha8Rng {
        let mut tag = Vec::with_capacity(24);
        tag.extend_from_slice(b"die-roll");
        tag.extend_from_slice(&play.to_le_bytes());
        tag.extend_from_slice(&index_to_u64(die).to_le_bytes());
        ChaCha8Rng::seed_from_u64(derive_stream_seed(self.seed, &tag))
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}
