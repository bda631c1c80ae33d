//! Global execution context: active difficulty, chapter, verbosity and the
//! shared RNG (spec.md §3 "Global state", threaded explicitly per spec.md
//! §9's design note rather than held in module statics).

use ecl_asm::RankMask;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The four difficulties, encoded as the low-nibble bit each one occupies
/// in an instruction's `rank_mask` (`LHNE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, clap::ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Bit `0x1`.
    Easy = 0b0001,
    /// Bit `0x2`.
    Normal = 0b0010,
    /// Bit `0x4`.
    Hard = 0b0100,
    /// Bit `0x8`.
    Lunatic = 0b1000,
}

impl Difficulty {
    /// The bitmask this difficulty occupies in a `rank_mask`.
    pub fn mask(self) -> RankMask {
        RankMask::from_bits_truncate(self as u8)
    }

    /// The `DIFF` built-in's numeric value: `0/1/2/3` for
    /// Easy/Normal/Hard/Lunatic.
    pub const fn ordinal(self) -> i32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
            Difficulty::Lunatic => 3,
        }
    }
}

/// Mutable global state shared read/write across all tasks. Safe without
/// locking because the scheduler runs strictly one task at a time
/// (spec.md §5).
pub struct ExecutionContext {
    /// The active difficulty, gating which instructions execute.
    pub difficulty: Difficulty,
    /// Set by `SETCHAPTER`; otherwise inert bookkeeping.
    pub chapter: u32,
    /// When true, per-instruction execution is traced via `tracing`.
    pub verbose: bool,
    rng: StdRng,
}

impl ExecutionContext {
    /// Build a context seeded explicitly, for deterministic runs (tests, or
    /// the CLI's `--seed`).
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        ExecutionContext {
            difficulty,
            chapter: 0,
            verbose: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Next pseudo-random `i32`, backing the `RAND` built-in.
    pub fn rand_i32(&mut self) -> i32 {
        self.rng.gen()
    }

    /// Uniform `f32` in `[0, 1)`, backing the `RANDF` built-in.
    pub fn rand_f32(&mut self) -> f32 {
        self.rng.gen_range(0.0..1.0)
    }
}
