//! Strategies for the book scanning challenge.
//!
//! Every algorithm module exposes the same entry point:
//!
//! ```ignore
//! pub fn solve_challenge(
//!     challenge: &Challenge,
//!     save_solution: &dyn Fn(&Solution) -> Result<()>,
//!     hyperparameters: &Option<Map<String, Value>>,
//! ) -> Result<()>
//! ```
//!
//! `save_solution` is called with every solution worth persisting. The
//! exhaustive searches call it on each strict improvement, the greedy
//! allocators once with their final result.

mod allocator;
mod availability;
pub mod ranking;

pub mod brute_force;
pub mod brute_force_parallel;
pub mod greedy_exact;
pub mod greedy_popularity;
pub mod greedy_sorted;

pub use allocator::{allocate, Evaluation, Pick, SelectionStrategy};
pub use availability::Availability;

use anyhow::{anyhow, Result};
use bookscan_challenges::book_scanning::{Challenge, Solution};
use serde_json::{Map, Value};

pub type SolveFn = fn(
    &Challenge,
    &dyn Fn(&Solution) -> Result<()>,
    &Option<Map<String, Value>>,
) -> Result<()>;

pub struct AlgorithmEntry {
    pub name: &'static str,
    pub description: &'static str,
    /// Whether every improvement should also be kept as a checkpoint file.
    pub checkpoints: bool,
    pub solve: SolveFn,
    pub help: fn(),
}

impl std::fmt::Debug for AlgorithmEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmEntry")
            .field("name", &self.name)
            .field("checkpoints", &self.checkpoints)
            .finish()
    }
}

pub const DEFAULT_ALGORITHM: &str = "greedy_sorted";

pub const ALGORITHMS: &[AlgorithmEntry] = &[
    AlgorithmEntry {
        name: "brute_force",
        description: "Exhaustive backtracking over signup orders, checkpointing every improvement",
        checkpoints: true,
        solve: brute_force::solve_challenge,
        help: brute_force::help,
    },
    AlgorithmEntry {
        name: "brute_force_parallel",
        description: "Exhaustive backtracking with one worker task per top-level branch",
        checkpoints: true,
        solve: brute_force_parallel::solve_challenge,
        help: brute_force_parallel::help,
    },
    AlgorithmEntry {
        name: "greedy_popularity",
        description: "Greedy allocation over a static rarity-weighted book order",
        checkpoints: false,
        solve: greedy_popularity::solve_challenge,
        help: greedy_popularity::help,
    },
    AlgorithmEntry {
        name: "greedy_exact",
        description: "Greedy allocation re-sorting and simulating every library on every pick",
        checkpoints: false,
        solve: greedy_exact::solve_challenge,
        help: greedy_exact::help,
    },
    AlgorithmEntry {
        name: "greedy_sorted",
        description: "Greedy allocation over a static descending-score order (exact marginal score)",
        checkpoints: false,
        solve: greedy_sorted::solve_challenge,
        help: greedy_sorted::help,
    },
];

pub fn find(name: &str) -> Option<&'static AlgorithmEntry> {
    ALGORITHMS.iter().find(|entry| entry.name == name)
}

pub fn names() -> Vec<&'static str> {
    ALGORITHMS.iter().map(|entry| entry.name).collect()
}

pub fn solve_challenge(
    algorithm: &str,
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let entry = find(algorithm).ok_or_else(|| {
        anyhow!(
            "Unknown algorithm '{}'. Available: {}",
            algorithm,
            names().join(", ")
        )
    })?;
    (entry.solve)(challenge, save_solution, hyperparameters)
}
