// Exhaustive backtracking over signup orders.
//
// Each library always ships its top-k books by score. Books already shipped
// by libraries earlier on the branch are not excluded, so the nominal score
// tracked here can count a book twice. This keeps every node O(1) and is
// what makes the search tractable on small instances at all.
use crate::book_scanning::ranking;
use anyhow::{anyhow, Result};
use bookscan_challenges::book_scanning::*;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Hyperparameters {
    /// Maximum number of libraries signed up along any branch.
    pub max_depth: Option<usize>,
}

pub fn help() {
    println!("Exhaustive backtracking over library signup orders.");
    println!("Every strictly better (nominal) score is saved as soon as it is found.");
    println!("Exponential in the number of libraries: use on small instances.");
    println!("Hyperparameters (all optional):");
    println!("  max_depth: maximum number of libraries per branch (default unlimited).");
}

/// The accumulator of one search thread.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub solution: Solution,
    pub score: u64,
    pub best: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Read-only tables shared by every branch of the search.
pub struct SearchTree<'a> {
    challenge: &'a Challenge,
    // library indices, ascending signup time
    order: Vec<usize>,
    books: Vec<Vec<usize>>,
    prefix: Vec<Vec<u64>>,
    max_depth: Option<usize>,
}

impl<'a> SearchTree<'a> {
    pub fn new(challenge: &'a Challenge, max_depth: Option<usize>) -> Self {
        let mut order: Vec<usize> = (0..challenge.num_libraries()).collect();
        order.sort_by_key(|&l| challenge.libraries[l].signup_time);
        let books: Vec<Vec<usize>> = challenge
            .libraries
            .iter()
            .map(|library| ranking::by_descending_score(&library.books, &challenge.scores))
            .collect();
        let prefix = books.iter().map(|b| challenge.prefix_scores(b)).collect();
        Self {
            challenge,
            order,
            books,
            prefix,
            max_depth,
        }
    }

    fn feasible(&self, position: usize, days_left: u32) -> bool {
        self.challenge.libraries[self.order[position]].can_sign_up(days_left)
    }

    fn depth_reached(&self, depth: usize) -> bool {
        self.max_depth.map_or(false, |max_depth| depth >= max_depth)
    }

    /// Positions that can start a branch with the full day budget.
    pub fn top_level_branches(&self) -> Vec<usize> {
        if self.depth_reached(0) {
            return Vec::new();
        }
        (0..self.order.len())
            .take_while(|&p| self.feasible(p, self.challenge.num_days))
            .collect()
    }

    /// Tries every feasible library from `start` onwards. The order is sorted
    /// by signup time, so the first library that cannot sign up ends the scan.
    pub fn explore(
        &self,
        start: usize,
        days_left: u32,
        state: &mut SearchState,
        on_improvement: &mut dyn FnMut(u64, &Solution) -> Result<()>,
    ) -> Result<()> {
        if self.depth_reached(state.solution.len()) {
            return Ok(());
        }
        for position in start..self.order.len() {
            if !self.feasible(position, days_left) {
                break;
            }
            self.branch(position, days_left, state, on_improvement)?;
        }
        Ok(())
    }

    /// Signs up the library at `position`, explores everything after it and
    /// undoes the signup again.
    pub fn branch(
        &self,
        position: usize,
        days_left: u32,
        state: &mut SearchState,
        on_improvement: &mut dyn FnMut(u64, &Solution) -> Result<()>,
    ) -> Result<()> {
        let library = self.order[position];
        let signup_time = self.challenge.libraries[library].signup_time;
        let count = self.challenge.libraries[library]
            .shippable(days_left, self.books[library].len());
        let gained = self.prefix[library][count];

        state.solution.push(library, self.books[library][..count].to_vec());
        state.score += gained;
        if state.score > state.best {
            state.best = state.score;
            on_improvement(state.score, &state.solution)?;
        }

        self.explore(position + 1, days_left - signup_time, state, on_improvement)?;

        state.score -= gained;
        state
            .solution
            .pop()
            .ok_or_else(|| anyhow!("Search accumulator underflow"))?;
        Ok(())
    }
}

pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let hyperparameters = match hyperparameters {
        Some(hyperparameters) => {
            serde_json::from_value::<Hyperparameters>(Value::Object(hyperparameters.clone()))
                .map_err(|e| anyhow!("Failed to parse hyperparameters: {}", e))?
        }
        None => Hyperparameters::default(),
    };

    let tree = SearchTree::new(challenge, hyperparameters.max_depth);
    let mut state = SearchState::new();
    let mut improvements = 0usize;
    tree.explore(0, challenge.num_days, &mut state, &mut |score, solution| {
        improvements += 1;
        debug!(
            "brute_force: new best nominal score {} with {} libraries",
            score,
            solution.len()
        );
        save_solution(solution)
    })?;

    if improvements == 0 {
        save_solution(&Solution::new())?;
    }
    info!(
        "brute_force: search finished after {} improvements, best nominal score {}",
        improvements, state.best
    );
    Ok(())
}
