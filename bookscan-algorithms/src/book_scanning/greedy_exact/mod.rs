// Greedy allocation that re-sorts and simulates shipping for every library on every pick.
use crate::book_scanning::{allocate, ranking, Availability, Evaluation, SelectionStrategy};
use anyhow::Result;
use bookscan_challenges::book_scanning::*;
use serde_json::{Map, Value};

pub fn help() {
    println!("Greedy allocation with exact per-pick evaluation.");
    println!("Each evaluation drops shipped books, selection-sorts the rest by score");
    println!("and ships them day by day. Slow on large instances. No hyperparameters.");
}

pub struct ExactStrategy;

/// Ships `books` (best first) one day at a time after `library` signs up and
/// returns how many fit before the days run out.
pub fn simulate_shipping(library: &Library, days_left: u32, books: &[usize]) -> usize {
    let mut shipped = 0usize;
    if !library.can_sign_up(days_left) {
        return shipped;
    }
    for _day in library.signup_time..days_left {
        if shipped == books.len() {
            break;
        }
        shipped = (shipped + library.ship_capacity as usize).min(books.len());
    }
    shipped
}

impl SelectionStrategy for ExactStrategy {
    fn name(&self) -> &'static str {
        "greedy_exact"
    }

    fn evaluate(
        &self,
        challenge: &Challenge,
        library: usize,
        days_left: u32,
        availability: &Availability,
    ) -> Evaluation {
        let library = &challenge.libraries[library];
        let live = availability.available_books(&library.books);
        let mut sorted = ranking::selection_sorted(&live, &challenge.scores);
        let count = simulate_shipping(library, days_left, &sorted);
        sorted.truncate(count);
        Evaluation {
            score: challenge.score_of(&sorted),
            books: sorted,
        }
    }
}

pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    _hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let solution = allocate(challenge, &ExactStrategy);
    save_solution(&solution)
}
