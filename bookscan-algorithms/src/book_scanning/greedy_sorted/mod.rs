// Greedy allocation over a descending-score order computed once per library.
// Filtering a sorted list keeps it sorted, so this scores exactly like
// greedy_exact without re-sorting on every pick.
use crate::book_scanning::{allocate, ranking, Availability, Evaluation, SelectionStrategy};
use anyhow::Result;
use bookscan_challenges::book_scanning::*;
use serde_json::{Map, Value};

pub fn help() {
    println!("Greedy allocation with exact marginal scores over a static");
    println!("descending-score order. Default algorithm. No hyperparameters.");
}

pub struct SortedStrategy {
    orders: Vec<Vec<usize>>,
}

impl SortedStrategy {
    pub fn new(challenge: &Challenge) -> Self {
        Self {
            orders: challenge
                .libraries
                .iter()
                .map(|library| ranking::by_descending_score(&library.books, &challenge.scores))
                .collect(),
        }
    }
}

impl SelectionStrategy for SortedStrategy {
    fn name(&self) -> &'static str {
        "greedy_sorted"
    }

    fn evaluate(
        &self,
        challenge: &Challenge,
        library: usize,
        days_left: u32,
        availability: &Availability,
    ) -> Evaluation {
        let capacity = challenge.libraries[library].capacity_within(days_left);
        let mut books = Vec::new();
        for &book in &self.orders[library] {
            if books.len() as u64 >= capacity {
                break;
            }
            if availability.is_available(book) {
                books.push(book);
            }
        }
        Evaluation {
            score: challenge.score_of(&books),
            books,
        }
    }
}

pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    _hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let strategy = SortedStrategy::new(challenge);
    let solution = allocate(challenge, &strategy);
    save_solution(&solution)
}
