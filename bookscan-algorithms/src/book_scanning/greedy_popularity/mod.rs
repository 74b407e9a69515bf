// Greedy allocation with a rarity-weighted book order fixed before the first pick.
use crate::book_scanning::{allocate, ranking, Availability, Evaluation, SelectionStrategy};
use anyhow::Result;
use bookscan_challenges::book_scanning::*;
use serde_json::{Map, Value};

pub fn help() {
    println!("Greedy allocation over a static rarity-weighted book order.");
    println!("Books are ranked once by score * (libraries - holders + 1) so that");
    println!("rare high-value books ship first. No hyperparameters.");
}

pub struct PopularityStrategy {
    orders: Vec<Vec<usize>>,
}

impl PopularityStrategy {
    pub fn new(challenge: &Challenge) -> Self {
        let popularity = ranking::popularity_histogram(challenge);
        let orders = challenge
            .libraries
            .iter()
            .map(|library| {
                ranking::by_popularity(
                    &library.books,
                    &challenge.scores,
                    &popularity,
                    challenge.num_libraries(),
                )
            })
            .collect();
        Self { orders }
    }

    pub fn order(&self, library: usize) -> &[usize] {
        &self.orders[library]
    }
}

impl SelectionStrategy for PopularityStrategy {
    fn name(&self) -> &'static str {
        "greedy_popularity"
    }

    fn evaluate(
        &self,
        challenge: &Challenge,
        library: usize,
        days_left: u32,
        availability: &Availability,
    ) -> Evaluation {
        let mut remaining = availability.available_books(&self.orders[library]);
        let count = challenge.libraries[library].shippable(days_left, remaining.len());
        let prefix = challenge.prefix_scores(&remaining);
        remaining.truncate(count);
        Evaluation {
            score: prefix[count],
            books: remaining,
        }
    }
}

pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    _hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let strategy = PopularityStrategy::new(challenge);
    let solution = allocate(challenge, &strategy);
    save_solution(&solution)
}
