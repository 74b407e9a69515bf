mod parse;
mod solution;
pub use parse::ParseError;
pub use solution::{Shipment, Solution};

use anyhow::{anyhow, Context, Result};
use rand::{
    rngs::{SmallRng, StdRng},
    Rng, SeedableRng,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path, str::FromStr};

const MAX_BOOK_SCORE: u32 = 1000;
const MAX_SHIP_CAPACITY: u32 = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub books: usize,
    pub libraries: usize,
    pub days: u32,
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "books={},libraries={},days={}",
            self.books, self.libraries, self.days
        )
    }
}

impl FromStr for Track {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut books = None;
        let mut libraries = None;
        let mut days = None;
        for entry in s.split(',').filter(|e| !e.trim().is_empty()) {
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid track entry '{}', expected key=value", entry))?;
            let value = value.trim();
            match key.trim() {
                "books" => books = Some(value.parse::<usize>()?),
                "libraries" => libraries = Some(value.parse::<usize>()?),
                "days" => days = Some(value.parse::<u32>()?),
                other => return Err(anyhow!("Unknown track key: {}", other)),
            }
        }
        Ok(Track {
            books: books.ok_or_else(|| anyhow!("Track is missing 'books'"))?,
            libraries: libraries.ok_or_else(|| anyhow!("Track is missing 'libraries'"))?,
            days: days.ok_or_else(|| anyhow!("Track is missing 'days'"))?,
        })
    }
}

/// A library as read from the input file. `books` keeps input order; every
/// reordering is computed beside it and never written back.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Library {
    pub id: usize,
    pub books: Vec<usize>,
    pub signup_time: u32,
    pub ship_capacity: u32,
}

impl Library {
    pub fn can_sign_up(&self, days_left: u32) -> bool {
        self.signup_time < days_left
    }

    /// Number of books this library could ship if its signup started with
    /// `days_left` days remaining.
    pub fn capacity_within(&self, days_left: u32) -> u64 {
        if !self.can_sign_up(days_left) {
            return 0;
        }
        (days_left - self.signup_time) as u64 * self.ship_capacity as u64
    }

    /// `capacity_within` capped by the number of books still worth shipping.
    pub fn shippable(&self, days_left: u32, available: usize) -> usize {
        self.capacity_within(days_left).min(available as u64) as usize
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub num_books: usize,
    pub num_days: u32,
    pub scores: Vec<u32>,
    pub libraries: Vec<Library>,
}

impl FromStr for Challenge {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_challenge(s)
    }
}

impl Challenge {
    pub fn generate_instance(seed: &[u8; 32], track: &Track) -> Result<Self> {
        if track.books == 0 || track.libraries == 0 {
            return Err(anyhow!(
                "Track must have at least one book and one library. Got {}",
                track
            ));
        }
        let mut rng = SmallRng::from_seed(StdRng::from_seed(seed.clone()).r#gen());

        let scores: Vec<u32> = (0..track.books)
            .map(|_| rng.gen_range(0..=MAX_BOOK_SCORE))
            .collect();

        // Libraries hold on average two "fair shares" of the catalogue so that
        // most books are held by more than one library
        let max_library_size = (2 * track.books / track.libraries).clamp(1, track.books);
        let max_signup_time = (track.days / 4).max(1);
        let mut catalogue: Vec<usize> = (0..track.books).collect();
        let libraries = (0..track.libraries)
            .map(|id| {
                let size = rng.gen_range(1..=max_library_size);
                // Partial Fisher-Yates: the first `size` entries become the sample
                for j in 0..size {
                    let idx = rng.gen_range(j..catalogue.len());
                    catalogue.swap(j, idx);
                }
                Library {
                    id,
                    books: catalogue[..size].to_vec(),
                    signup_time: rng.gen_range(1..=max_signup_time),
                    ship_capacity: rng.gen_range(1..=MAX_SHIP_CAPACITY),
                }
            })
            .collect();

        Ok(Challenge {
            num_books: track.books,
            num_days: track.days,
            scores,
            libraries,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?;
        text.parse::<Challenge>()
            .with_context(|| format!("Failed to parse input file {}", path.display()))
    }

    pub fn num_libraries(&self) -> usize {
        self.libraries.len()
    }

    /// Serializes the instance back into the input text format.
    pub fn to_input(&self) -> String {
        let mut lines = Vec::with_capacity(2 + 2 * self.libraries.len());
        lines.push(format!(
            "{} {} {}",
            self.num_books,
            self.libraries.len(),
            self.num_days
        ));
        lines.push(join(&self.scores));
        for library in &self.libraries {
            lines.push(format!(
                "{} {} {}",
                library.books.len(),
                library.signup_time,
                library.ship_capacity
            ));
            lines.push(join(&library.books));
        }
        lines.join("\n") + "\n"
    }

    /// Sum of the scores of `books`, duplicates included.
    pub fn score_of(&self, books: &[usize]) -> u64 {
        books.iter().map(|&b| self.scores[b] as u64).sum()
    }

    /// Cumulative score table over `books` in the given order:
    /// `prefix[k]` is the score of the first `k` books.
    pub fn prefix_scores(&self, books: &[usize]) -> Vec<u64> {
        let mut prefix = Vec::with_capacity(books.len() + 1);
        let mut total = 0u64;
        prefix.push(total);
        for &book in books {
            total += self.scores[book] as u64;
            prefix.push(total);
        }
        prefix
    }

    /// Score of the union of all shipped books. A book shipped by more than
    /// one library counts once.
    pub fn evaluate_total_score(&self, solution: &Solution) -> Result<u64> {
        let mut shipped = HashSet::new();
        let mut total = 0u64;
        for shipment in &solution.shipments {
            for &book in &shipment.books {
                if book >= self.num_books {
                    return Err(anyhow!("Book ({}) is out of bounds", book));
                }
                if shipped.insert(book) {
                    total += self.scores[book] as u64;
                }
            }
        }
        Ok(total)
    }

    pub fn verify_solution(&self, solution: &Solution) -> Result<()> {
        let mut seen_libraries = HashSet::new();
        let mut signup_day = 0u64;
        for shipment in &solution.shipments {
            let library = self
                .libraries
                .get(shipment.library)
                .ok_or_else(|| anyhow!("Library ({}) is out of bounds", shipment.library))?;
            if !seen_libraries.insert(shipment.library) {
                return Err(anyhow!(
                    "Library {} is signed up more than once",
                    shipment.library
                ));
            }

            signup_day += library.signup_time as u64;
            if signup_day >= self.num_days as u64 {
                return Err(anyhow!(
                    "Library {} finishes signup on day {} but only {} days are available",
                    shipment.library,
                    signup_day,
                    self.num_days
                ));
            }
            let capacity = (self.num_days as u64 - signup_day) * library.ship_capacity as u64;
            if shipment.books.len() as u64 > capacity {
                return Err(anyhow!(
                    "Library {} ships {} books but can ship at most {}",
                    shipment.library,
                    shipment.books.len(),
                    capacity
                ));
            }

            let held: HashSet<usize> = library.books.iter().cloned().collect();
            let mut shipped = HashSet::new();
            for &book in &shipment.books {
                if !held.contains(&book) {
                    return Err(anyhow!(
                        "Library {} does not hold book {}",
                        shipment.library,
                        book
                    ));
                }
                if !shipped.insert(book) {
                    return Err(anyhow!(
                        "Library {} ships book {} more than once",
                        shipment.library,
                        book
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn evaluate_solution(&self, solution: &Solution) -> Result<u64> {
        self.verify_solution(solution)?;
        self.evaluate_total_score(solution)
    }
}

pub(crate) fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
