use super::{join, parse, ParseError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One activated library and the books it ships, in shipping order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Shipment {
    pub library: usize,
    pub books: Vec<usize>,
}

/// Shipments in activation order. Backtracking searches use it as a stack
/// (`push`/`pop`), greedy allocators only append.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    pub shipments: Vec<Shipment>,
}

impl Solution {
    pub fn new() -> Self {
        Self {
            shipments: Vec::new(),
        }
    }

    pub fn push(&mut self, library: usize, books: Vec<usize>) {
        debug_assert!(
            !self.contains_library(library),
            "library {} pushed twice",
            library
        );
        self.shipments.push(Shipment { library, books });
    }

    pub fn pop(&mut self) -> Option<Shipment> {
        self.shipments.pop()
    }

    pub fn len(&self) -> usize {
        self.shipments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shipments.is_empty()
    }

    pub fn contains_library(&self, library: usize) -> bool {
        self.shipments.iter().any(|s| s.library == library)
    }

    pub fn num_books_shipped(&self) -> usize {
        self.shipments.iter().map(|s| s.books.len()).sum()
    }

    /// Renders the submission text format.
    pub fn to_submission(&self) -> String {
        let mut lines = Vec::with_capacity(1 + 2 * self.shipments.len());
        lines.push(self.shipments.len().to_string());
        for shipment in &self.shipments {
            lines.push(format!("{} {}", shipment.library, shipment.books.len()));
            lines.push(join(&shipment.books));
        }
        lines.join("\n") + "\n"
    }

    pub fn from_submission(text: &str) -> Result<Self, ParseError> {
        parse::parse_submission(text)
    }
}

impl FromStr for Solution {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_submission(s)
    }
}
