/// Which books may still add to the score. A book leaves the pool the moment
/// a committed library ships it and never comes back during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    available: Vec<bool>,
    num_available: usize,
}

impl Availability {
    pub fn new(num_books: usize) -> Self {
        Self {
            available: vec![true; num_books],
            num_available: num_books,
        }
    }

    pub fn is_available(&self, book: usize) -> bool {
        self.available[book]
    }

    pub fn num_available(&self) -> usize {
        self.num_available
    }

    pub fn mark_shipped(&mut self, books: &[usize]) {
        for &book in books {
            if std::mem::replace(&mut self.available[book], false) {
                self.num_available -= 1;
            }
        }
    }

    /// `books` with every shipped book removed, order preserved.
    pub fn available_books(&self, books: &[usize]) -> Vec<usize> {
        books
            .iter()
            .cloned()
            .filter(|&b| self.available[b])
            .collect()
    }

    pub fn any_available(&self, books: &[usize]) -> bool {
        books.iter().any(|&b| self.available[b])
    }
}
