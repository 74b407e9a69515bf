use super::Availability;
use bookscan_challenges::book_scanning::{Challenge, Solution};
use log::{debug, info};

/// What a library would contribute if it were signed up next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub score: u64,
    pub books: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    /// Index into the pool the pick was taken from.
    pub position: usize,
    pub library: usize,
    pub evaluation: Evaluation,
}

/// Scores a library as the next signup given the days left and the books
/// already shipped. Implementations differ only in how they rank and count
/// a library's remaining books.
pub trait SelectionStrategy {
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        challenge: &Challenge,
        library: usize,
        days_left: u32,
        availability: &Availability,
    ) -> Evaluation;

    /// The pool entry with the strictly highest score. Ties keep the earliest
    /// entry. Libraries that would ship nothing are never picked.
    fn select(
        &self,
        challenge: &Challenge,
        pool: &[usize],
        days_left: u32,
        availability: &Availability,
    ) -> Option<Pick> {
        let mut best: Option<Pick> = None;
        for (position, &library) in pool.iter().enumerate() {
            let evaluation = self.evaluate(challenge, library, days_left, availability);
            if evaluation.books.is_empty() {
                continue;
            }
            if best
                .as_ref()
                .map_or(true, |b| evaluation.score > b.evaluation.score)
            {
                best = Some(Pick {
                    position,
                    library,
                    evaluation,
                });
            }
        }
        best
    }
}

/// Signs up one library at a time, always the best pick of `strategy`, until
/// the days run out, every book has shipped, or no library in the pool can
/// ship anything.
pub fn allocate<S: SelectionStrategy + ?Sized>(challenge: &Challenge, strategy: &S) -> Solution {
    let mut solution = Solution::new();
    let mut availability = Availability::new(challenge.num_books);
    let mut days_left = challenge.num_days;
    let mut pool: Vec<usize> = (0..challenge.num_libraries())
        .filter(|&l| challenge.libraries[l].can_sign_up(days_left))
        .collect();
    let mut total_score = 0u64;

    while !pool.is_empty() && days_left > 0 && availability.num_available() > 0 {
        let pick = match strategy.select(challenge, &pool, days_left, &availability) {
            Some(pick) => pick,
            None => break,
        };
        let library = &challenge.libraries[pick.library];
        debug!(
            "{}: day {} sign up library {} shipping {} books for {}",
            strategy.name(),
            challenge.num_days - days_left,
            pick.library,
            pick.evaluation.books.len(),
            pick.evaluation.score
        );

        availability.mark_shipped(&pick.evaluation.books);
        days_left -= library.signup_time;
        total_score += pick.evaluation.score;
        pool.remove(pick.position);
        solution.push(pick.library, pick.evaluation.books);

        pool.retain(|&l| {
            let library = &challenge.libraries[l];
            library.can_sign_up(days_left) && availability.any_available(&library.books)
        });
    }

    info!(
        "{}: signed up {} libraries, total score {}",
        strategy.name(),
        solution.len(),
        total_score
    );
    solution
}
