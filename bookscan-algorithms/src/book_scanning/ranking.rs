//! Book orderings. Every function returns a new ordering and leaves the
//! library untouched, so evaluations never depend on who sorted first.

use bookscan_challenges::book_scanning::Challenge;

/// Highest score first, lower book index first on ties.
pub fn by_descending_score(books: &[usize], scores: &[u32]) -> Vec<usize> {
    let mut sorted = books.to_vec();
    sorted.sort_by(|&a, &b| scores[b].cmp(&scores[a]).then(a.cmp(&b)));
    sorted
}

/// Descending by raw score using selection sort: the first maximum of the
/// unsorted tail is swapped into place.
pub fn selection_sorted(books: &[usize], scores: &[u32]) -> Vec<usize> {
    let mut sorted = books.to_vec();
    for i in 0..sorted.len() {
        let mut best = i;
        for j in (i + 1)..sorted.len() {
            if scores[sorted[j]] > scores[sorted[best]] {
                best = j;
            }
        }
        sorted.swap(i, best);
    }
    sorted
}

/// Number of libraries holding each book.
pub fn popularity_histogram(challenge: &Challenge) -> Vec<u32> {
    let mut popularity = vec![0u32; challenge.num_books];
    for library in &challenge.libraries {
        for &book in &library.books {
            popularity[book] += 1;
        }
    }
    popularity
}

/// `score * (num_libraries - popularity + 1)`. A book only one library holds
/// gets the full weight, a book every library holds gets weight 1.
pub fn rarity_weighted_score(score: u32, popularity: u32, num_libraries: usize) -> u64 {
    let weight = (num_libraries as u64).saturating_sub(popularity as u64) + 1;
    score as u64 * weight
}

/// Descending by `rarity_weighted_score`, then by raw score, then by index.
pub fn by_popularity(
    books: &[usize],
    scores: &[u32],
    popularity: &[u32],
    num_libraries: usize,
) -> Vec<usize> {
    let key = |b: usize| rarity_weighted_score(scores[b], popularity[b], num_libraries);
    let mut sorted = books.to_vec();
    sorted.sort_by(|&a, &b| {
        key(b)
            .cmp(&key(a))
            .then(scores[b].cmp(&scores[a]))
            .then(a.cmp(&b))
    });
    sorted
}
