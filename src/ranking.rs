//! Ranking by "want to see" count.

use crate::result::MovieRecord;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Descending,
    Ascending,
}

/// Copy of `movies` ordered by wish count. Ties keep their listing order.
#[must_use]
pub fn sort_by_wish_count(movies: &[MovieRecord], order: Order) -> Vec<MovieRecord> {
    let mut sorted = movies.to_vec();
    match order {
        Order::Descending => sorted.sort_by(|a, b| b.wish_count.cmp(&a.wish_count)),
        Order::Ascending => sorted.sort_by_key(|m| m.wish_count),
    }
    sorted
}

/// The `n` most wanted movies.
#[must_use]
pub fn top_movies(movies: &[MovieRecord], n: usize) -> Vec<MovieRecord> {
    let mut top = sort_by_wish_count(movies, Order::Descending);
    top.truncate(n);
    top
}
