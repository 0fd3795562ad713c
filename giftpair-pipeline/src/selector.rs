use std::cmp::Ordering;

use crate::util;

/// Orders scored candidates and cuts the list down to the result size.
pub trait Selector<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn select(&self, _query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = self.sort(candidates);
        if let Some(limit) = self.size() {
            sorted.truncate(limit);
        }
        sorted
    }

    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Primary sort key, higher first.
    fn score(&self, candidate: &C) -> f64;

    /// Secondary sort key for equal scores, higher first.
    fn tiebreak(&self, _candidate: &C) -> f64 {
        0.0
    }

    /// Sort by `score` then `tiebreak`, both descending.
    ///
    /// The sort is stable, so candidates equal on both keys keep their
    /// enumeration order. NaN keys sink to the end.
    fn sort(&self, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = candidates;
        sorted.sort_by(|a, b| {
            descending(self.score(a), self.score(b))
                .then_with(|| descending(self.tiebreak(a), self.tiebreak(b)))
        });
        sorted
    }

    /// Maximum number of candidates to keep. `None` keeps everything.
    fn size(&self) -> Option<usize> {
        None
    }

    /// Stage name used in log lines.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
