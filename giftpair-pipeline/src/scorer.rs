use async_trait::async_trait;

use crate::util;

/// Assigns ranking signals to candidates.
#[async_trait]
pub trait Scorer<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Return one scored candidate per input, in the same order.
    async fn score(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy the score fields from `scored` onto `candidate`.
    fn update(&self, candidate: &mut C, scored: C);

    /// Stage name used in log lines.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
