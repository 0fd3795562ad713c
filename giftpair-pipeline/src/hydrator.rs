use async_trait::async_trait;

use crate::util;

/// Attaches extra data to candidates without adding or removing any.
#[async_trait]
pub trait Hydrator<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Return one partially filled candidate per input, in the same order.
    /// A result of a different length is discarded by the pipeline.
    async fn hydrate(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy this hydrator's fields from `hydrated` onto `candidate`.
    fn update(&self, candidate: &mut C, hydrated: C);

    /// Stage name used in log lines.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
