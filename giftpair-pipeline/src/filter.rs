use async_trait::async_trait;

use crate::util;

/// Candidates split by a filter. `removed` is kept for reporting.
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

/// Drops candidates that must not reach scoring.
///
/// Filters run one after another; each sees only what the previous one kept.
#[async_trait]
pub trait Filter<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Partition `candidates` into kept and removed. Order within each side
    /// must follow the input order.
    async fn filter(&self, query: &Q, candidates: Vec<C>) -> Result<FilterResult<C>, String>;

    /// Stage name used in log lines.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
