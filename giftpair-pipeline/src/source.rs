use async_trait::async_trait;

use crate::util;

/// Produces the initial candidate pool for a run.
///
/// Every enabled source runs once per query and the pipeline concatenates
/// their output in registration order, so enumeration order is preserved.
#[async_trait]
pub trait Source<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Whether this source contributes to the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    async fn get_candidates(&self, query: &Q) -> Result<Vec<C>, String>;

    /// Stage name used in log lines.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
