use async_trait::async_trait;
use std::sync::Arc;

use crate::util;

/// What a side effect gets to see once the final bundles are known.
#[derive(Clone)]
pub struct SideEffectInput<Q, C> {
    pub query: Arc<Q>,
    pub selected_candidates: Vec<C>,
}

/// Work that follows selection and never changes the returned bundles,
/// such as recording finalized bundle names.
///
/// Side effects are awaited before `execute` returns so that nothing is
/// lost when the batch process exits right after.
#[async_trait]
pub trait SideEffect<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: Arc<Q>) -> bool {
        true
    }

    async fn run(&self, input: Arc<SideEffectInput<Q, C>>) -> Result<(), String>;

    /// Stage name used in log lines.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
