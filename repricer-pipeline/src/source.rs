use crate::util;

/// Produces candidates for a run. When a pipeline has several sources their
/// outputs are concatenated in source order.
pub trait Source<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    fn get_candidates(&self, query: &Q) -> Result<Vec<C>, String>;

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
