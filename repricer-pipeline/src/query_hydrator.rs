use crate::util;

/// Fills in run-level context (such as the run date) before any candidate
/// is fetched.
pub trait QueryHydrator<Q>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Build a copy of the query carrying this hydrator's fields.
    fn hydrate(&self, query: &Q) -> Result<Q, String>;

    /// Move this hydrator's fields (and nothing else) onto `query`.
    fn update(&self, query: &mut Q, hydrated: Q);

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
