use crate::util;

/// Hydrators attach data from read-only collaborators (indexes, lookups)
/// to candidates.
pub trait Hydrator<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this hydrator should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Hydrate candidates.
    ///
    /// Must return exactly one candidate per input, in input order. Only
    /// the fields this hydrator owns need to be populated; the pipeline
    /// copies them over with [`Hydrator::update`].
    fn hydrate(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy this hydrator's fields from the hydrated candidate.
    fn update(&self, candidate: &mut C, hydrated: C);

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
