use crate::util;

/// Outcome of one filter: candidates that continue and candidates that
/// leave the run.
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

impl<C> FilterResult<C> {
    /// Split `candidates` on `keep`, preserving relative order on both sides.
    pub fn partition<F>(candidates: Vec<C>, keep: F) -> Self
    where
        F: Fn(&C) -> bool,
    {
        let (kept, removed) = candidates.into_iter().partition(|c| keep(c));
        Self { kept, removed }
    }
}

/// An eligibility gate. Removed candidates are reported in the run result
/// but no later stage sees them.
pub trait Filter<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Consume the current candidates and split them. An `Err` leaves the
    /// candidate list as it was before this filter.
    fn filter(&self, query: &Q, candidates: Vec<C>) -> Result<FilterResult<C>, String>;

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_keeps_order_on_both_sides() {
        let result = FilterResult::partition(vec![5, 2, 8, 1, 9], |n| *n > 4);
        assert_eq!(result.kept, vec![5, 8, 9]);
        assert_eq!(result.removed, vec![2, 1]);
    }
}
