use crate::util;

/// Orders the surviving candidates once every stage has run.
///
/// Ranks are ordinals: lower comes first, and a candidate without a rank
/// goes after every ranked one. The sort is stable, so equal ranks keep the
/// order the stages left them in.
pub trait Selector<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn select(&self, _query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut ordered = candidates;
        ordered.sort_by_key(|c| match self.rank(c) {
            Some(rank) => (false, rank),
            None => (true, 0),
        });
        if let Some(limit) = self.limit() {
            ordered.truncate(limit);
        }
        ordered
    }

    fn enable(&self, _query: &Q) -> bool {
        true
    }

    fn rank(&self, candidate: &C) -> Option<usize>;

    /// Maximum number of candidates to keep. `None` keeps them all.
    fn limit(&self) -> Option<usize> {
        None
    }

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ByValue(Option<usize>);

    impl Selector<(), (usize, Option<usize>)> for ByValue {
        fn rank(&self, candidate: &(usize, Option<usize>)) -> Option<usize> {
            candidate.1
        }

        fn limit(&self) -> Option<usize> {
            self.0
        }
    }

    #[test]
    fn unranked_candidates_go_last_in_arrival_order() {
        let candidates = vec![(0, None), (1, Some(3)), (2, Some(1)), (3, None), (4, Some(1))];
        let order: Vec<usize> = ByValue(None)
            .select(&(), candidates)
            .into_iter()
            .map(|c| c.0)
            .collect();
        assert_eq!(order, vec![2, 4, 1, 0, 3]);
    }

    #[test]
    fn limit_truncates_after_sorting() {
        let candidates = vec![(0, Some(9)), (1, Some(2)), (2, Some(5))];
        let order: Vec<usize> = ByValue(Some(2))
            .select(&(), candidates)
            .into_iter()
            .map(|c| c.0)
            .collect();
        assert_eq!(order, vec![1, 2]);
    }
}
