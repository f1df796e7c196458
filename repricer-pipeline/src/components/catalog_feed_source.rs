use crate::feed_loader::CatalogFeedRecord;
use crate::source::Source;
use crate::types::{ProductCandidate, RepricingRun};

/// Serves the loaded catalog feed as candidates, numbered in feed order.
pub struct CatalogFeedSource {
    records: Vec<CatalogFeedRecord>,
}

impl CatalogFeedSource {
    pub fn new(records: Vec<CatalogFeedRecord>) -> Self {
        Self { records }
    }
}

impl Source<RepricingRun, ProductCandidate> for CatalogFeedSource {
    fn get_candidates(&self, query: &RepricingRun) -> Result<Vec<ProductCandidate>, String> {
        let candidates: Vec<ProductCandidate> = self
            .records
            .iter()
            .enumerate()
            .map(|(position, record)| record.to_candidate(position))
            .collect();

        let undecodable = candidates.iter().filter(|c| c.raw_sizes.is_none()).count();
        if undecodable > 0 {
            log::debug!(
                "request_id={} {} feed records have a non-integer size stock",
                query.run_id,
                undecodable
            );
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_feed_order() {
        let records = vec![
            CatalogFeedRecord {
                id: "a".into(),
                ..CatalogFeedRecord::default()
            },
            CatalogFeedRecord {
                id: "b".into(),
                ..CatalogFeedRecord::default()
            },
        ];
        let source = CatalogFeedSource::new(records);
        let candidates = source.get_candidates(&RepricingRun::new("t")).unwrap();
        let ids: Vec<(usize, &str)> = candidates.iter().map(|c| (c.position, c.id.as_str())).collect();
        assert_eq!(ids, vec![(0, "a"), (1, "b")]);
    }

    #[test]
    fn empty_feed_yields_no_candidates() {
        let source = CatalogFeedSource::new(Vec::new());
        assert!(source.get_candidates(&RepricingRun::new("t")).unwrap().is_empty());
    }
}
