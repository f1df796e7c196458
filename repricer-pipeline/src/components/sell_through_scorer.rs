use rayon::prelude::*;
use repricer_engine::ratio::collapse_ratios;

use crate::scorer::Scorer;
use crate::types::{ProductCandidate, RepricingRun};

/// Collapses each joined `stock-sold` pair into a sell-through ratio.
pub struct SellThroughScorer;

impl Scorer<RepricingRun, ProductCandidate> for SellThroughScorer {
    fn score(
        &self,
        _query: &RepricingRun,
        candidates: &[ProductCandidate],
    ) -> Result<Vec<ProductCandidate>, String> {
        let scored = candidates
            .par_iter()
            .map(|c| ProductCandidate {
                ratio_sizes: c.joined_sizes.as_ref().map(collapse_ratios),
                ..ProductCandidate::default()
            })
            .collect();
        Ok(scored)
    }

    fn update(&self, candidate: &mut ProductCandidate, scored: ProductCandidate) {
        candidate.ratio_sizes = scored.ratio_sizes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repricer_engine::size_stock::SizeStock;

    #[test]
    fn collapses_joined_sizes() {
        let candidates = vec![ProductCandidate {
            joined_sizes: Some(SizeStock::decode("L : 14-2 // M : 53-2 // S : 31-1")),
            ..ProductCandidate::default()
        }];
        let scored = SellThroughScorer.score(&RepricingRun::new("t"), &candidates).unwrap();
        assert_eq!(
            scored[0].ratio_sizes.as_ref().map(|r| r.encode()).as_deref(),
            Some("L : 7 // M : 27 // S : 31")
        );
    }
}
