use rayon::prelude::*;
use repricer_engine::ratio::inflation_ratio;

use crate::scorer::Scorer;
use crate::types::{ProductCandidate, RepricingRun};

/// Computes the product-level inflation ratio from the sell-through ratios.
/// Products without a usable reference size get no ratio.
pub struct InflationScorer {
    pub min_sample_ratio: u32,
}

impl InflationScorer {
    pub fn new(min_sample_ratio: u32) -> Self {
        Self { min_sample_ratio }
    }
}

impl Scorer<RepricingRun, ProductCandidate> for InflationScorer {
    fn score(
        &self,
        _query: &RepricingRun,
        candidates: &[ProductCandidate],
    ) -> Result<Vec<ProductCandidate>, String> {
        let scored = candidates
            .par_iter()
            .map(|c| ProductCandidate {
                inflation_ratio: c
                    .ratio_sizes
                    .as_ref()
                    .and_then(|ratios| inflation_ratio(ratios, self.min_sample_ratio)),
                ..ProductCandidate::default()
            })
            .collect();
        Ok(scored)
    }

    fn update(&self, candidate: &mut ProductCandidate, scored: ProductCandidate) {
        candidate.inflation_ratio = scored.inflation_ratio;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repricer_engine::size_stock::SizeStock;
    use rust_decimal::Decimal;

    #[test]
    fn scores_reference_deviation() {
        let candidates = vec![
            ProductCandidate {
                ratio_sizes: Some(SizeStock::decode("S : 20 // M : 10 // L : 9")),
                ..ProductCandidate::default()
            },
            ProductCandidate {
                ratio_sizes: Some(SizeStock::decode("M : 20 // L : 10 // XL : 15")),
                ..ProductCandidate::default()
            },
        ];
        let scored = InflationScorer::new(10)
            .score(&RepricingRun::new("t"), &candidates)
            .unwrap();
        assert_eq!(scored[0].inflation_ratio, Some(Decimal::from(50)));
        assert_eq!(scored[1].inflation_ratio, None);
    }
}
