use rayon::prelude::*;
use repricer_engine::pricing::{reprice, DiscountTiers};

use crate::scorer::Scorer;
use crate::types::{ProductCandidate, RepricingRun};

/// Discounts the current price by inflation tier and snaps the result to a
/// psychological price point.
pub struct VariantPriceScorer {
    pub tiers: DiscountTiers,
}

impl VariantPriceScorer {
    pub fn new(tiers: DiscountTiers) -> Self {
        Self { tiers }
    }
}

impl Scorer<RepricingRun, ProductCandidate> for VariantPriceScorer {
    fn score(
        &self,
        _query: &RepricingRun,
        candidates: &[ProductCandidate],
    ) -> Result<Vec<ProductCandidate>, String> {
        let scored = candidates
            .par_iter()
            .map(|c| ProductCandidate {
                discount_rate: c.inflation_ratio.map(|ratio| self.tiers.rate_for(ratio)),
                variant_price: reprice(&c.current_price, c.inflation_ratio, &self.tiers),
                ..ProductCandidate::default()
            })
            .collect();
        Ok(scored)
    }

    fn update(&self, candidate: &mut ProductCandidate, scored: ProductCandidate) {
        candidate.discount_rate = scored.discount_rate;
        candidate.variant_price = scored.variant_price;
    }
}
