use repricer_engine::eligibility::has_min_separators;
use repricer_engine::EligibilityStage;

use crate::filter::{Filter, FilterResult};
use crate::types::{ProductCandidate, RepricingRun};

/// Drops products whose size-stock string has too few segments
/// ([`EligibilityStage::Structure`]) or whose sized segments do not all carry
/// an integer stock ([`EligibilityStage::StockValues`]).
pub struct StructureFilter {
    pub min_separators: usize,
}

impl StructureFilter {
    pub fn new(min_separators: usize) -> Self {
        Self { min_separators }
    }
}

impl Filter<RepricingRun, ProductCandidate> for StructureFilter {
    fn filter(
        &self,
        _query: &RepricingRun,
        candidates: Vec<ProductCandidate>,
    ) -> Result<FilterResult<ProductCandidate>, String> {
        let mut result = FilterResult::partition(candidates, |c| {
            c.raw_sizes.is_some() && has_min_separators(&c.size_stock, self.min_separators)
        });
        for candidate in &mut result.removed {
            candidate.rejected_by = Some(if has_min_separators(&candidate.size_stock, self.min_separators) {
                EligibilityStage::StockValues
            } else {
                EligibilityStage::Structure
            });
        }
        Ok(result)
    }
}
