use repricer_engine::eligibility::meets_integer_floor;
use repricer_engine::EligibilityStage;

use crate::components::partition_eligible;
use crate::filter::{Filter, FilterResult};
use crate::types::{ProductCandidate, RepricingRun};

/// Drops products offered in too small a share of their sizes.
pub struct SizeRatioFloorFilter {
    pub min_active_size_ratio: i64,
}

impl SizeRatioFloorFilter {
    pub fn new(min_active_size_ratio: i64) -> Self {
        Self { min_active_size_ratio }
    }
}

impl Filter<RepricingRun, ProductCandidate> for SizeRatioFloorFilter {
    fn filter(
        &self,
        _query: &RepricingRun,
        candidates: Vec<ProductCandidate>,
    ) -> Result<FilterResult<ProductCandidate>, String> {
        Ok(partition_eligible(candidates, EligibilityStage::SizeRatioFloor, |c| {
            meets_integer_floor(&c.active_size_ratio, self.min_active_size_ratio)
        }))
    }
}
