use repricer_engine::eligibility::meets_inflation_floor;
use repricer_engine::EligibilityStage;
use rust_decimal::Decimal;

use crate::components::partition_eligible;
use crate::filter::{Filter, FilterResult};
use crate::types::{ProductCandidate, RepricingRun};

/// Keeps only products whose inflation ratio reaches the floor. A missing
/// ratio never does.
pub struct InflationFloorFilter {
    pub floor: Decimal,
}

impl InflationFloorFilter {
    pub fn new(floor: Decimal) -> Self {
        Self { floor }
    }
}

impl Filter<RepricingRun, ProductCandidate> for InflationFloorFilter {
    fn filter(
        &self,
        _query: &RepricingRun,
        candidates: Vec<ProductCandidate>,
    ) -> Result<FilterResult<ProductCandidate>, String> {
        Ok(partition_eligible(candidates, EligibilityStage::InflationFloor, |c| {
            meets_inflation_floor(c.inflation_ratio, self.floor)
        }))
    }
}
