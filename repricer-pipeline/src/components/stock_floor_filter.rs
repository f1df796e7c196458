use repricer_engine::eligibility::meets_integer_floor;
use repricer_engine::EligibilityStage;

use crate::components::partition_eligible;
use crate::filter::{Filter, FilterResult};
use crate::types::{ProductCandidate, RepricingRun};

/// Drops products with too few units on sale. A non-integer total is
/// treated as failing the floor.
pub struct StockFloorFilter {
    pub min_total_stock: i64,
}

impl StockFloorFilter {
    pub fn new(min_total_stock: i64) -> Self {
        Self { min_total_stock }
    }
}

impl Filter<RepricingRun, ProductCandidate> for StockFloorFilter {
    fn filter(
        &self,
        _query: &RepricingRun,
        candidates: Vec<ProductCandidate>,
    ) -> Result<FilterResult<ProductCandidate>, String> {
        Ok(partition_eligible(candidates, EligibilityStage::StockFloor, |c| {
            meets_integer_floor(&c.total_stock, self.min_total_stock)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_stock(total_stock: &str) -> ProductCandidate {
        ProductCandidate {
            total_stock: total_stock.into(),
            ..ProductCandidate::default()
        }
    }

    #[test]
    fn floor_is_inclusive() {
        let result = StockFloorFilter::new(25)
            .filter(
                &RepricingRun::new("t"),
                vec![with_stock("25"), with_stock("24"), with_stock("abc"), with_stock("100")],
            )
            .unwrap();
        let kept: Vec<&str> = result.kept.iter().map(|c| c.total_stock.as_str()).collect();
        assert_eq!(kept, vec!["25", "100"]);
        assert_eq!(result.removed[0].rejected_by, Some(EligibilityStage::StockFloor));
    }
}
