use repricer_engine::eligibility::is_recent_listing;
use repricer_engine::EligibilityStage;

use crate::components::partition_eligible;
use crate::filter::{Filter, FilterResult};
use crate::types::{ProductCandidate, RepricingRun};

/// Leaves recently listed products alone. Products with no known listing
/// date pass.
pub struct RecentListingFilter {
    pub window_days: i64,
}

impl RecentListingFilter {
    pub fn new(window_days: i64) -> Self {
        Self { window_days }
    }
}

impl Filter<RepricingRun, ProductCandidate> for RecentListingFilter {
    fn filter(
        &self,
        query: &RepricingRun,
        candidates: Vec<ProductCandidate>,
    ) -> Result<FilterResult<ProductCandidate>, String> {
        let today = query
            .today
            .ok_or_else(|| "run date is not set".to_string())?;
        Ok(partition_eligible(candidates, EligibilityStage::RecentListing, |c| {
            !is_recent_listing(c.listing_date, today, self.window_days)
        }))
    }
}
