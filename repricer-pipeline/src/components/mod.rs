pub mod catalog_feed_source;
pub mod inflation_floor_filter;
pub mod inflation_scorer;
pub mod input_order_selector;
pub mod label_cleanup_hydrator;
pub mod listing_date_hydrator;
pub mod recent_listing_filter;
pub mod run_date_query_hydrator;
pub mod run_summary_side_effect;
pub mod sales_history_hydrator;
pub mod sell_through_scorer;
pub mod size_ratio_floor_filter;
pub mod stock_floor_filter;
pub mod structure_filter;
pub mod variant_price_scorer;

use repricer_engine::EligibilityStage;

use crate::filter::FilterResult;
use crate::types::ProductCandidate;

/// Partition candidates on an eligibility predicate and tag every removed
/// candidate with the stage that removed it.
pub(crate) fn partition_eligible<F>(
    candidates: Vec<ProductCandidate>,
    stage: EligibilityStage,
    is_eligible: F,
) -> FilterResult<ProductCandidate>
where
    F: Fn(&ProductCandidate) -> bool,
{
    let mut result = FilterResult::partition(candidates, is_eligible);
    for candidate in &mut result.removed {
        candidate.rejected_by = Some(stage);
    }
    result
}
