use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::{exclusion_counts, ProductCandidate, RepricingRun};

/// Logs how many products were re-priced and how many each eligibility
/// stage excluded.
pub struct RunSummarySideEffect;

impl SideEffect<RepricingRun, ProductCandidate> for RunSummarySideEffect {
    fn run(&self, input: &SideEffectInput<RepricingRun, ProductCandidate>) -> Result<(), String> {
        let priced = input
            .selected_candidates
            .iter()
            .filter(|c| c.variant_price.is_some())
            .count();
        log::info!(
            "request_id={} repriced {} products ({} without a parsable price), excluded {}",
            input.query.run_id,
            input.selected_candidates.len(),
            input.selected_candidates.len() - priced,
            input.filtered_candidates.len()
        );
        for (stage, count) in exclusion_counts(&input.filtered_candidates) {
            log::info!("request_id={} excluded by {}: {}", input.query.run_id, stage, count);
        }
        Ok(())
    }
}
