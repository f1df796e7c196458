use rayon::prelude::*;
use repricer_engine::size_stock::strip_reference_values;

use crate::hydrator::Hydrator;
use crate::types::{ProductCandidate, RepricingRun};

/// Builds the display size-stock: the reference size is shown by label
/// only, every other size keeps its ratio.
pub struct LabelCleanupHydrator;

impl Hydrator<RepricingRun, ProductCandidate> for LabelCleanupHydrator {
    fn hydrate(
        &self,
        _query: &RepricingRun,
        candidates: &[ProductCandidate],
    ) -> Result<Vec<ProductCandidate>, String> {
        let hydrated = candidates
            .par_iter()
            .map(|c| ProductCandidate {
                display_sizes: c.ratio_sizes.as_ref().map(strip_reference_values),
                ..ProductCandidate::default()
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut ProductCandidate, hydrated: ProductCandidate) {
        candidate.display_sizes = hydrated.display_sizes;
    }
}
