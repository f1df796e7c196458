use std::sync::Arc;

use repricer_engine::listing::{parse_listing_date, ListingDateIndex};

use crate::hydrator::Hydrator;
use crate::types::{ProductCandidate, RepricingRun};

/// Attaches the listing date from the prebuilt index. Unknown SKUs and
/// unparsable dates leave the date unset.
pub struct ListingDateHydrator {
    index: Arc<ListingDateIndex>,
}

impl ListingDateHydrator {
    pub fn new(index: Arc<ListingDateIndex>) -> Self {
        Self { index }
    }
}

impl Hydrator<RepricingRun, ProductCandidate> for ListingDateHydrator {
    fn hydrate(
        &self,
        query: &RepricingRun,
        candidates: &[ProductCandidate],
    ) -> Result<Vec<ProductCandidate>, String> {
        let hydrated = candidates
            .iter()
            .map(|c| {
                let text = self.index.get(&c.sku);
                let date = text.and_then(parse_listing_date);
                if let (Some(text), None) = (text, date) {
                    log::warn!(
                        "request_id={} sku={} has an unparsable listing date '{}'",
                        query.run_id,
                        c.sku,
                        text
                    );
                }
                ProductCandidate {
                    listing_date_text: text.map(str::to_string),
                    listing_date: date,
                    ..ProductCandidate::default()
                }
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut ProductCandidate, hydrated: ProductCandidate) {
        candidate.listing_date_text = hydrated.listing_date_text;
        candidate.listing_date = hydrated.listing_date;
    }
}
