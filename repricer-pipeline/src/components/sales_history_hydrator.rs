use std::sync::Arc;

use rayon::prelude::*;
use repricer_engine::sales::{join_sales, HistoricalSalesIndex};

use crate::hydrator::Hydrator;
use crate::types::{ProductCandidate, RepricingRun};

/// Pairs every size's current stock with its historical sold count from
/// the sales index.
pub struct SalesHistoryHydrator {
    index: Arc<HistoricalSalesIndex>,
}

impl SalesHistoryHydrator {
    pub fn new(index: Arc<HistoricalSalesIndex>) -> Self {
        Self { index }
    }
}

impl Hydrator<RepricingRun, ProductCandidate> for SalesHistoryHydrator {
    fn hydrate(
        &self,
        _query: &RepricingRun,
        candidates: &[ProductCandidate],
    ) -> Result<Vec<ProductCandidate>, String> {
        let hydrated = candidates
            .par_iter()
            .map(|c| ProductCandidate {
                joined_sizes: c
                    .raw_sizes
                    .as_ref()
                    .map(|raw| join_sales(raw, &c.sku, &self.index)),
                ..ProductCandidate::default()
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut ProductCandidate, hydrated: ProductCandidate) {
        candidate.joined_sizes = hydrated.joined_sizes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repricer_engine::sales::OrderLine;
    use repricer_engine::size_stock::SizeStock;

    #[test]
    fn joins_on_normalized_sku() {
        let index = HistoricalSalesIndex::from_order_lines(&[
            OrderLine {
                sku: "LS.100.WHT.M".into(),
                quantity: "3".into(),
                size: "M".into(),
            },
            OrderLine {
                sku: "LS.100.WHT.L".into(),
                quantity: "2".into(),
                size: "Beden: L".into(),
            },
        ]);
        let hydrator = SalesHistoryHydrator::new(Arc::new(index));
        let candidates = vec![
            ProductCandidate {
                sku: "LS.100.WHT.S".into(),
                raw_sizes: Some(SizeStock::decode("S : 20 // M : 40 // L : 30")),
                ..ProductCandidate::default()
            },
            ProductCandidate::default(),
        ];
        let hydrated = hydrator.hydrate(&RepricingRun::new("t"), &candidates).unwrap();
        assert_eq!(hydrated.len(), 2);
        assert_eq!(
            hydrated[0].joined_sizes.as_ref().map(|j| j.encode()).as_deref(),
            Some("S : 20-0 // M : 40-3 // L : 30-2")
        );
        assert!(hydrated[1].joined_sizes.is_none());
    }
}
