use std::collections::BTreeMap;

use chrono::NaiveDate;
use repricer_engine::size_stock::{DisplayValue, JoinedStock, SizeStock};
use repricer_engine::EligibilityStage;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::candidate_pipeline::HasRequestId;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// One batch re-pricing run.
#[derive(Clone, Debug, Default)]
pub struct RepricingRun {
    pub run_id: String,
    /// Calendar date the recency window is measured from. Filled from the
    /// local clock when not given.
    pub today: Option<NaiveDate>,
}

impl RepricingRun {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            today: None,
        }
    }

    pub fn on(run_id: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            run_id: run_id.into(),
            today: Some(today),
        }
    }
}

impl HasRequestId for RepricingRun {
    fn request_id(&self) -> &str {
        &self.run_id
    }
}

// ---------------------------------------------------------------------------
// Candidate types
// ---------------------------------------------------------------------------

/// A catalog product moving through the pipeline.
///
/// Feed fields are kept as text, exactly as received. Every later field is
/// owned by one stage and written once, by that stage's `update`.
#[derive(Clone, Debug, Default)]
pub struct ProductCandidate {
    /// Index in the combined feed; the output follows this order.
    pub position: usize,

    pub id: String,
    pub name: String,
    pub sku: String,
    pub total_stock: String,
    pub size_stock: String,
    pub category: String,
    pub season: String,
    pub active_size_ratio: String,
    pub current_price: String,

    /// Raw size-stock, decoded strictly at ingestion. `None` when a sized
    /// segment has a non-integer stock.
    pub raw_sizes: Option<SizeStock<u32>>,
    /// Raw stock paired with historical sold count.
    pub joined_sizes: Option<SizeStock<JoinedStock>>,
    /// Sell-through ratio per size.
    pub ratio_sizes: Option<SizeStock<u32>>,
    pub inflation_ratio: Option<Decimal>,
    /// Listing date text as the lookup returned it.
    pub listing_date_text: Option<String>,
    pub listing_date: Option<NaiveDate>,
    /// Ratios with the reference size's value removed.
    pub display_sizes: Option<SizeStock<DisplayValue>>,
    pub discount_rate: Option<Decimal>,
    pub variant_price: Option<Decimal>,

    /// Set on removed candidates only.
    pub rejected_by: Option<EligibilityStage>,
}

/// Excluded-product counts per eligibility stage, in stage order.
pub fn exclusion_counts(filtered: &[ProductCandidate]) -> BTreeMap<EligibilityStage, usize> {
    let mut counts: BTreeMap<EligibilityStage, usize> =
        EligibilityStage::ALL.iter().map(|stage| (*stage, 0)).collect();
    for candidate in filtered {
        if let Some(stage) = candidate.rejected_by {
            *counts.entry(stage).or_insert(0) += 1;
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One row of the re-pricing artifact.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RepricedProduct {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub season: String,
    /// Display-stage size-stock string.
    pub size_stock: String,
    pub current_price: String,
    pub inflation_ratio: Option<Decimal>,
    pub listing_date: Option<String>,
    pub discount_rate: Option<Decimal>,
    /// Discounted, rounded price. `None` when the current price was not
    /// parsable.
    pub variant_price: Option<Decimal>,
}

impl From<&ProductCandidate> for RepricedProduct {
    fn from(candidate: &ProductCandidate) -> Self {
        let size_stock = match &candidate.display_sizes {
            Some(display) => display.encode(),
            None => candidate.size_stock.clone(),
        };
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            sku: candidate.sku.clone(),
            category: candidate.category.clone(),
            season: candidate.season.clone(),
            size_stock,
            current_price: candidate.current_price.clone(),
            inflation_ratio: candidate.inflation_ratio,
            listing_date: candidate.listing_date_text.clone(),
            discount_rate: candidate.discount_rate,
            variant_price: candidate.variant_price,
        }
    }
}

/// Output rows for the selected candidates, in selection order.
pub fn repriced_products(selected: &[ProductCandidate]) -> Vec<RepricedProduct> {
    selected.iter().map(RepricedProduct::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_counts_cover_every_stage() {
        let filtered = vec![
            ProductCandidate {
                rejected_by: Some(EligibilityStage::StockFloor),
                ..ProductCandidate::default()
            },
            ProductCandidate {
                rejected_by: Some(EligibilityStage::StockFloor),
                ..ProductCandidate::default()
            },
            ProductCandidate {
                rejected_by: Some(EligibilityStage::RecentListing),
                ..ProductCandidate::default()
            },
        ];
        let counts = exclusion_counts(&filtered);
        assert_eq!(counts.len(), 6);
        assert_eq!(counts[&EligibilityStage::Structure], 0);
        assert_eq!(counts[&EligibilityStage::StockFloor], 2);
        assert_eq!(counts[&EligibilityStage::RecentListing], 1);
    }

    #[test]
    fn output_prefers_display_sizes() {
        let candidate = ProductCandidate {
            id: "7".into(),
            size_stock: "S : 3 // M : 4 // L : 5".into(),
            display_sizes: Some(SizeStock::decode("S // M : 4 // L : 5")),
            ..ProductCandidate::default()
        };
        let row = RepricedProduct::from(&candidate);
        assert_eq!(row.size_stock, "S // M : 4 // L : 5");

        let bare = ProductCandidate {
            size_stock: "S : 3 // M : 4 // L : 5".into(),
            ..ProductCandidate::default()
        };
        assert_eq!(RepricedProduct::from(&bare).size_stock, "S : 3 // M : 4 // L : 5");
    }
}
