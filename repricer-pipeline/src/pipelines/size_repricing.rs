use std::sync::Arc;

use repricer_engine::listing::ListingDateIndex;
use repricer_engine::sales::HistoricalSalesIndex;

use crate::candidate_pipeline::{CandidatePipeline, Stage};
use crate::components::catalog_feed_source::CatalogFeedSource;
use crate::components::inflation_floor_filter::InflationFloorFilter;
use crate::components::inflation_scorer::InflationScorer;
use crate::components::input_order_selector::InputOrderSelector;
use crate::components::label_cleanup_hydrator::LabelCleanupHydrator;
use crate::components::listing_date_hydrator::ListingDateHydrator;
use crate::components::recent_listing_filter::RecentListingFilter;
use crate::components::run_date_query_hydrator::RunDateQueryHydrator;
use crate::components::run_summary_side_effect::RunSummarySideEffect;
use crate::components::sales_history_hydrator::SalesHistoryHydrator;
use crate::components::sell_through_scorer::SellThroughScorer;
use crate::components::size_ratio_floor_filter::SizeRatioFloorFilter;
use crate::components::stock_floor_filter::StockFloorFilter;
use crate::components::structure_filter::StructureFilter;
use crate::components::variant_price_scorer::VariantPriceScorer;
use crate::config::RepricingConfig;
use crate::feed_loader::CatalogFeedRecord;
use crate::query_hydrator::QueryHydrator;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{ProductCandidate, RepricingRun};

/// The size-based markdown pipeline.
///
/// Pipeline flow:
/// 1. RunDateQueryHydrator fills in the run date
/// 2. CatalogFeedSource turns feed records into candidates
/// 3. StructureFilter, StockFloorFilter, SizeRatioFloorFilter drop
///    malformed and thinly stocked products
/// 4. SalesHistoryHydrator joins historical sales per size
/// 5. SellThroughScorer collapses stock and sales into ratios
/// 6. InflationScorer compares every size against the reference size
/// 7. InflationFloorFilter keeps only overstocked products
/// 8. ListingDateHydrator attaches listing dates
/// 9. RecentListingFilter spares recently listed products
/// 10. LabelCleanupHydrator builds the display size-stock
/// 11. VariantPriceScorer computes the marked-down price
/// 12. InputOrderSelector restores feed order
/// 13. RunSummarySideEffect logs the exclusion counts
pub struct SizeRepricingPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<RepricingRun>>>,
    sources: Vec<Box<dyn Source<RepricingRun, ProductCandidate>>>,
    stages: Vec<Stage<RepricingRun, ProductCandidate>>,
    selector: InputOrderSelector,
    side_effects: Vec<Box<dyn SideEffect<RepricingRun, ProductCandidate>>>,
}

impl SizeRepricingPipeline {
    /// Pipeline with default thresholds.
    pub fn new(
        records: Vec<CatalogFeedRecord>,
        sales: Arc<HistoricalSalesIndex>,
        listings: Arc<ListingDateIndex>,
    ) -> Self {
        Self::with_config(records, sales, listings, &RepricingConfig::default())
    }

    pub fn with_config(
        records: Vec<CatalogFeedRecord>,
        sales: Arc<HistoricalSalesIndex>,
        listings: Arc<ListingDateIndex>,
        config: &RepricingConfig,
    ) -> Self {
        let query_hydrators: Vec<Box<dyn QueryHydrator<RepricingRun>>> =
            vec![Box::new(RunDateQueryHydrator)];

        let sources: Vec<Box<dyn Source<RepricingRun, ProductCandidate>>> =
            vec![Box::new(CatalogFeedSource::new(records))];

        let stages: Vec<Stage<RepricingRun, ProductCandidate>> = vec![
            Stage::Filter(Box::new(StructureFilter::new(config.min_segment_separators))),
            Stage::Filter(Box::new(StockFloorFilter::new(config.min_total_stock))),
            Stage::Filter(Box::new(SizeRatioFloorFilter::new(config.min_active_size_ratio))),
            Stage::Hydrator(Box::new(SalesHistoryHydrator::new(sales))),
            Stage::Scorer(Box::new(SellThroughScorer)),
            Stage::Scorer(Box::new(InflationScorer::new(config.min_sample_ratio))),
            Stage::Filter(Box::new(InflationFloorFilter::new(config.discount_tiers.floor))),
            Stage::Hydrator(Box::new(ListingDateHydrator::new(listings))),
            Stage::Filter(Box::new(RecentListingFilter::new(config.recent_listing_days))),
            Stage::Hydrator(Box::new(LabelCleanupHydrator)),
            Stage::Scorer(Box::new(VariantPriceScorer::new(config.discount_tiers.clone()))),
        ];

        let side_effects: Vec<Box<dyn SideEffect<RepricingRun, ProductCandidate>>> =
            vec![Box::new(RunSummarySideEffect)];

        Self {
            query_hydrators,
            sources,
            stages,
            selector: InputOrderSelector,
            side_effects,
        }
    }
}

impl CandidatePipeline<RepricingRun, ProductCandidate> for SizeRepricingPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<RepricingRun>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<RepricingRun, ProductCandidate>>] {
        &self.sources
    }

    fn stages(&self) -> &[Stage<RepricingRun, ProductCandidate>] {
        &self.stages
    }

    fn selector(&self) -> &dyn Selector<RepricingRun, ProductCandidate> {
        &self.selector
    }

    fn side_effects(&self) -> &[Box<dyn SideEffect<RepricingRun, ProductCandidate>>] {
        &self.side_effects
    }
}
