pub mod eligibility;
pub mod listing;
pub mod pricing;
pub mod ratio;
pub mod sales;
pub mod size_stock;
pub mod thresholds;

pub use eligibility::EligibilityStage;
pub use listing::{parse_listing_date, ListingDateIndex, ListingDateLookup};
pub use pricing::{reprice, round_price, DiscountTiers};
pub use ratio::{collapse_ratios, inflation_ratio, sell_through_ratio};
pub use sales::{join_sales, normalized_sku, HistoricalSalesIndex, OrderLine};
pub use size_stock::{
    strip_reference_values, CodecError, DisplayValue, JoinedStock, SizeEntry, SizeStock, SizeValue,
};
