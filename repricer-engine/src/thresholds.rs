//! Centralized thresholds and wire constants for the repricing pipeline.
//!
//! Changing a value here affects both the pure predicates in this crate and
//! the default configuration of the pipeline components built on them
//! (`repricer_pipeline::config`).

/// Separator between size segments in the size-stock encoding.
pub const SEGMENT_SEPARATOR: &str = " // ";

/// Separator between a size label and its value inside one segment.
pub const LABEL_SEPARATOR: &str = " : ";

/// Separator between current stock and historical sold count after the join.
pub const JOINED_SEPARATOR: char = '-';

/// Size labels that can serve as the inflation reference. The first one
/// found in entry order wins.
pub const REFERENCE_LABELS: [&str; 2] = ["36", "S"];

/// Minimum number of `//` occurrences in the raw size-stock string
/// (i.e. at least three size segments).
pub const MIN_SEGMENT_SEPARATORS: usize = 2;

/// Products with fewer units on sale than this are dropped.
pub const MIN_TOTAL_STOCK: i64 = 25;

/// Products whose active-size ratio percent is below this are dropped.
pub const MIN_ACTIVE_SIZE_RATIO: i64 = 51;

/// Comparison sizes need at least this sell-through ratio to be sampled.
pub const MIN_SAMPLE_RATIO: u32 = 10;

/// Inflation ratio (percent) a product must reach to be re-priced.
pub const MIN_INFLATION_RATIO: i64 = 40;

/// Upper bound (inclusive) of the moderate discount tier.
pub const MODERATE_TIER_CEILING: i64 = 70;

/// Discount percent applied in the moderate tier (40..=70).
pub const MODERATE_DISCOUNT_PCT: i64 = 15;

/// Discount percent applied above the moderate tier.
pub const STEEP_DISCOUNT_PCT: i64 = 20;

/// Products listed within this many days (inclusive) are left alone.
pub const RECENT_LISTING_DAYS: i64 = 5;

/// Prefix the order export puts in front of size captions.
pub const SIZE_CAPTION_PREFIX: &str = "Beden: ";
