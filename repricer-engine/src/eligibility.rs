//! Eligibility predicates.
//!
//! Five ordered gates decide which products get re-priced. They are pure
//! functions here; the pipeline wires each one into its own filter and
//! tags every removed product with the [`EligibilityStage`] that removed it.

use std::fmt;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::size_stock::SizeStock;

/// Marker counted by the structural check.
const STRUCTURE_MARKER: &str = "//";

/// The predicate that excluded a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EligibilityStage {
    /// A: the size-stock string needs at least three segments.
    Structure,
    /// A, second half: every `label : value` segment needs an integer stock.
    StockValues,
    /// B: total stock on sale below the floor, or not an integer.
    StockFloor,
    /// C: active-size ratio below the floor, or not an integer.
    SizeRatioFloor,
    /// D: inflation ratio missing or below the floor.
    InflationFloor,
    /// E: listed too recently to mark down.
    RecentListing,
}

impl EligibilityStage {
    pub const ALL: [EligibilityStage; 6] = [
        EligibilityStage::Structure,
        EligibilityStage::StockValues,
        EligibilityStage::StockFloor,
        EligibilityStage::SizeRatioFloor,
        EligibilityStage::InflationFloor,
        EligibilityStage::RecentListing,
    ];
}

impl fmt::Display for EligibilityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EligibilityStage::Structure => write!(f, "Structure"),
            EligibilityStage::StockValues => write!(f, "Stock Values"),
            EligibilityStage::StockFloor => write!(f, "Stock Floor"),
            EligibilityStage::SizeRatioFloor => write!(f, "Size Ratio Floor"),
            EligibilityStage::InflationFloor => write!(f, "Inflation Floor"),
            EligibilityStage::RecentListing => write!(f, "Recent Listing"),
        }
    }
}

/// Counts `//` in the raw string (non-overlapping occurrences).
pub fn has_min_separators(raw_size_stock: &str, min_separators: usize) -> bool {
    raw_size_stock.matches(STRUCTURE_MARKER).count() >= min_separators
}

/// Stage A. Enough segments, and every `label : value` segment carries an
/// integer stock.
pub fn is_well_structured(raw_size_stock: &str, min_separators: usize) -> bool {
    has_min_separators(raw_size_stock, min_separators)
        && SizeStock::<u32>::decode_strict(raw_size_stock).is_ok()
}

/// Integer field at or above a floor. Non-integer text fails.
pub fn meets_integer_floor(text: &str, floor: i64) -> bool {
    text.trim().parse::<i64>().map(|value| value >= floor).unwrap_or(false)
}

/// Stage D.
pub fn meets_inflation_floor(inflation: Option<Decimal>, floor: Decimal) -> bool {
    inflation.map(|ratio| ratio >= floor).unwrap_or(false)
}

/// Stage E. True when the product was listed on or after
/// `today - window_days`. An unknown date is never recent.
///
/// A window reaching past the calendar's range saturates: every listing is
/// recent for a huge positive window and none for a huge negative one.
pub fn is_recent_listing(listing_date: Option<NaiveDate>, today: NaiveDate, window_days: i64) -> bool {
    let Some(date) = listing_date else {
        return false;
    };
    match Duration::try_days(window_days).and_then(|window| today.checked_sub_signed(window)) {
        Some(cutoff) => date >= cutoff,
        None => window_days > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::{MIN_ACTIVE_SIZE_RATIO, MIN_SEGMENT_SEPARATORS, MIN_TOTAL_STOCK};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn two_segments_are_not_enough() {
        assert!(!is_well_structured("M : 30 // L : 40", MIN_SEGMENT_SEPARATORS));
        assert!(is_well_structured("S : 3 // M : 30 // L : 40", MIN_SEGMENT_SEPARATORS));
    }

    #[test]
    fn separator_count_is_non_overlapping() {
        assert!(!has_min_separators("S : 1 /// M : 2", MIN_SEGMENT_SEPARATORS));
        assert!(has_min_separators("S : 1 // M : 2 // L : 3", MIN_SEGMENT_SEPARATORS));
    }

    #[test]
    fn non_numeric_raw_stock_fails_structure() {
        assert!(!is_well_structured("S : 3 // M : x // L : 40", MIN_SEGMENT_SEPARATORS));
    }

    #[test]
    fn opaque_segments_do_not_fail_structure() {
        assert!(is_well_structured("STD // M : 30 // L : 40", MIN_SEGMENT_SEPARATORS));
    }

    #[test]
    fn stock_floor_is_inclusive() {
        assert!(!meets_integer_floor("24", MIN_TOTAL_STOCK));
        assert!(meets_integer_floor("25", MIN_TOTAL_STOCK));
        assert!(meets_integer_floor(" 90 ", MIN_TOTAL_STOCK));
    }

    #[test]
    fn non_integer_fields_fail_floors() {
        assert!(!meets_integer_floor("", MIN_TOTAL_STOCK));
        assert!(!meets_integer_floor("30.0", MIN_TOTAL_STOCK));
        assert!(!meets_integer_floor("many", MIN_ACTIVE_SIZE_RATIO));
    }

    #[test]
    fn size_ratio_floor_is_inclusive() {
        assert!(!meets_integer_floor("50", MIN_ACTIVE_SIZE_RATIO));
        assert!(meets_integer_floor("51", MIN_ACTIVE_SIZE_RATIO));
    }

    #[test]
    fn inflation_floor_rejects_missing_ratio() {
        let floor = Decimal::from(40);
        assert!(!meets_inflation_floor(None, floor));
        assert!(!meets_inflation_floor(Some(Decimal::new(3999, 2)), floor));
        assert!(meets_inflation_floor(Some(Decimal::from(40)), floor));
    }

    #[test]
    fn recency_window_is_inclusive() {
        let today = date(2024, 3, 10);
        assert!(is_recent_listing(Some(date(2024, 3, 5)), today, 5));
        assert!(is_recent_listing(Some(date(2024, 3, 12)), today, 5));
        assert!(!is_recent_listing(Some(date(2024, 3, 4)), today, 5));
        assert!(!is_recent_listing(None, today, 5));
    }

    #[test]
    fn oversized_windows_do_not_overflow() {
        let today = date(2024, 6, 15);
        assert!(is_recent_listing(Some(today), today, 1_000_000_000));
        assert!(is_recent_listing(Some(date(1900, 1, 1)), today, i64::MAX));
        assert!(!is_recent_listing(Some(today), today, -1_000_000_000));
        assert!(!is_recent_listing(None, today, i64::MAX));
    }

    #[test]
    fn stages_display_names() {
        assert_eq!(EligibilityStage::RecentListing.to_string(), "Recent Listing");
        assert_eq!(EligibilityStage::StockValues.to_string(), "Stock Values");
        assert_eq!(EligibilityStage::ALL.len(), 6);
    }
}
