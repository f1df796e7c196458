//! Listing dates and the listing-date index.
//!
//! The listing date comes from an external per-SKU lookup. The index is
//! built once, before the pipeline runs, and only read afterwards.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// External per-SKU listing-date lookup (a database table in production).
pub trait ListingDateLookup {
    /// Raw date text for a SKU, `Ok(None)` when the SKU is unknown.
    fn listing_date(&self, sku: &str) -> Result<Option<String>, String>;
}

/// In-memory lookup, e.g. loaded from an export file.
impl ListingDateLookup for HashMap<String, String> {
    fn listing_date(&self, sku: &str) -> Result<Option<String>, String> {
        Ok(self.get(sku).cloned())
    }
}

/// Read-only SKU -> raw listing date text.
#[derive(Clone, Debug, Default)]
pub struct ListingDateIndex {
    dates: HashMap<String, String>,
}

impl ListingDateIndex {
    /// Query the lookup once per distinct SKU. Failed lookups are logged and
    /// left absent so the product is not excluded on their account.
    pub fn build<'a, L, I>(lookup: &L, skus: I) -> Self
    where
        L: ListingDateLookup + ?Sized,
        I: IntoIterator<Item = &'a str>,
    {
        let mut dates = HashMap::new();
        for sku in skus {
            if dates.contains_key(sku) {
                continue;
            }
            match lookup.listing_date(sku) {
                Ok(Some(date)) => {
                    dates.insert(sku.to_string(), date);
                }
                Ok(None) => {}
                Err(e) => log::warn!("listing date lookup failed for sku={}: {}", sku, e),
            }
        }
        Self { dates }
    }

    pub fn from_map(dates: HashMap<String, String>) -> Self {
        Self { dates }
    }

    pub fn get(&self, sku: &str) -> Option<&str> {
        self.dates.get(sku).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Parse a listing date. Text containing `T` is treated as an ISO datetime
/// (RFC 3339 with offset or `Z`, or naive); anything else as `YYYY-MM-DD`.
pub fn parse_listing_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.contains('T') {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.date_naive())
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").map(|dt| dt.date()))
            .ok()
    } else {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
    }
}
