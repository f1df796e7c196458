//! Historical sales index and the sales join.
//!
//! Order lines are keyed by a normalized SKU (first three dot-separated
//! components) and the size caption, and their quantities summed. The join
//! pairs each raw per-size stock count with that sum.
//!
//! Returns can outweigh sales, so a sum may be negative. Such a size is
//! written as `stock--n`, which does not split back into two counts; it
//! stays opaque and never enters the ratio math.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::size_stock::{JoinedStock, SizeStock};
use crate::thresholds::{JOINED_SEPARATOR, LABEL_SEPARATOR, SIZE_CAPTION_PREFIX};

/// Number of dot-separated SKU components that identify a product family.
const SKU_FAMILY_COMPONENTS: usize = 3;

/// One row of the order export, as text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderLine {
    pub sku: String,
    pub quantity: String,
    pub size: String,
}

/// Keep only the first three dot-separated components of a SKU that has at
/// least three dots. Shorter SKUs are returned unchanged.
pub fn normalized_sku(sku: &str) -> &str {
    match sku.match_indices('.').nth(SKU_FAMILY_COMPONENTS - 1) {
        Some((third_dot, _)) => &sku[..third_dot],
        None => sku,
    }
}

/// Size label as used for indexing: caption prefix removed, trimmed.
pub fn normalized_size_label(size: &str) -> &str {
    size.strip_prefix(SIZE_CAPTION_PREFIX).unwrap_or(size).trim()
}

/// Parse a quantity that may use a comma as decimal separator. Anything
/// non-numeric counts as zero.
pub fn parse_quantity(text: &str) -> Decimal {
    Decimal::from_str(text.trim().replace(',', ".").as_str()).unwrap_or(Decimal::ZERO)
}

/// Read-only map `(normalized SKU, size label) -> summed quantity`.
#[derive(Clone, Debug, Default)]
pub struct HistoricalSalesIndex {
    sold: HashMap<(String, String), Decimal>,
}

impl HistoricalSalesIndex {
    pub fn from_order_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a OrderLine>,
    {
        let mut sold: HashMap<(String, String), Decimal> = HashMap::new();
        for line in lines {
            let key = (
                normalized_sku(line.sku.trim()).to_string(),
                normalized_size_label(&line.size).to_string(),
            );
            *sold.entry(key).or_insert(Decimal::ZERO) += parse_quantity(&line.quantity);
        }
        Self { sold }
    }

    pub fn len(&self) -> usize {
        self.sold.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sold.is_empty()
    }

    /// Summed quantity for a SKU and size, if any order line matched.
    pub fn total(&self, sku: &str, label: &str) -> Option<Decimal> {
        self.sold
            .get(&(normalized_sku(sku).to_string(), label.to_string()))
            .copied()
    }

    /// Sold count used by the join: truncated toward zero, absent totals
    /// count as zero. Net returns make it negative.
    pub fn sold_count(&self, sku: &str, label: &str) -> i64 {
        self.total(sku, label)
            .and_then(|total| total.trunc().to_i64())
            .unwrap_or(0)
    }
}

/// Pair every raw stock count with its historical sold count. Total: a
/// missing index entry is a sold count of zero.
pub fn join_sales(
    raw: &SizeStock<u32>,
    sku: &str,
    index: &HistoricalSalesIndex,
) -> SizeStock<JoinedStock> {
    raw.try_map_sized(|label, stock| {
        let sold = index.sold_count(sku, label);
        u32::try_from(sold)
            .map(|sold| JoinedStock { stock: *stock, sold })
            .map_err(|_| format!("{}{}{}{}{}", label, LABEL_SEPARATOR, stock, JOINED_SEPARATOR, sold))
    })
}
