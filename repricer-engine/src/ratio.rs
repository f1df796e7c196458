//! Sell-through ratios and the product-level inflation ratio.
//!
//! A sell-through ratio is current stock divided by historical sold count,
//! rounded half up. The inflation ratio compares every sufficiently stocked
//! size against the reference size (`36` or `S`, first one found):
//!
//! ```text
//! percentage = (reference - ratio) / reference * 100
//! inflation  = mean(percentages), 2 dp
//! ```
//!
//! A high inflation ratio means the reference size sells through much more
//! slowly than the rest of the run, i.e. the product is overstocked in the
//! sizes that matter and is a markdown candidate.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::size_stock::{is_reference_label, JoinedStock, SizeStock};

/// Decimal places kept on the inflation ratio.
const INFLATION_DP: u32 = 2;

/// `stock / sold` rounded half up; a zero sold count leaves stock as is.
pub fn sell_through_ratio(stock: u32, sold: u32) -> u32 {
    if sold == 0 {
        return stock;
    }
    let (stock64, sold64) = (u64::from(stock), u64::from(sold));
    // (2s + d) / 2d == floor(s/d + 1/2)
    u32::try_from((2 * stock64 + sold64) / (2 * sold64)).unwrap_or(stock)
}

/// Collapse joined entries into ratios. Order, labels and opaque segments
/// are preserved.
pub fn collapse_ratios(joined: &SizeStock<JoinedStock>) -> SizeStock<u32> {
    joined.map_sized(|_, entry| sell_through_ratio(entry.stock, entry.sold))
}

/// First entry carrying a reference label, in scan order.
pub fn reference_entry(ratios: &SizeStock<u32>) -> Option<(&str, u32)> {
    ratios
        .sized()
        .find(|(label, _)| is_reference_label(label))
        .map(|(label, ratio)| (label, *ratio))
}

/// Mean percentage deviation of the sampled sizes from the reference.
///
/// Returns `None` when there is no reference size, when the reference
/// ratio is zero, or when no other size reaches `min_sample`.
pub fn inflation_ratio(ratios: &SizeStock<u32>, min_sample: u32) -> Option<Decimal> {
    let (reference_label, reference) = reference_entry(ratios)?;
    if reference == 0 {
        return None;
    }
    let reference = Decimal::from(reference);

    let percentages: Vec<Decimal> = ratios
        .sized()
        .filter(|(label, ratio)| *label != reference_label && **ratio >= min_sample)
        .map(|(_, ratio)| (reference - Decimal::from(*ratio)) * Decimal::ONE_HUNDRED / reference)
        .collect();

    if percentages.is_empty() {
        return None;
    }

    let mean = percentages.iter().copied().sum::<Decimal>() / Decimal::from(percentages.len());
    Some(mean.round_dp_with_strategy(INFLATION_DP, RoundingStrategy::MidpointAwayFromZero))
}
