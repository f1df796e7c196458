//! Discount tiers and psychological price rounding.
//!
//! Prices are `Decimal` end to end so that distance ties in the rounding
//! step are exact and the first candidate reliably wins.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::thresholds::{
    MIN_INFLATION_RATIO, MODERATE_DISCOUNT_PCT, MODERATE_TIER_CEILING, STEEP_DISCOUNT_PCT,
};

/// Fixed bands `[low, high]` (inclusive) that snap straight to a ".99"
/// price just under the round hundred. Target is in cents.
const PRICE_BANDS: [(i64, i64, i64); 5] = [
    (100, 105, 9_999),
    (200, 207, 19_999),
    (300, 309, 29_999),
    (400, 412, 39_999),
    (500, 520, 49_999),
];

/// Candidate offsets from the price's tens, in cents, in tie-break order.
const TARGET_OFFSETS: [i64; 5] = [-501, -1, 499, 999, 1_499];

/// Inflation-ratio tiers and the discount each one earns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTiers {
    /// Lowest inflation ratio that earns any discount.
    pub floor: Decimal,
    /// Highest inflation ratio (inclusive) of the moderate tier.
    pub moderate_ceiling: Decimal,
    /// Fraction taken off in the moderate tier.
    pub moderate_rate: Decimal,
    /// Fraction taken off above the moderate tier.
    pub steep_rate: Decimal,
}

impl Default for DiscountTiers {
    fn default() -> Self {
        Self {
            floor: Decimal::from(MIN_INFLATION_RATIO),
            moderate_ceiling: Decimal::from(MODERATE_TIER_CEILING),
            moderate_rate: Decimal::new(MODERATE_DISCOUNT_PCT, 2),
            steep_rate: Decimal::new(STEEP_DISCOUNT_PCT, 2),
        }
    }
}

impl DiscountTiers {
    /// Discount fraction for an inflation ratio; zero outside the tiers.
    pub fn rate_for(&self, inflation: Decimal) -> Decimal {
        if inflation >= self.floor && inflation <= self.moderate_ceiling {
            self.moderate_rate
        } else if inflation > self.moderate_ceiling {
            self.steep_rate
        } else {
            Decimal::ZERO
        }
    }
}

/// Parse a list price, accepting a comma as the decimal separator.
pub fn parse_price(text: &str) -> Option<Decimal> {
    Decimal::from_str(text.trim().replace(',', ".").as_str()).ok()
}

pub fn discounted_price(price: Decimal, inflation: Decimal, tiers: &DiscountTiers) -> Decimal {
    price * (Decimal::ONE - tiers.rate_for(inflation))
}

/// Snap a price to the nearest psychological price point.
///
/// Prices inside one of the fixed bands map to that band's ".99" target.
/// Otherwise the candidates `tens - 5.01`, `tens - 0.01`, `tens + 4.99`,
/// `tens + 9.99` and `tens + 14.99` are tried in that order, keeping only
/// positive ones, and the closest wins (earlier candidate on ties).
/// A price of zero or less has no price point and is returned as is.
pub fn round_price(price: Decimal) -> Decimal {
    if price <= Decimal::ZERO {
        return price;
    }

    if let Some(&(_, _, target)) = PRICE_BANDS
        .iter()
        .find(|(low, high, _)| price >= Decimal::from(*low) && price <= Decimal::from(*high))
    {
        return Decimal::new(target, 2);
    }

    let tens = (price.floor() / Decimal::TEN).floor() * Decimal::TEN;
    let mut closest: Option<(Decimal, Decimal)> = None;
    for offset in TARGET_OFFSETS {
        let candidate = tens + Decimal::new(offset, 2);
        if candidate <= Decimal::ZERO {
            continue;
        }
        let distance = (price - candidate).abs();
        match closest {
            Some((_, best)) if distance >= best => {}
            _ => closest = Some((candidate, distance)),
        }
    }
    closest.map(|(candidate, _)| candidate).unwrap_or(price)
}

/// Full pricing step: parse, discount by tier, round. Any missing or
/// unparsable input yields `None`.
pub fn reprice(price_text: &str, inflation: Option<Decimal>, tiers: &DiscountTiers) -> Option<Decimal> {
    let inflation = inflation?;
    let price = parse_price(price_text)?;
    Some(round_price(discounted_price(price, inflation, tiers)))
}
