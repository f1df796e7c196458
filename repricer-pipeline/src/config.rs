//! Run configuration.
//!
//! Every threshold has a default in `repricer_engine::thresholds`; the
//! `REPRICER_*` environment variables override them.

use std::env;
use std::str::FromStr;

use repricer_engine::pricing::DiscountTiers;
use repricer_engine::thresholds::{
    MIN_ACTIVE_SIZE_RATIO, MIN_SAMPLE_RATIO, MIN_SEGMENT_SEPARATORS, MIN_TOTAL_STOCK,
    RECENT_LISTING_DAYS,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Thresholds and tiers for one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepricingConfig {
    /// Minimum `//` count in the size-stock string.
    pub min_segment_separators: usize,
    pub min_total_stock: i64,
    pub min_active_size_ratio: i64,
    /// Sizes with a sell-through ratio below this are left out of the
    /// inflation mean.
    pub min_sample_ratio: u32,
    /// Products listed within this many days are not marked down.
    pub recent_listing_days: i64,
    /// Discount tiers. `floor` doubles as the inflation eligibility floor.
    pub discount_tiers: DiscountTiers,
}

impl Default for RepricingConfig {
    fn default() -> Self {
        Self {
            min_segment_separators: MIN_SEGMENT_SEPARATORS,
            min_total_stock: MIN_TOTAL_STOCK,
            min_active_size_ratio: MIN_ACTIVE_SIZE_RATIO,
            min_sample_ratio: MIN_SAMPLE_RATIO,
            recent_listing_days: RECENT_LISTING_DAYS,
            discount_tiers: DiscountTiers::default(),
        }
    }
}

impl RepricingConfig {
    /// Defaults overridden by `REPRICER_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`RepricingConfig::from_env`] with an explicit variable
    /// source.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let tiers = defaults.discount_tiers;

        let config = Self {
            min_segment_separators: read_var(
                &lookup,
                "REPRICER_MIN_SEGMENT_SEPARATORS",
                defaults.min_segment_separators,
            )?,
            min_total_stock: read_var(&lookup, "REPRICER_MIN_TOTAL_STOCK", defaults.min_total_stock)?,
            min_active_size_ratio: read_var(
                &lookup,
                "REPRICER_MIN_ACTIVE_SIZE_RATIO",
                defaults.min_active_size_ratio,
            )?,
            min_sample_ratio: read_var(&lookup, "REPRICER_MIN_SAMPLE_RATIO", defaults.min_sample_ratio)?,
            recent_listing_days: read_var(
                &lookup,
                "REPRICER_RECENT_LISTING_DAYS",
                defaults.recent_listing_days,
            )?,
            discount_tiers: DiscountTiers {
                floor: read_var(&lookup, "REPRICER_MIN_INFLATION_RATIO", tiers.floor)?,
                moderate_ceiling: read_var(
                    &lookup,
                    "REPRICER_MODERATE_TIER_CEILING",
                    tiers.moderate_ceiling,
                )?,
                moderate_rate: read_var(&lookup, "REPRICER_MODERATE_DISCOUNT_RATE", tiers.moderate_rate)?,
                steep_rate: read_var(&lookup, "REPRICER_STEEP_DISCOUNT_RATE", tiers.steep_rate)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let tiers = &self.discount_tiers;
        if tiers.moderate_ceiling < tiers.floor {
            return Err(ConfigError::Inconsistent(format!(
                "moderate tier ceiling {} is below the inflation floor {}",
                tiers.moderate_ceiling, tiers.floor
            )));
        }
        for (name, rate) in [("moderate", tiers.moderate_rate), ("steep", tiers.steep_rate)] {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                return Err(ConfigError::Inconsistent(format!(
                    "{} discount rate {} must be in [0, 1)",
                    name, rate
                )));
            }
        }
        if self.recent_listing_days < 0 {
            return Err(ConfigError::Inconsistent(format!(
                "recent listing window must not be negative, got {}",
                self.recent_listing_days
            )));
        }
        Ok(())
    }
}

fn read_var<F, T>(lookup: &F, var: &str, default: T) -> ConfigResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                value,
            })
        }
        _ => Ok(default),
    }
}
