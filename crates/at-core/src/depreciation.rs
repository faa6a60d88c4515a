//! Depreciation projections for asset value reports.
//!
//! Pure arithmetic, evaluated once per asset per requested year when building
//! report time series. Report parity depends on these exact semantics.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepreciationMethod {
    Straight,
    Declining,
}

impl FromStr for DepreciationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "straight" => Ok(DepreciationMethod::Straight),
            "declining" => Ok(DepreciationMethod::Declining),
            other => Err(format!("unknown depreciation method: {}", other)),
        }
    }
}

/// Value of an asset at `current_year`.
///
/// Age is clamped to `[0, years]`; a purchase in the future is worth 0.
/// Straight-line writes off `100/years` percent per year. Declining applies
/// `declining_percents[i]` for each elapsed year, treating a missing index as
/// 0%. Both methods floor at 0.
pub fn depreciated_value(
    price: f64,
    purchase_year: i32,
    current_year: i32,
    method: DepreciationMethod,
    years: u32,
    declining_percents: &[f64],
) -> f64 {
    if current_year < purchase_year {
        return 0.0;
    }
    if years == 0 {
        return 0.0;
    }
    let age = ((current_year - purchase_year) as u32).min(years);

    let value = match method {
        DepreciationMethod::Straight => {
            let rate_per_year = 100.0 / years as f64;
            price * (1.0 - (age as f64 * rate_per_year) / 100.0)
        }
        DepreciationMethod::Declining => {
            let mut value = price;
            for i in 0..age as usize {
                let percent = declining_percents.get(i).copied().unwrap_or(0.0);
                value *= 1.0 - percent / 100.0;
            }
            value
        }
    };

    value.max(0.0)
}

/// Year-by-year series from `from_year` through `to_year` inclusive.
pub fn depreciation_schedule(
    price: f64,
    purchase_year: i32,
    from_year: i32,
    to_year: i32,
    method: DepreciationMethod,
    years: u32,
    declining_percents: &[f64],
) -> Vec<(i32, f64)> {
    (from_year..=to_year)
        .map(|year| {
            (
                year,
                depreciated_value(price, purchase_year, year, method, years, declining_percents),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line_new_asset_keeps_full_value() {
        let v = depreciated_value(1000.0, 2020, 2020, DepreciationMethod::Straight, 4, &[]);
        assert_eq!(v, 1000.0);
    }

    #[test]
    fn test_straight_line_fully_written_off() {
        let v = depreciated_value(1000.0, 2020, 2024, DepreciationMethod::Straight, 4, &[]);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_straight_line_midlife() {
        let v = depreciated_value(1000.0, 2020, 2022, DepreciationMethod::Straight, 4, &[]);
        assert_eq!(v, 500.0);
    }

    #[test]
    fn test_declining_first_year() {
        let v = depreciated_value(
            1000.0,
            2020,
            2021,
            DepreciationMethod::Declining,
            4,
            &[50.0, 25.0, 12.5, 12.5],
        );
        assert_eq!(v, 500.0);
    }

    #[test]
    fn test_declining_percent_index_beyond_array_is_zero() {
        // only one percent supplied; years two and three depreciate by 0%
        let v = depreciated_value(1000.0, 2020, 2023, DepreciationMethod::Declining, 4, &[50.0]);
        assert_eq!(v, 500.0);
    }

    #[test]
    fn test_future_purchase_is_worthless() {
        let v = depreciated_value(1000.0, 2025, 2020, DepreciationMethod::Straight, 4, &[]);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_age_clamped_to_depreciation_span() {
        // ten years past a four-year span is the same as four years past it
        let at_span = depreciated_value(1000.0, 2010, 2014, DepreciationMethod::Straight, 4, &[]);
        let long_after = depreciated_value(1000.0, 2010, 2024, DepreciationMethod::Straight, 4, &[]);
        assert_eq!(at_span, long_after);
    }

    #[test]
    fn test_schedule_covers_requested_span() {
        let series = depreciation_schedule(
            1000.0,
            2020,
            2019,
            2022,
            DepreciationMethod::Straight,
            4,
            &[],
        );
        assert_eq!(series.len(), 4);
        assert_eq!(series[0], (2019, 0.0));
        assert_eq!(series[1], (2020, 1000.0));
        assert_eq!(series[3], (2022, 500.0));
    }
}
