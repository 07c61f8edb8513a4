//! Series transforms.
//!
//! Pure functions over filtered values:
//! - [`signed_waterfall`]: apply the fixed element sign convention
//! - [`rebase_to_one`]: growth of one unit from each series' own first observation
//! - [`drawdown_peak`]: running maximum of a rebased series
//! - [`risk_metrics`]: volatility, mean return and a Sharpe-like ratio

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use vista_core::WaterfallElement;

// =============================================================================
// WATERFALL
// =============================================================================

/// How a waterfall bar is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Increment on the running sum.
    Relative,
    /// Absolute bar showing the running sum.
    Total,
}

/// One signed waterfall bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterfallBar {
    /// Element the bar represents.
    pub element: WaterfallElement,
    /// Raw magnitude times the element's sign.
    pub signed: f64,
    /// Relative or total.
    pub measure: Measure,
    /// Running sum of relative bars up to and including this one.
    pub running_total: f64,
}

/// Applies the element sign convention and orders bars by element.
///
/// The closing element is a `Total` bar. Its `running_total` is the sum of the
/// preceding relative bars, which is what a renderer draws for it.
pub fn signed_waterfall(
    values: impl IntoIterator<Item = (WaterfallElement, f64)>,
) -> Vec<WaterfallBar> {
    let mut values: Vec<_> = values.into_iter().collect();
    values.sort_by_key(|(element, _)| *element);

    let mut running = 0.0;
    values
        .into_iter()
        .map(|(element, raw)| {
            let signed = raw * element.sign();
            let measure = if element.is_total() {
                Measure::Total
            } else {
                running += signed;
                Measure::Relative
            };
            WaterfallBar {
                element,
                signed,
                measure,
                running_total: running,
            }
        })
        .collect()
}

/// Multiplies raw magnitudes, given in element order, by the sign vector.
pub fn apply_signs(raw: &[f64]) -> Vec<f64> {
    raw.iter()
        .zip(WaterfallElement::ALL)
        .map(|(value, element)| value * element.sign())
        .collect()
}

// =============================================================================
// RETURNS
// =============================================================================

/// Rebases a series to 1.0 at its own first usable observation.
///
/// Values before the anchor stay missing. Missing values after the anchor are
/// held at 1.0 rather than carried forward, matching the published charts.
/// Zero or non-finite closes cannot anchor the series.
pub fn rebase_to_one(series: &[Option<f64>]) -> Vec<Option<f64>> {
    let anchor = series
        .iter()
        .position(|v| matches!(v, Some(x) if x.is_finite() && *x != 0.0));

    let Some(anchor) = anchor else {
        return vec![None; series.len()];
    };
    let base = series[anchor].unwrap_or(1.0);

    series
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if i < anchor {
                None
            } else {
                Some(v.map_or(1.0, |x| x / base))
            }
        })
        .collect()
}

/// Running maximum of a rebased series; missing values stay missing.
pub fn drawdown_peak(rebased: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut peak: Option<f64> = None;
    rebased
        .iter()
        .map(|v| {
            let x = (*v)?;
            let p = peak.map_or(x, |p| p.max(x));
            peak = Some(p);
            Some(p)
        })
        .collect()
}

/// Period-over-period percent change of the observed closes.
///
/// Gaps are skipped, so each return spans consecutive observations.
pub fn pct_change(closes: &[Option<f64>]) -> Vec<f64> {
    let observed: Vec<f64> = closes.iter().filter_map(|v| *v).collect();
    observed.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Risk figures of one price series. Undefined values are NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Sample standard deviation of daily returns.
    pub volatility: f64,
    /// Mean daily return.
    pub mean_return: f64,
    /// `(mean - daily risk-free rate) / volatility`.
    pub sharpe: f64,
}

impl RiskMetrics {
    /// Sharpe ratio formatted for display, `"N/A"` when undefined.
    pub fn sharpe_display(&self) -> String {
        format_ratio(self.sharpe)
    }
}

/// Computes risk figures from raw closes.
///
/// Fewer than two returns, or zero volatility, leave the ratio undefined.
pub fn risk_metrics(closes: &[Option<f64>], daily_risk_free: f64) -> RiskMetrics {
    let returns = pct_change(closes);

    let mean_return = if returns.is_empty() {
        f64::NAN
    } else {
        returns.iter().mean()
    };
    let volatility = if returns.len() < 2 {
        f64::NAN
    } else {
        returns.iter().std_dev()
    };

    let sharpe = if volatility.is_finite() && volatility > f64::EPSILON {
        (mean_return - daily_risk_free) / volatility
    } else {
        f64::NAN
    };

    RiskMetrics {
        volatility,
        mean_return,
        sharpe,
    }
}

/// Formats a ratio to two decimals, `"N/A"` for NaN or infinite values.
pub fn format_ratio(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "N/A".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bars(raw: [f64; 7]) -> Vec<WaterfallBar> {
        signed_waterfall(WaterfallElement::ALL.into_iter().zip(raw))
    }

    #[test]
    fn test_sign_vector() {
        assert_eq!(
            apply_signs(&[100.0, 50.0, 20.0, 30.0, 10.0, 40.0, 150.0]),
            vec![100.0, 50.0, -20.0, 30.0, -10.0, 40.0, 150.0]
        );
    }

    #[test]
    fn test_waterfall_measures_and_total() {
        let bars = bars([100.0, 50.0, 20.0, 30.0, 10.0, 40.0, 150.0]);
        let signed: Vec<f64> = bars.iter().map(|b| b.signed).collect();
        assert_eq!(signed, vec![100.0, 50.0, -20.0, 30.0, -10.0, 40.0, 150.0]);

        assert!(bars[..6].iter().all(|b| b.measure == Measure::Relative));
        assert_eq!(bars[6].measure, Measure::Total);

        let first_six: f64 = signed[..6].iter().sum();
        assert_eq!(bars[6].running_total, first_six);
        assert_eq!(bars[6].running_total, 190.0);
    }

    #[test]
    fn test_waterfall_orders_by_element() {
        let bars = signed_waterfall(vec![
            (WaterfallElement::ReturnOnCapital, 5.0),
            (WaterfallElement::ReturnOfBuyout, 2.0),
            (WaterfallElement::PremiumTp, 7.0),
        ]);
        assert_eq!(bars[0].element, WaterfallElement::PremiumTp);
        assert_eq!(bars[1].signed, -2.0);
        assert_eq!(bars[2].running_total, 5.0);
    }

    #[test]
    fn test_rebase() {
        let out = rebase_to_one(&[Some(4.0), Some(2.0), Some(2.0), Some(8.0)]);
        assert_eq!(out, vec![Some(1.0), Some(0.5), Some(0.5), Some(2.0)]);
    }

    #[test]
    fn test_rebase_uses_own_first_valid_index() {
        let out = rebase_to_one(&[None, None, Some(10.0), Some(15.0)]);
        assert_eq!(out, vec![None, None, Some(1.0), Some(1.5)]);
    }

    #[test]
    fn test_rebase_holds_gaps_at_one() {
        // Known limitation: a gap after the anchor reads as "back to 1.0",
        // not as the previous level.
        let out = rebase_to_one(&[Some(2.0), Some(4.0), None, Some(6.0)]);
        assert_eq!(out, vec![Some(1.0), Some(2.0), Some(1.0), Some(3.0)]);
    }

    #[test]
    fn test_rebase_all_missing() {
        assert_eq!(rebase_to_one(&[None, None]), vec![None, None]);
        assert!(rebase_to_one(&[]).is_empty());
    }

    #[test]
    fn test_drawdown_peak() {
        let out = drawdown_peak(&[Some(1.0), Some(0.5), Some(0.5), Some(2.0)]);
        assert_eq!(out, vec![Some(1.0), Some(1.0), Some(1.0), Some(2.0)]);
        assert_eq!(drawdown_peak(&[None, Some(1.0)]), vec![None, Some(1.0)]);
    }

    #[test]
    fn test_pct_change_skips_gaps() {
        let returns = pct_change(&[Some(100.0), None, Some(110.0), Some(99.0)]);
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(returns[1], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_series_ratio_is_na() {
        let metrics = risk_metrics(&[Some(5.0); 10], 0.0001);
        assert_eq!(metrics.volatility, 0.0);
        assert!(metrics.sharpe.is_nan());
        assert_eq!(metrics.sharpe_display(), "N/A");
    }

    #[test]
    fn test_degenerate_lengths_are_na() {
        assert!(risk_metrics(&[], 0.0).sharpe.is_nan());
        assert!(risk_metrics(&[Some(1.0)], 0.0).sharpe.is_nan());
        assert!(risk_metrics(&[Some(1.0), Some(2.0)], 0.0).sharpe.is_nan());
    }

    #[test]
    fn test_sharpe() {
        let closes = [Some(100.0), Some(101.0), Some(100.0), Some(102.0)];
        let metrics = risk_metrics(&closes, 0.0);

        let r = [0.01, 100.0 / 101.0 - 1.0, 0.02];
        let mean = r.iter().sum::<f64>() / 3.0;
        let var = r.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 2.0;

        assert_relative_eq!(metrics.mean_return, mean, epsilon = 1e-12);
        assert_relative_eq!(metrics.volatility, var.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(metrics.sharpe, mean / var.sqrt(), epsilon = 1e-9);
        assert_eq!(metrics.sharpe_display(), format!("{:.2}", mean / var.sqrt()));
    }
}
