//! Chart assembly.
//!
//! Turns transformed series into [`ChartSpec`]s. Assemblers are pure: the same
//! input always yields the same chart, and an empty input yields a neutral one.

use std::collections::BTreeMap;

use vista_core::{AlmBasis, FactTable, PortfolioBasis, Scenario, WaterfallElement};
use vista_traits::market_data::PriceHistory;
use vista_traits::Ticker;

use crate::baseline::BaselineSnapshot;
use crate::chart::{
    palette, AxisValue, BarStyle, ChartSpec, Connector, Delta, DrawMode, LineStyle, Margin, Trace,
    BAR_WIDTH,
};
use crate::error::EngineError;
use crate::filter::{filter, FactFilter};
use crate::transform::{drawdown_peak, rebase_to_one, WaterfallBar};

/// Margins of a KPI card.
pub const KPI_MARGIN: Margin = Margin {
    l: 20,
    r: 20,
    t: 30,
    b: 20,
};

/// Currency prefix of KPI values.
pub const CURRENCY_PREFIX: &str = "£";

/// Waterfall chart of one selection, legend hidden.
pub fn assemble_waterfall(bars: &[WaterfallBar]) -> ChartSpec {
    if bars.is_empty() {
        return ChartSpec::empty().with_legend(false);
    }

    let trace = Trace::Waterfall {
        x: bars.iter().map(|b| b.element.label().to_string()).collect(),
        y: bars.iter().map(|b| b.signed).collect(),
        measure: bars.iter().map(|b| b.measure).collect(),
        textposition: "outside".to_string(),
        hovertemplate: crate::chart::WATERFALL_HOVER.to_string(),
        increasing: BarStyle::filled(palette::ORANGE),
        decreasing: BarStyle::filled(palette::RED),
        totals: BarStyle::filled(palette::PINK),
        connector: Connector::default(),
        width: BAR_WIDTH,
    };

    ChartSpec::new(vec![trace]).with_legend(false)
}

/// Formats a currency amount as whole units with the `£` prefix.
pub fn format_currency(value: f64) -> String {
    if value.is_finite() {
        format!("{CURRENCY_PREFIX}{value:.0}")
    } else {
        "N/A".to_string()
    }
}

/// One indicator card per waterfall element, each with a delta against the baseline.
///
/// Live values are matched to the baseline by element. An empty live selection
/// yields one neutral card per element. Any difference between the live and
/// baseline element sets is a [`EngineError::BaselineMismatch`].
pub fn assemble_kpis(
    live: &BTreeMap<WaterfallElement, f64>,
    baseline: &BaselineSnapshot,
) -> Result<Vec<ChartSpec>, EngineError> {
    if live.is_empty() {
        return Ok(WaterfallElement::ALL
            .iter()
            .map(|_| ChartSpec::empty().with_margin(KPI_MARGIN))
            .collect());
    }

    let reference = baseline.values();
    let missing_in_baseline: Vec<String> = live
        .keys()
        .filter(|e| !reference.contains_key(e))
        .map(|e| e.label().to_string())
        .collect();
    let missing_in_live: Vec<String> = reference
        .keys()
        .filter(|e| !live.contains_key(e))
        .map(|e| e.label().to_string())
        .collect();

    if !missing_in_baseline.is_empty() || !missing_in_live.is_empty() {
        return Err(EngineError::BaselineMismatch {
            missing_in_baseline,
            missing_in_live,
        });
    }

    Ok(live
        .iter()
        .map(|(&element, &value)| {
            let reference = reference.get(&element).copied().unwrap_or(value);
            let trace = Trace::Indicator {
                title: element.label().to_string(),
                value,
                delta: Delta {
                    reference,
                    value: value - reference,
                },
                prefix: CURRENCY_PREFIX.to_string(),
                display: format_currency(value),
                title_color: palette::DARK_GREY.to_string(),
                number_color: palette::GREY.to_string(),
            };
            ChartSpec::new(vec![trace])
                .with_legend(false)
                .with_margin(KPI_MARGIN)
        })
        .collect())
}

/// Rebased price lines, one per ticker, with optional dashed running-peak lines.
///
/// `labels` maps tickers to display names; unknown tickers use their symbol.
pub fn assemble_returns(
    history: &PriceHistory,
    drawdown: bool,
    labels: &BTreeMap<Ticker, String>,
) -> ChartSpec {
    if history.is_empty() {
        return ChartSpec::empty();
    }

    let x: Vec<AxisValue> = history.dates().iter().copied().map(AxisValue::Date).collect();
    let mut traces = Vec::with_capacity(history.series().len() * 2);

    for (i, series) in history.series().iter().enumerate() {
        let name = labels
            .get(&series.ticker)
            .cloned()
            .unwrap_or_else(|| series.ticker.to_string());
        let color = palette::series(i).to_string();
        let rebased = rebase_to_one(&series.closes);

        if drawdown {
            traces.push(Trace::Line {
                name: format!("{name} peak"),
                x: x.clone(),
                y: drawdown_peak(&rebased),
                mode: DrawMode::Lines,
                line: LineStyle {
                    color: color.clone(),
                    dash: Some("dash".to_string()),
                },
            });
        }

        traces.push(Trace::Line {
            name,
            x: x.clone(),
            y: rebased,
            mode: DrawMode::Lines,
            line: LineStyle { color, dash: None },
        });
    }

    ChartSpec::new(traces)
}

/// Value by year, one line per scenario, for one portfolio and ALM basis.
pub fn assemble_alm(table: &FactTable, portfolio: PortfolioBasis, basis: AlmBasis) -> ChartSpec {
    let traces: Vec<Trace> = Scenario::ALL
        .iter()
        .enumerate()
        .filter_map(|(i, &scenario)| {
            let predicate = FactFilter::new()
                .portfolio(portfolio)
                .basis(basis)
                .scenario(scenario);
            let mut points: Vec<(i64, f64)> = filter(table, &predicate)
                .into_iter()
                .map(|row| (i64::from(row.key.year.value()), row.value))
                .collect();
            if points.is_empty() {
                return None;
            }
            points.sort_by_key(|(year, _)| *year);

            Some(Trace::Line {
                name: scenario.label().to_string(),
                x: points.iter().map(|(year, _)| AxisValue::Int(*year)).collect(),
                y: points.iter().map(|(_, value)| Some(*value)).collect(),
                mode: DrawMode::LinesMarkers,
                line: LineStyle {
                    color: palette::series(i).to_string(),
                    dash: None,
                },
            })
        })
        .collect();

    ChartSpec::new(traces).with_title(format!("{} / {}", portfolio.label(), basis.label()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{signed_waterfall, Measure};
    use chrono::NaiveDate;
    use vista_core::{FactKind, FactRow, Year};
    use vista_traits::market_data::PriceSeries;

    fn full_live(scale: f64) -> BTreeMap<WaterfallElement, f64> {
        WaterfallElement::ALL
            .iter()
            .map(|&e| (e, f64::from(e.code()) * scale))
            .collect()
    }

    fn baseline_table() -> FactTable {
        let rows = WaterfallElement::ALL
            .iter()
            .map(|&e| {
                FactRow::new(
                    Year::REFERENCE,
                    PortfolioBasis::Simple,
                    AlmBasis::BoBase,
                    Scenario::Base,
                    f64::from(e.code()),
                )
                .with_element(e)
            })
            .collect();
        FactTable::new(FactKind::Waterfall, rows).unwrap()
    }

    #[test]
    fn test_waterfall_chart() {
        let bars = signed_waterfall(
            WaterfallElement::ALL
                .into_iter()
                .zip([100.0, 50.0, 20.0, 30.0, 10.0, 40.0, 150.0]),
        );
        let chart = assemble_waterfall(&bars);
        assert!(!chart.layout.showlegend);
        assert_eq!(chart.layout.template, "plotly_white");

        let Trace::Waterfall { x, y, measure, .. } = &chart.traces[0] else {
            panic!("expected a waterfall trace");
        };
        assert_eq!(x[6], "Return on Capital in");
        assert_eq!(y, &vec![100.0, 50.0, -20.0, 30.0, -10.0, 40.0, 150.0]);
        assert_eq!(measure[6], Measure::Total);
    }

    #[test]
    fn test_empty_waterfall_is_neutral() {
        assert!(assemble_waterfall(&[]).is_empty());
    }

    #[test]
    fn test_kpis_carry_reference_and_delta() {
        let baseline = BaselineSnapshot::capture(&baseline_table());
        let cards = assemble_kpis(&full_live(10.0), &baseline).unwrap();
        assert_eq!(cards.len(), 7);
        assert_eq!(cards[0].layout.margin, Some(KPI_MARGIN));

        let Trace::Indicator {
            title,
            value,
            delta,
            display,
            title_color,
            number_color,
            ..
        } = &cards[3].traces[0]
        else {
            panic!("expected an indicator");
        };
        assert_eq!(title, "Capital Buffer");
        assert_eq!(*value, 30.0);
        assert_eq!(delta.reference, 3.0);
        assert_eq!(delta.value, 27.0);
        assert_eq!(display, "£30");
        assert_eq!(title_color, "#333333");
        assert_eq!(number_color, "#7E7E7E");
    }

    #[test]
    fn test_kpis_missing_live_element_is_mismatch() {
        let baseline = BaselineSnapshot::capture(&baseline_table());
        let mut live = full_live(1.0);
        live.remove(&WaterfallElement::BenefitsPaid);

        match assemble_kpis(&live, &baseline) {
            Err(EngineError::BaselineMismatch {
                missing_in_baseline,
                missing_in_live,
            }) => {
                assert!(missing_in_baseline.is_empty());
                assert_eq!(missing_in_live, vec!["Benefits Paid".to_string()]);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_kpis_empty_baseline_is_mismatch() {
        let baseline = BaselineSnapshot::default();
        assert!(matches!(
            assemble_kpis(&full_live(1.0), &baseline),
            Err(EngineError::BaselineMismatch { .. })
        ));
    }

    #[test]
    fn test_kpis_empty_live_is_neutral() {
        let baseline = BaselineSnapshot::capture(&baseline_table());
        let cards = assemble_kpis(&BTreeMap::new(), &baseline).unwrap();
        assert_eq!(cards.len(), 7);
        assert!(cards.iter().all(ChartSpec::is_empty));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.56), "£1235");
        assert_eq!(format_currency(-20.0), "£-20");
        assert_eq!(format_currency(f64::NAN), "N/A");
    }

    #[test]
    fn test_returns_chart_with_drawdown() {
        let d = |day| NaiveDate::from_ymd_opt(2022, 1, day).unwrap();
        let history = PriceHistory::new(
            vec![d(3), d(4), d(5), d(6)],
            vec![PriceSeries {
                ticker: Ticker::new("AAA"),
                closes: vec![Some(4.0), Some(2.0), Some(2.0), Some(8.0)],
            }],
        )
        .unwrap();
        let labels = BTreeMap::from([(Ticker::new("AAA"), "Alpha".to_string())]);

        let chart = assemble_returns(&history, true, &labels);
        assert_eq!(chart.traces.len(), 2);

        let Trace::Line { name, y, line, .. } = &chart.traces[0] else {
            panic!("expected a line");
        };
        assert_eq!(name, "Alpha peak");
        assert_eq!(y, &vec![Some(1.0), Some(1.0), Some(1.0), Some(2.0)]);
        assert_eq!(line.dash.as_deref(), Some("dash"));

        let Trace::Line { name, y, .. } = &chart.traces[1] else {
            panic!("expected a line");
        };
        assert_eq!(name, "Alpha");
        assert_eq!(y, &vec![Some(1.0), Some(0.5), Some(0.5), Some(2.0)]);

        let plain = assemble_returns(&history, false, &BTreeMap::new());
        assert_eq!(plain.traces.len(), 1);
    }

    #[test]
    fn test_returns_of_empty_history_is_neutral() {
        assert!(assemble_returns(&PriceHistory::empty(), true, &BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_alm_fan() {
        let mut rows = Vec::new();
        for year in [2, 1] {
            for scenario in [Scenario::Base, Scenario::Downside] {
                rows.push(FactRow::new(
                    Year::new(year).unwrap(),
                    PortfolioBasis::Credit,
                    AlmBasis::BoDownside,
                    scenario,
                    f64::from(year as u8) * 10.0,
                ));
            }
        }
        let table = FactTable::new(FactKind::Alm, rows).unwrap();

        let chart = assemble_alm(&table, PortfolioBasis::Credit, AlmBasis::BoDownside);
        assert_eq!(chart.traces.len(), 2);
        let Trace::Line { name, x, y, .. } = &chart.traces[0] else {
            panic!("expected a line");
        };
        assert_eq!(name, "Base");
        assert_eq!(x, &vec![AxisValue::Int(1), AxisValue::Int(2)]);
        assert_eq!(y, &vec![Some(10.0), Some(20.0)]);

        assert!(assemble_alm(&table, PortfolioBasis::Simple, AlmBasis::BoBase).is_empty());
    }
}
