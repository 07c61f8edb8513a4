//! Dimension filter.
//!
//! Exact-match selection over the categorical columns of a [`FactTable`], and
//! closed-interval date selection over a [`PriceHistory`]. Filters never fail
//! at evaluation time: a predicate that matches nothing returns an empty result.

use serde::{Deserialize, Serialize};

use vista_core::{
    AlmBasis, DateRange, Dimension, FactKey, FactRow, FactTable, PortfolioBasis, Scenario,
    Selection, VistaError, VistaResult, WaterfallElement, Year,
};
use vista_traits::market_data::{PriceHistory, PriceSeries};

/// Conjunction of per-column equality predicates. Unset columns match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactFilter {
    /// Required year.
    pub year: Option<Year>,
    /// Required portfolio basis.
    pub portfolio: Option<PortfolioBasis>,
    /// Required ALM basis.
    pub basis: Option<AlmBasis>,
    /// Required scenario.
    pub scenario: Option<Scenario>,
    /// Required waterfall element.
    pub element: Option<WaterfallElement>,
}

impl FactFilter {
    /// Filter matching every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on all four slicer dimensions of a selection.
    pub fn from_selection(selection: &Selection) -> Self {
        Self {
            year: Some(selection.year),
            portfolio: Some(selection.portfolio),
            basis: Some(selection.basis),
            scenario: Some(selection.scenario),
            element: None,
        }
    }

    /// Require a year.
    pub fn year(mut self, year: Year) -> Self {
        self.year = Some(year);
        self
    }

    /// Require a portfolio basis.
    pub fn portfolio(mut self, portfolio: PortfolioBasis) -> Self {
        self.portfolio = Some(portfolio);
        self
    }

    /// Require an ALM basis.
    pub fn basis(mut self, basis: AlmBasis) -> Self {
        self.basis = Some(basis);
        self
    }

    /// Require a scenario.
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Require a waterfall element.
    pub fn element(mut self, element: WaterfallElement) -> Self {
        self.element = Some(element);
        self
    }

    /// Adds a predicate from an untyped `(column name, integer code)` pair.
    pub fn with_column(self, column: &str, value: &str) -> VistaResult<Self> {
        let dimension = Dimension::from_column_name(column)?;
        let code: i64 = value
            .trim()
            .parse()
            .map_err(|_| VistaError::invalid_value(dimension.column_name(), value))?;

        Ok(match dimension {
            Dimension::Year => self.year(Year::new(code)?),
            Dimension::PortfolioBasis => self.portfolio(PortfolioBasis::from_code(code)?),
            Dimension::AlmBasis => self.basis(AlmBasis::from_code(code)?),
            Dimension::Quantile => self.scenario(Scenario::from_code(code)?),
            Dimension::WaterfallElement => self.element(WaterfallElement::from_code(code)?),
        })
    }

    /// Builds a filter from a column-name to code mapping.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> VistaResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |f, (k, v)| f.with_column(k.as_ref(), v.as_ref()))
    }

    /// Returns true if `row` satisfies every set predicate.
    pub fn matches(&self, row: &FactRow) -> bool {
        let key = &row.key;
        self.year.map_or(true, |y| key.year == y)
            && self.portfolio.map_or(true, |p| key.portfolio == p)
            && self.basis.map_or(true, |b| key.basis == b)
            && self.scenario.map_or(true, |s| key.scenario == s)
            && self.element.map_or(true, |e| key.element == Some(e))
    }

    /// The full key when every column the table is keyed by is pinned.
    fn full_key(&self, table: &FactTable) -> Option<FactKey> {
        let element = if table.kind().has_element() {
            Some(self.element?)
        } else if self.element.is_some() {
            return None;
        } else {
            None
        };

        Some(FactKey {
            year: self.year?,
            portfolio: self.portfolio?,
            basis: self.basis?,
            scenario: self.scenario?,
            element,
        })
    }
}

/// Rows of `table` matching `filter`, in table order.
pub fn filter<'a>(table: &'a FactTable, filter: &FactFilter) -> Vec<&'a FactRow> {
    if let Some(key) = filter.full_key(table) {
        return table.get(&key).into_iter().collect();
    }
    table.rows().iter().filter(|row| filter.matches(row)).collect()
}

/// Observations of `history` inside the closed interval `range`.
///
/// Dates outside the interval are dropped; gaps inside it are left as they are.
pub fn filter_dates(history: &PriceHistory, range: DateRange) -> PriceHistory {
    let keep: Vec<usize> = history
        .dates()
        .iter()
        .enumerate()
        .filter(|(_, d)| range.contains(**d))
        .map(|(i, _)| i)
        .collect();

    let dates = keep.iter().map(|&i| history.dates()[i]).collect();
    let series = history
        .series()
        .iter()
        .map(|s| PriceSeries {
            ticker: s.ticker.clone(),
            closes: keep.iter().map(|&i| s.closes[i]).collect(),
        })
        .collect();

    PriceHistory::new(dates, series).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vista_core::FactKind;
    use vista_traits::Ticker;

    fn waterfall_table() -> FactTable {
        let mut rows = Vec::new();
        for year in [1, 7] {
            for scenario in Scenario::ALL {
                for element in WaterfallElement::ALL {
                    rows.push(
                        FactRow::new(
                            Year::new(year).unwrap(),
                            PortfolioBasis::Simple,
                            AlmBasis::BoBase,
                            scenario,
                            f64::from(element.code()) + f64::from(scenario.code()) * 10.0,
                        )
                        .with_element(element),
                    );
                }
            }
        }
        FactTable::new(FactKind::Waterfall, rows).unwrap()
    }

    #[test]
    fn test_full_tuple_returns_one_row() {
        let table = waterfall_table();
        let f = FactFilter::from_selection(&Selection::reference())
            .element(WaterfallElement::CapitalBuffer);
        let rows = filter(&table, &f);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 13.0);
    }

    #[test]
    fn test_selection_returns_all_elements_in_order() {
        let table = waterfall_table();
        let rows = filter(&table, &FactFilter::from_selection(&Selection::reference()));
        let elements: Vec<_> = rows.iter().filter_map(|r| r.key.element).collect();
        assert_eq!(elements, WaterfallElement::ALL.to_vec());
    }

    #[test]
    fn test_absent_tuple_is_empty() {
        let table = waterfall_table();
        let f = FactFilter::new()
            .year(Year::new(3).unwrap())
            .portfolio(PortfolioBasis::Simple);
        assert!(filter(&table, &f).is_empty());

        let f = FactFilter::from_selection(&Selection::reference())
            .portfolio(PortfolioBasis::Credit)
            .element(WaterfallElement::PremiumTp);
        assert!(filter(&table, &f).is_empty());
    }

    #[test]
    fn test_element_predicate_on_alm_table_matches_nothing() {
        let table = FactTable::new(
            FactKind::Alm,
            vec![FactRow::new(
                Year::REFERENCE,
                PortfolioBasis::Simple,
                AlmBasis::BoBase,
                Scenario::Base,
                1.0,
            )],
        )
        .unwrap();
        let f = FactFilter::from_selection(&Selection::reference()).element(WaterfallElement::PremiumTp);
        assert!(filter(&table, &f).is_empty());
        assert_eq!(
            filter(&table, &FactFilter::from_selection(&Selection::reference())).len(),
            1
        );
    }

    #[test]
    fn test_from_pairs() {
        let f = FactFilter::from_pairs([("Year", "7"), ("Quantile", "3")]).unwrap();
        assert_eq!(f.year, Some(Year::REFERENCE));
        assert_eq!(f.scenario, Some(Scenario::SevereDownside));
        assert_eq!(f.portfolio, None);

        assert!(matches!(
            FactFilter::from_pairs([("Colour", "1")]),
            Err(VistaError::UnknownColumn { .. })
        ));
        assert!(matches!(
            FactFilter::from_pairs([("Year", "seven")]),
            Err(VistaError::InvalidValue { .. })
        ));
        assert!(matches!(
            FactFilter::from_pairs([("ALM Basis", "2")]),
            Err(VistaError::InvalidCode { .. })
        ));
    }

    #[test]
    fn test_filter_dates_closed_interval() {
        let d = |day| NaiveDate::from_ymd_opt(2022, 5, day).unwrap();
        let history = PriceHistory::new(
            vec![d(1), d(2), d(3), d(4)],
            vec![PriceSeries {
                ticker: Ticker::new("AAA"),
                closes: vec![Some(1.0), None, Some(3.0), Some(4.0)],
            }],
        )
        .unwrap();

        let range = DateRange::new(d(2), d(3));
        let filtered = filter_dates(&history, range);
        assert_eq!(filtered.dates(), &[d(2), d(3)]);
        assert_eq!(filtered.series()[0].closes, vec![None, Some(3.0)]);
    }
}
