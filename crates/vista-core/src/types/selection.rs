//! Slicer selections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dimension::{AlmBasis, PortfolioBasis, Scenario, WaterfallElement, Year};
use super::fact::FactKey;
use crate::error::{VistaError, VistaResult};

/// The slicer tuple a scenario view is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// Projection year.
    pub year: Year,
    /// Portfolio basis.
    pub portfolio: PortfolioBasis,
    /// ALM basis.
    pub basis: AlmBasis,
    /// Scenario quantile.
    pub scenario: Scenario,
}

impl Selection {
    /// Creates a selection.
    pub fn new(year: Year, portfolio: PortfolioBasis, basis: AlmBasis, scenario: Scenario) -> Self {
        Self {
            year,
            portfolio,
            basis,
            scenario,
        }
    }

    /// The fixed selection the baseline snapshot is sliced at.
    pub const fn reference() -> Self {
        Self {
            year: Year::REFERENCE,
            portfolio: PortfolioBasis::Simple,
            basis: AlmBasis::BoBase,
            scenario: Scenario::Base,
        }
    }

    /// Label shown above the year slider.
    pub fn year_header(&self) -> String {
        format!("Year: {}", self.year)
    }

    /// Full key for one waterfall element of this selection.
    pub fn element_key(&self, element: WaterfallElement) -> FactKey {
        FactKey {
            year: self.year,
            portfolio: self.portfolio,
            basis: self.basis,
            scenario: self.scenario,
            element: Some(element),
        }
    }

    /// Full key for an ALM row of this selection.
    pub fn alm_key(&self) -> FactKey {
        FactKey {
            year: self.year,
            portfolio: self.portfolio,
            basis: self.basis,
            scenario: self.scenario,
            element: None,
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::reference()
    }
}

/// Closed date interval `[start, end]` for price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First date included.
    pub start: NaiveDate,
    /// Last date included.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range. Reversed bounds are kept as given and report empty.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parses `YYYY-MM-DD` bounds.
    pub fn parse(start: &str, end: &str) -> VistaResult<Self> {
        Ok(Self::new(parse_date(start)?, parse_date(end)?))
    }

    /// Returns true when the range has zero width (`end <= start`).
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns true if `date` lies inside the closed interval.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> VistaResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| VistaError::invalid_date(format!("{s}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_selection() {
        let reference = Selection::reference();
        assert_eq!(reference.year.value(), 7);
        assert_eq!(reference.portfolio, PortfolioBasis::Simple);
        assert_eq!(reference.basis, AlmBasis::BoBase);
        assert_eq!(reference.scenario, Scenario::Base);
        assert_eq!(Selection::default(), reference);
    }

    #[test]
    fn test_year_header() {
        let mut selection = Selection::default();
        selection.year = Year::new(12).unwrap();
        assert_eq!(selection.year_header(), "Year: 12");
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::parse("2020-01-01", "2020-12-31").unwrap();
        assert!(!range.is_empty());
        assert!(range.contains(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()));
    }

    #[test]
    fn test_zero_width_and_reversed_ranges_are_empty() {
        assert!(DateRange::parse("2020-06-01", "2020-06-01").unwrap().is_empty());
        assert!(DateRange::parse("2020-06-02", "2020-06-01").unwrap().is_empty());
    }

    #[test]
    fn test_bad_date() {
        assert!(matches!(
            DateRange::parse("2020-13-01", "2020-12-31"),
            Err(VistaError::InvalidDate { .. })
        ));
    }
}
