//! Immutable fact tables.
//!
//! A [`FactTable`] is the in-memory form of one of the scenario CSV files. It is
//! built once, validated so every full dimension tuple appears at most once, and
//! shared read-only for the rest of the process lifetime.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::dimension::{AlmBasis, PortfolioBasis, Scenario, WaterfallElement, Year};
use crate::error::{VistaError, VistaResult};

/// Which scenario file a table was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    /// `(Year, Portfolio Basis, ALM Basis, Quantile, Value)`
    Alm,
    /// `(Year, Portfolio Basis, ALM Basis, Quantile, Waterfall Element, Value)`
    Waterfall,
}

impl FactKind {
    /// Returns true if rows of this kind carry a waterfall element.
    pub fn has_element(self) -> bool {
        matches!(self, FactKind::Waterfall)
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactKind::Alm => f.write_str("alm"),
            FactKind::Waterfall => f.write_str("waterfall"),
        }
    }
}

/// Full dimension tuple identifying one fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactKey {
    /// Projection year.
    pub year: Year,
    /// Portfolio basis.
    pub portfolio: PortfolioBasis,
    /// ALM basis.
    pub basis: AlmBasis,
    /// Scenario quantile.
    pub scenario: Scenario,
    /// Waterfall element (waterfall tables only).
    pub element: Option<WaterfallElement>,
}

impl fmt::Display for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "year={} portfolio={} basis={} quantile={}",
            self.year,
            self.portfolio.code(),
            self.basis.code(),
            self.scenario.code()
        )?;
        if let Some(element) = self.element {
            write!(f, " element={}", element.code())?;
        }
        Ok(())
    }
}

/// One row of a fact table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
    /// Dimension tuple.
    #[serde(flatten)]
    pub key: FactKey,
    /// Currency amount.
    pub value: f64,
}

impl FactRow {
    /// Creates a row without a waterfall element.
    pub fn new(
        year: Year,
        portfolio: PortfolioBasis,
        basis: AlmBasis,
        scenario: Scenario,
        value: f64,
    ) -> Self {
        Self {
            key: FactKey {
                year,
                portfolio,
                basis,
                scenario,
                element: None,
            },
            value,
        }
    }

    /// Sets the waterfall element.
    pub fn with_element(mut self, element: WaterfallElement) -> Self {
        self.key.element = Some(element);
        self
    }
}

/// An immutable, validated fact table.
#[derive(Debug, Clone)]
pub struct FactTable {
    kind: FactKind,
    rows: Vec<FactRow>,
    index: HashMap<FactKey, usize>,
}

impl FactTable {
    /// Builds a table, rejecting duplicate tuples and rows that do not fit `kind`.
    pub fn new(kind: FactKind, rows: Vec<FactRow>) -> VistaResult<Self> {
        let mut index = HashMap::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            if row.key.element.is_some() != kind.has_element() {
                return Err(VistaError::schema_mismatch(format!(
                    "row {} ({}) does not fit a {} table",
                    i + 1,
                    row.key,
                    kind
                )));
            }
            if index.insert(row.key, i).is_some() {
                return Err(VistaError::DuplicateFact {
                    key: row.key.to_string(),
                });
            }
        }

        Ok(Self { kind, rows, index })
    }

    /// Creates an empty table.
    pub fn empty(kind: FactKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Table kind.
    pub fn kind(&self) -> FactKind {
        self.kind
    }

    /// Rows in file order.
    pub fn rows(&self) -> &[FactRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up the single row for a full tuple.
    pub fn get(&self, key: &FactKey) -> Option<&FactRow> {
        self.index.get(key).map(|&i| &self.rows[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i64, element: Option<WaterfallElement>, value: f64) -> FactRow {
        let row = FactRow::new(
            Year::new(year).unwrap(),
            PortfolioBasis::Simple,
            AlmBasis::BoBase,
            Scenario::Base,
            value,
        );
        match element {
            Some(e) => row.with_element(e),
            None => row,
        }
    }

    #[test]
    fn test_lookup_by_key() {
        let table = FactTable::new(
            FactKind::Alm,
            vec![row(1, None, 10.0), row(2, None, 20.0)],
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let key = row(2, None, 0.0).key;
        assert_eq!(table.get(&key).unwrap().value, 20.0);
    }

    #[test]
    fn test_duplicate_tuple_rejected() {
        let result = FactTable::new(
            FactKind::Alm,
            vec![row(1, None, 10.0), row(1, None, 11.0)],
        );
        assert!(matches!(result, Err(VistaError::DuplicateFact { .. })));
    }

    #[test]
    fn test_element_required_for_waterfall() {
        let result = FactTable::new(FactKind::Waterfall, vec![row(1, None, 10.0)]);
        assert!(matches!(result, Err(VistaError::SchemaMismatch { .. })));

        let result = FactTable::new(
            FactKind::Alm,
            vec![row(1, Some(WaterfallElement::PremiumTp), 10.0)],
        );
        assert!(matches!(result, Err(VistaError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_same_tuple_different_element_allowed() {
        let table = FactTable::new(
            FactKind::Waterfall,
            vec![
                row(1, Some(WaterfallElement::PremiumTp), 1.0),
                row(1, Some(WaterfallElement::CapitalBuffer), 2.0),
            ],
        )
        .unwrap();
        assert_eq!(table.len(), 2);
    }
}
