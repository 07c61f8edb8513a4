//! Baseline snapshot for KPI deltas.

use std::collections::BTreeMap;

use serde::Serialize;

use vista_core::{FactTable, Selection, WaterfallElement};

use crate::filter::{filter, FactFilter};

/// One baseline value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaselineEntry {
    /// Waterfall element.
    pub element: WaterfallElement,
    /// Element label.
    pub label: &'static str,
    /// Raw value at the reference selection.
    pub value: f64,
}

/// Waterfall values at a fixed reference selection, keyed by element.
///
/// Independent of the selection currently being viewed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineSnapshot {
    selection: Selection,
    values: BTreeMap<WaterfallElement, f64>,
}

impl BaselineSnapshot {
    /// Captures the snapshot at [`Selection::reference`].
    pub fn capture(table: &FactTable) -> Self {
        Self::capture_at(table, Selection::reference())
    }

    /// Captures the snapshot at an explicit reference selection.
    pub fn capture_at(table: &FactTable, selection: Selection) -> Self {
        let values = element_values(table, &selection);
        Self { selection, values }
    }

    /// Selection the snapshot was sliced at.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Baseline value of one element.
    pub fn get(&self, element: WaterfallElement) -> Option<f64> {
        self.values.get(&element).copied()
    }

    /// Values keyed by element.
    pub fn values(&self) -> &BTreeMap<WaterfallElement, f64> {
        &self.values
    }

    /// Entries in element order.
    pub fn entries(&self) -> Vec<BaselineEntry> {
        self.values
            .iter()
            .map(|(&element, &value)| BaselineEntry {
                element,
                label: element.label(),
                value,
            })
            .collect()
    }

    /// Returns true if the reference selection has no data.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Waterfall values of one selection keyed by element.
pub fn element_values(table: &FactTable, selection: &Selection) -> BTreeMap<WaterfallElement, f64> {
    filter(table, &FactFilter::from_selection(selection))
        .into_iter()
        .filter_map(|row| row.key.element.map(|e| (e, row.value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_core::{AlmBasis, FactKind, FactRow, PortfolioBasis, Scenario, Year};

    fn table() -> FactTable {
        let mut rows = Vec::new();
        for (year, scale) in [(7, 1.0), (3, 100.0)] {
            for element in WaterfallElement::ALL {
                rows.push(
                    FactRow::new(
                        Year::new(year).unwrap(),
                        PortfolioBasis::Simple,
                        AlmBasis::BoBase,
                        Scenario::Base,
                        f64::from(element.code()) * scale,
                    )
                    .with_element(element),
                );
            }
        }
        FactTable::new(FactKind::Waterfall, rows).unwrap()
    }

    #[test]
    fn test_capture_uses_reference_selection() {
        let baseline = BaselineSnapshot::capture(&table());
        assert_eq!(baseline.selection(), Selection::reference());
        assert_eq!(baseline.values().len(), 7);
        assert_eq!(baseline.get(WaterfallElement::BenefitsPaid), Some(5.0));

        let entries = baseline.entries();
        assert_eq!(entries[2].label, "Return of Buyout");
        assert_eq!(entries[2].value, 2.0);
    }

    #[test]
    fn test_capture_of_empty_table() {
        let baseline = BaselineSnapshot::capture(&FactTable::empty(FactKind::Waterfall));
        assert!(baseline.is_empty());
        assert_eq!(baseline.get(WaterfallElement::PremiumTp), None);
    }
}
