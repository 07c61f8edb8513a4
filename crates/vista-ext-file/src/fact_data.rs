//! CSV-backed fact tables.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use vista_core::{
    AlmBasis, FactKind, FactRow, FactTable, PortfolioBasis, Scenario, WaterfallElement, Year,
};
use vista_traits::error::TraitError;

// =============================================================================
// CSV FACT SOURCE
// =============================================================================

/// CSV record shared by both scenario files.
///
/// Extra columns (such as a leading unnamed index) are ignored.
#[derive(Debug, Deserialize)]
struct FactRecord {
    #[serde(rename = "Year")]
    year: i64,
    #[serde(rename = "Portfolio Basis")]
    portfolio: i64,
    #[serde(rename = "ALM Basis")]
    basis: i64,
    #[serde(rename = "Quantile")]
    quantile: i64,
    #[serde(rename = "Waterfall Element", default)]
    element: Option<i64>,
    #[serde(rename = "Value")]
    value: f64,
}

impl FactRecord {
    fn into_row(self, kind: FactKind) -> Result<FactRow, TraitError> {
        let row = FactRow::new(
            Year::new(self.year)?,
            PortfolioBasis::from_code(self.portfolio)?,
            AlmBasis::from_code(self.basis)?,
            Scenario::from_code(self.quantile)?,
            self.value,
        );

        match (kind, self.element) {
            (FactKind::Waterfall, Some(code)) => {
                Ok(row.with_element(WaterfallElement::from_code(code)?))
            }
            (FactKind::Waterfall, None) => Err(TraitError::ParseError(
                "missing Waterfall Element column".into(),
            )),
            (FactKind::Alm, _) => Ok(row),
        }
    }
}

/// Loads a scenario CSV into a [`FactTable`].
pub struct CsvFactSource {
    file_path: PathBuf,
    kind: FactKind,
}

impl CsvFactSource {
    /// Create a new CSV fact source.
    pub fn new(file_path: impl AsRef<Path>, kind: FactKind) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            kind,
        }
    }

    /// Read and validate the file.
    ///
    /// A missing file yields an empty table, which every view renders as a
    /// neutral chart. Malformed rows and duplicate tuples are errors.
    pub fn load(&self) -> Result<FactTable, TraitError> {
        if !self.file_path.exists() {
            warn!(
                path = %self.file_path.display(),
                kind = %self.kind,
                "fact file not found, using empty table"
            );
            return Ok(FactTable::empty(self.kind));
        }

        let mut reader = csv::Reader::from_path(&self.file_path)
            .map_err(|e| TraitError::IoError(e.to_string()))?;

        let mut rows = Vec::new();
        for (line, result) in reader.deserialize::<FactRecord>().enumerate() {
            let record = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            let row = record.into_row(self.kind).map_err(|e| {
                TraitError::ParseError(format!("{} row {}: {}", self.file_path.display(), line + 1, e))
            })?;
            rows.push(row);
        }

        let table = FactTable::new(self.kind, rows)?;
        info!(
            path = %self.file_path.display(),
            kind = %self.kind,
            rows = table.len(),
            "loaded fact table"
        );
        Ok(table)
    }
}

/// Load a fact table from `path`.
pub fn load_fact_table(path: impl AsRef<Path>, kind: FactKind) -> Result<FactTable, TraitError> {
    CsvFactSource::new(path, kind).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use vista_core::Selection;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_waterfall() {
        let file = write_csv(
            ",Year,Portfolio Basis,ALM Basis,Quantile,Waterfall Element,Value\n\
             0,7,0,0,1,0,100.5\n\
             1,7,0,0,1,2,20\n",
        );

        let table = load_fact_table(file.path(), FactKind::Waterfall).unwrap();
        assert_eq!(table.len(), 2);

        let key = Selection::reference().element_key(WaterfallElement::ReturnOfBuyout);
        assert_eq!(table.get(&key).unwrap().value, 20.0);
    }

    #[test]
    fn test_load_alm_ignores_element() {
        let file = write_csv("Year,Portfolio Basis,ALM Basis,Quantile,Value\n1,2,1,3,-5.25\n");
        let table = load_fact_table(file.path(), FactKind::Alm).unwrap();
        let row = table.rows()[0];
        assert_eq!(row.key.portfolio, PortfolioBasis::Aggressive);
        assert_eq!(row.key.scenario, Scenario::SevereDownside);
        assert_eq!(row.value, -5.25);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let table = load_fact_table("/nonexistent/waterfall.csv", FactKind::Waterfall).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.kind(), FactKind::Waterfall);
    }

    #[test]
    fn test_out_of_domain_code_rejected() {
        let file = write_csv("Year,Portfolio Basis,ALM Basis,Quantile,Value\n21,0,0,0,1\n");
        let err = load_fact_table(file.path(), FactKind::Alm).unwrap_err();
        assert!(matches!(err, TraitError::ParseError(_)));
    }

    #[test]
    fn test_waterfall_requires_element_column() {
        let file = write_csv("Year,Portfolio Basis,ALM Basis,Quantile,Value\n1,0,0,0,1\n");
        assert!(load_fact_table(file.path(), FactKind::Waterfall).is_err());
    }

    #[test]
    fn test_duplicate_rows_rejected() {
        let file = write_csv(
            "Year,Portfolio Basis,ALM Basis,Quantile,Value\n1,0,0,0,1\n1,0,0,0,2\n",
        );
        let err = load_fact_table(file.path(), FactKind::Alm).unwrap_err();
        assert!(err.to_string().contains("Duplicate fact"));
    }
}
