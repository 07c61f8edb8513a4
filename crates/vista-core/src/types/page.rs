//! Page routing and slicer catalogue.

use serde::{Deserialize, Serialize};

use super::dimension::{AlmBasis, PortfolioBasis, Scenario, Year};

/// A dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Return-on-capital waterfall and KPIs.
    ReturnOnCapital,
    /// Asset-liability scenario view.
    Alm,
}

impl Page {
    /// Pages in navigation order.
    pub const ALL: [Page; 2] = [Page::ReturnOnCapital, Page::Alm];

    /// Resolves a URL path. Unknown paths land on the return-on-capital page.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/ALM" | "/alm" | "ALM" | "alm" => Page::Alm,
            _ => Page::ReturnOnCapital,
        }
    }

    /// Canonical URL path.
    pub fn path(self) -> &'static str {
        match self {
            Page::ReturnOnCapital => "/RoC",
            Page::Alm => "/ALM",
        }
    }

    /// Navigation title.
    pub fn title(self) -> &'static str {
        match self {
            Page::ReturnOnCapital => "Return on Capital",
            Page::Alm => "ALM",
        }
    }

    /// Which slicers the page shows.
    pub fn slicers(self) -> SlicerVisibility {
        match self {
            Page::ReturnOnCapital => SlicerVisibility {
                year: true,
                portfolio: true,
                basis: true,
                scenario: true,
            },
            Page::Alm => SlicerVisibility {
                year: false,
                portfolio: true,
                basis: true,
                scenario: false,
            },
        }
    }
}

/// Slicer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlicerKind {
    /// Year slider.
    Year,
    /// Portfolio dropdown.
    Portfolio,
    /// ALM basis dropdown.
    Basis,
    /// Scenario dropdown.
    Scenario,
}

impl SlicerKind {
    /// All slicers in display order.
    pub const ALL: [SlicerKind; 4] = [
        SlicerKind::Year,
        SlicerKind::Portfolio,
        SlicerKind::Basis,
        SlicerKind::Scenario,
    ];

    /// Heading shown above the slicer.
    pub fn heading(self) -> &'static str {
        match self {
            SlicerKind::Year => "Year:",
            SlicerKind::Portfolio => "Portfolio:",
            SlicerKind::Basis => "ALM Basis:",
            SlicerKind::Scenario => "Scenario:",
        }
    }

    /// Selectable values, in code order.
    pub fn options(self) -> Vec<SlicerOption> {
        match self {
            SlicerKind::Year => Year::all()
                .map(|y| SlicerOption::new(y.value(), y.to_string()))
                .collect(),
            SlicerKind::Portfolio => PortfolioBasis::ALL
                .iter()
                .map(|p| SlicerOption::new(p.code(), p.label()))
                .collect(),
            SlicerKind::Basis => AlmBasis::ALL
                .iter()
                .map(|b| SlicerOption::new(b.code(), b.label()))
                .collect(),
            SlicerKind::Scenario => Scenario::ALL
                .iter()
                .map(|s| SlicerOption::new(s.code(), s.label()))
                .collect(),
        }
    }
}

/// One selectable slicer value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlicerOption {
    /// Code sent back on selection.
    pub value: u8,
    /// Display label.
    pub label: String,
}

impl SlicerOption {
    /// Creates an option.
    pub fn new(value: u8, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Per-page slicer visibility mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlicerVisibility {
    /// Year slider shown.
    pub year: bool,
    /// Portfolio dropdown shown.
    pub portfolio: bool,
    /// ALM basis dropdown shown.
    pub basis: bool,
    /// Scenario dropdown shown.
    pub scenario: bool,
}

impl SlicerVisibility {
    /// Returns true if `kind` is shown.
    pub fn shows(&self, kind: SlicerKind) -> bool {
        match kind {
            SlicerKind::Year => self.year,
            SlicerKind::Portfolio => self.portfolio,
            SlicerKind::Basis => self.basis,
            SlicerKind::Scenario => self.scenario,
        }
    }

    /// Visible slicers in display order.
    pub fn visible(&self) -> Vec<SlicerKind> {
        SlicerKind::ALL
            .into_iter()
            .filter(|k| self.shows(*k))
            .collect()
    }
}

/// Next open state of the collapsed navigation menu.
///
/// A click count of zero means the toggler has never been pressed.
pub fn toggle_collapse(clicks: u32, is_open: bool) -> bool {
    if clicks > 0 {
        !is_open
    } else {
        is_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing() {
        assert_eq!(Page::from_path("/ALM"), Page::Alm);
        assert_eq!(Page::from_path("/RoC"), Page::ReturnOnCapital);
        assert_eq!(Page::from_path("/home"), Page::ReturnOnCapital);
        assert_eq!(Page::from_path(""), Page::ReturnOnCapital);
        for page in Page::ALL {
            assert_eq!(Page::from_path(page.path()), page);
        }
    }

    #[test]
    fn test_alm_page_hides_year_and_scenario() {
        let visible = Page::Alm.slicers().visible();
        assert_eq!(visible, vec![SlicerKind::Portfolio, SlicerKind::Basis]);
        assert_eq!(Page::ReturnOnCapital.slicers().visible().len(), 4);
    }

    #[test]
    fn test_options() {
        assert_eq!(SlicerKind::Year.options().len(), 20);
        let scenarios = SlicerKind::Scenario.options();
        assert_eq!(scenarios[1], SlicerOption::new(1, "Base"));
    }

    #[test]
    fn test_toggle_collapse() {
        assert!(!toggle_collapse(0, false));
        assert!(toggle_collapse(0, true));
        assert!(toggle_collapse(1, false));
        assert!(!toggle_collapse(3, true));
    }
}
