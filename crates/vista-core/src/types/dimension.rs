//! Slicer dimensions and their display labels.
//!
//! Each categorical column of the fact tables is stored in the source files as
//! a small integer code. The enums here own the code mapping and the label
//! shown next to the slicer, so nothing downstream indexes by raw integers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{VistaError, VistaResult};

/// Projection year (1 to 20 inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Year(u8);

impl Year {
    /// First projection year.
    pub const MIN: Year = Year(1);
    /// Last projection year.
    pub const MAX: Year = Year(20);
    /// Year the baseline snapshot is taken at.
    pub const REFERENCE: Year = Year(7);

    /// Creates a year, rejecting values outside 1..=20.
    pub fn new(year: i64) -> VistaResult<Self> {
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&year) {
            Ok(Year(year as u8))
        } else {
            Err(VistaError::invalid_code("Year", year))
        }
    }

    /// Returns the year number.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Iterates over every projection year in order.
    pub fn all() -> impl Iterator<Item = Year> {
        (Self::MIN.0..=Self::MAX.0).map(Year)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Year {
    type Error = VistaError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Year::new(value)
    }
}

impl From<Year> for u8 {
    fn from(year: Year) -> Self {
        year.0
    }
}

/// Investment strategy backing the liabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum PortfolioBasis {
    /// Simple investment strategy (code 0).
    Simple,
    /// Credit investment strategy (code 1).
    Credit,
    /// Aggressive investment strategy (code 2).
    Aggressive,
}

impl PortfolioBasis {
    /// All portfolio bases in code order.
    pub const ALL: [PortfolioBasis; 3] = [Self::Simple, Self::Credit, Self::Aggressive];

    /// Integer code used in the source files.
    pub fn code(self) -> u8 {
        match self {
            Self::Simple => 0,
            Self::Credit => 1,
            Self::Aggressive => 2,
        }
    }

    /// Looks up a basis by code.
    pub fn from_code(code: i64) -> VistaResult<Self> {
        match code {
            0 => Ok(Self::Simple),
            1 => Ok(Self::Credit),
            2 => Ok(Self::Aggressive),
            _ => Err(VistaError::invalid_code("Portfolio Basis", code)),
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Simple => "Simple Investment Strategy",
            Self::Credit => "Credit Investment Strategy",
            Self::Aggressive => "Aggressive Investment Strategy",
        }
    }
}

/// Liability valuation basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum AlmBasis {
    /// Buyout base basis (code 0).
    BoBase,
    /// Buyout downside basis (code 1).
    BoDownside,
}

impl AlmBasis {
    /// All bases in code order.
    pub const ALL: [AlmBasis; 2] = [Self::BoBase, Self::BoDownside];

    /// Integer code used in the source files.
    pub fn code(self) -> u8 {
        match self {
            Self::BoBase => 0,
            Self::BoDownside => 1,
        }
    }

    /// Looks up a basis by code.
    pub fn from_code(code: i64) -> VistaResult<Self> {
        match code {
            0 => Ok(Self::BoBase),
            1 => Ok(Self::BoDownside),
            _ => Err(VistaError::invalid_code("ALM Basis", code)),
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::BoBase => "BO Base",
            Self::BoDownside => "BO Downside",
        }
    }
}

/// Stochastic scenario quantile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum Scenario {
    /// Upside quantile (code 0).
    Upside,
    /// Base quantile (code 1).
    Base,
    /// Downside quantile (code 2).
    Downside,
    /// Severe downside quantile (code 3).
    SevereDownside,
}

impl Scenario {
    /// All scenarios in code order.
    pub const ALL: [Scenario; 4] = [
        Self::Upside,
        Self::Base,
        Self::Downside,
        Self::SevereDownside,
    ];

    /// Integer code used in the source files.
    pub fn code(self) -> u8 {
        match self {
            Self::Upside => 0,
            Self::Base => 1,
            Self::Downside => 2,
            Self::SevereDownside => 3,
        }
    }

    /// Looks up a scenario by code.
    pub fn from_code(code: i64) -> VistaResult<Self> {
        match code {
            0 => Ok(Self::Upside),
            1 => Ok(Self::Base),
            2 => Ok(Self::Downside),
            3 => Ok(Self::SevereDownside),
            _ => Err(VistaError::invalid_code("Quantile", code)),
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Upside => "Upside",
            Self::Base => "Base",
            Self::Downside => "Downside",
            Self::SevereDownside => "Severe Downside",
        }
    }
}

/// Bar of the return-on-capital waterfall.
///
/// The declaration order is the bar order, and each element carries a fixed
/// sign: elements 2 and 4 are subtractive, everything else is additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum WaterfallElement {
    /// Premium technical provisions (code 0).
    PremiumTp,
    /// Unwinding of the buyout (code 1).
    UnwindingOfBuyout,
    /// Return of the buyout (code 2, subtractive).
    ReturnOfBuyout,
    /// Capital buffer (code 3).
    CapitalBuffer,
    /// Repayment of capital (code 4, subtractive).
    RepaymentOfCapital,
    /// Benefits paid (code 5).
    BenefitsPaid,
    /// Return on capital, drawn as the closing total (code 6).
    ReturnOnCapital,
}

impl WaterfallElement {
    /// All elements in bar order.
    pub const ALL: [WaterfallElement; 7] = [
        Self::PremiumTp,
        Self::UnwindingOfBuyout,
        Self::ReturnOfBuyout,
        Self::CapitalBuffer,
        Self::RepaymentOfCapital,
        Self::BenefitsPaid,
        Self::ReturnOnCapital,
    ];

    /// Integer code used in the source files.
    pub fn code(self) -> u8 {
        match self {
            Self::PremiumTp => 0,
            Self::UnwindingOfBuyout => 1,
            Self::ReturnOfBuyout => 2,
            Self::CapitalBuffer => 3,
            Self::RepaymentOfCapital => 4,
            Self::BenefitsPaid => 5,
            Self::ReturnOnCapital => 6,
        }
    }

    /// Looks up an element by code.
    pub fn from_code(code: i64) -> VistaResult<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| VistaError::invalid_code("Waterfall Element", code))
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::PremiumTp => "Premium TP",
            Self::UnwindingOfBuyout => "Unwinding of Buyout",
            Self::ReturnOfBuyout => "Return of Buyout",
            Self::CapitalBuffer => "Capital Buffer",
            Self::RepaymentOfCapital => "Repayment of Capital",
            Self::BenefitsPaid => "Benefits Paid",
            Self::ReturnOnCapital => "Return on Capital in",
        }
    }

    /// Sign applied to the raw magnitude before it is drawn.
    pub fn sign(self) -> f64 {
        match self {
            Self::ReturnOfBuyout | Self::RepaymentOfCapital => -1.0,
            _ => 1.0,
        }
    }

    /// Returns true for the closing bar, drawn as an absolute total.
    pub fn is_total(self) -> bool {
        matches!(self, Self::ReturnOnCapital)
    }
}

macro_rules! code_conversions {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<i64> for $ty {
                type Error = VistaError;

                fn try_from(code: i64) -> Result<Self, Self::Error> {
                    <$ty>::from_code(code)
                }
            }

            impl From<$ty> for u8 {
                fn from(value: $ty) -> Self {
                    value.code()
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

code_conversions!(PortfolioBasis, AlmBasis, Scenario, WaterfallElement);

/// A named column of the fact tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    /// `Year`
    Year,
    /// `Portfolio Basis`
    PortfolioBasis,
    /// `ALM Basis`
    AlmBasis,
    /// `Quantile`
    Quantile,
    /// `Waterfall Element`
    WaterfallElement,
}

impl Dimension {
    /// All dimension columns in file order.
    pub const ALL: [Dimension; 5] = [
        Self::Year,
        Self::PortfolioBasis,
        Self::AlmBasis,
        Self::Quantile,
        Self::WaterfallElement,
    ];

    /// Column header as it appears in the source files.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::PortfolioBasis => "Portfolio Basis",
            Self::AlmBasis => "ALM Basis",
            Self::Quantile => "Quantile",
            Self::WaterfallElement => "Waterfall Element",
        }
    }

    /// Resolves a column header. Matching ignores ASCII case.
    pub fn from_column_name(name: &str) -> VistaResult<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.column_name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| VistaError::unknown_column(name))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}
