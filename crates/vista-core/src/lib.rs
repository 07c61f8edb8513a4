//! # Vista Core
//!
//! Core types for the Vista reporting pipeline.
//!
//! This crate provides the building blocks shared by every other Vista crate:
//!
//! - **Dimensions**: typed slicer values (`Year`, `PortfolioBasis`, `AlmBasis`,
//!   `Scenario`, `WaterfallElement`) with fixed display labels
//! - **Fact tables**: the immutable, denormalized datasets loaded at startup
//! - **Selections**: the slicer tuple a view is recomputed from
//! - **Pages**: page routing and per-page slicer visibility
//!
//! ## Example
//!
//! ```rust
//! use vista_core::prelude::*;
//!
//! let selection = Selection::default();
//! assert_eq!(selection.year_header(), "Year: 7");
//! assert_eq!(WaterfallElement::ReturnOfBuyout.sign(), -1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_lossless)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{VistaError, VistaResult};
    pub use crate::types::{
        AlmBasis, DateRange, Dimension, FactKey, FactKind, FactRow, FactTable, Page,
        PortfolioBasis, Scenario, Selection, SlicerKind, SlicerOption, SlicerVisibility,
        WaterfallElement, Year,
    };
}

// Re-export commonly used types at crate root
pub use error::{VistaError, VistaResult};
pub use types::{
    AlmBasis, DateRange, Dimension, FactKey, FactKind, FactRow, FactTable, Page, PortfolioBasis,
    Scenario, Selection, WaterfallElement, Year,
};
