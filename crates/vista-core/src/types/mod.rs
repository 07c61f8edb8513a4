//! Domain types for the reporting pipeline.

mod dimension;
mod fact;
mod page;
mod selection;

pub use dimension::*;
pub use fact::*;
pub use page::*;
pub use selection::*;
