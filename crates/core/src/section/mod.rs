//! Line topology: single sections and the per-line chain built from them.

mod chain;
mod models;

pub use chain::{Insertion, SectionChange, Sections};
pub use models::Section;
