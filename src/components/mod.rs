//! UI components.

pub mod genealogy;
