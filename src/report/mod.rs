//! Report rendering.

pub mod generator;

pub use generator::{generate_text_report, rank_organizations};
