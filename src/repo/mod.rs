//! Repository identification.

pub mod identifier;

pub use identifier::parse_repo_identifier;
