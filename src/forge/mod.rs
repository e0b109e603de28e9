//! Forge API access.
//!
//! The pipeline talks to the forge only through [`ForgeApi`], which
//! [`GithubClient`] implements over the GitHub REST API.

pub mod client;
pub mod error;

pub use client::{ClientOptions, ForgeApi, GithubClient};
pub use error::ForgeError;

#[cfg(test)]
pub mod testing;
