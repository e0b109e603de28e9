//! Analysis modules.
//!
//! Polling the forge for contributor statistics and folding them into
//! per-organization totals.

pub mod aggregator;
pub mod poller;

pub use aggregator::{aggregate_by_organization, total_contributions, AggregateOptions};
pub use poller::{poll_contributor_stats, PollPolicy};
