//! Plain-text report generation.
//!
//! Organizations are ranked by contributions and rendered one per line
//! beneath a short header.

use crate::models::{OrganizationStats, Report};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Rank organizations by total contributions, highest first.
///
/// Ties are ordered by organization name so the output is deterministic.
pub fn rank_organizations(
    organizations: HashMap<String, OrganizationStats>,
) -> Vec<OrganizationStats> {
    let mut ranked: Vec<OrganizationStats> = organizations.into_values().collect();
    ranked.sort_by(|a, b| {
        Reverse(a.contributions)
            .cmp(&Reverse(b.contributions))
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}

/// Generate the complete text report.
pub fn generate_text_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&generate_header(report));
    output.push_str("Companies sorted by contributions:\n");

    for org in &report.organizations {
        output.push_str(&format!("{}\n", org));
    }

    output
}

fn generate_header(report: &Report) -> String {
    let mut header = String::new();

    header.push_str(&format!("Company stats for {}\n", report.repo));
    header.push_str(&format!(
        "Total contributors: {}\n",
        report.total_contributors
    ));
    header.push_str(&format!(
        "Total companies: {}\n\n",
        report.organizations.len()
    ));

    header
}
