//! Report renderers for scan results.
//!
//! Every renderer is a pure function of an already filtered and sorted slice
//! and returns the report text; writing it out is the caller's job.
//!
//! - [`terminal`] — table with license risk; coloured when styled.
//! - [`markdown`] — Markdown table.
//! - [`summary`] — total/direct/indirect and per-license counts.
//! - [`json`] — JSON array of dependencies.

pub mod markdown;
pub mod summary;
pub mod terminal;

use crate::models::Dependency;

/// Pretty JSON array of `{Path, Version, Indirect, License, LicenseFile, Dir}`.
pub fn json(deps: &[Dependency]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(deps).map(|s| s + "\n")
}
