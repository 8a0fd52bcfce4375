//! `golicense-checkr` — audit the licenses of a Go module's dependencies.
//!
//! # Flow
//! 1. Parse `go.mod` ([`manifest`]).
//! 2. Expand the module graph with one `go list -m -e -json all` call ([`resolver`]).
//! 3. Locate and classify each module's license file ([`license`]).
//! 4. Join everything into a path-sorted dependency set ([`aggregate`], [`scan`]).
//! 5. Partition, filter, check policy and sort ([`filter`]).
//! 6. Render a table, JSON, Markdown or a summary ([`report`]).

pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod license;
pub mod manifest;
pub mod models;
pub mod notify;
pub mod report;
pub mod resolver;
pub mod scan;
