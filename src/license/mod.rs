//! License discovery and classification.
//!
//! - [`locator`] — picks the license file of a module directory.
//! - [`classifier`] — fingerprint matching against [`corpus`], with a keyword
//!   fallback.
//! - [`risk`] — maps identifiers to [`LicenseRisk`](crate::models::LicenseRisk)
//!   and normalizes filter terms.

pub mod classifier;
pub mod corpus;
pub mod locator;
pub mod risk;
