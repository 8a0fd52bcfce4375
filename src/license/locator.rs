use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Candidate license file names, highest priority first.
pub const DEFAULT_CANDIDATES: [&str; 5] = ["LICENSE", "LICENSE.md", "LICENSE.txt", "COPYING", "COPYRIGHT"];

/// Finds the license file of a module directory.
#[derive(Debug, Clone)]
pub struct LicenseLocator {
    candidates: Vec<String>,
}

impl LicenseLocator {
    /// Replace the candidate list entirely; order is priority.
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    /// Return the highest-priority candidate present in `dir`.
    ///
    /// An exact name match is preferred over a case-insensitive one
    /// (`License.txt`). Missing, empty or unreadable directories yield `None`.
    pub fn locate(&self, dir: &Path) -> Option<PathBuf> {
        if dir.as_os_str().is_empty() {
            return None;
        }
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "cannot list module directory");
                return None;
            }
        };

        let names: BTreeSet<String> = entries
            .flatten()
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();

        for candidate in &self.candidates {
            if names.contains(candidate) {
                return Some(dir.join(candidate));
            }
            // BTreeSet iteration is sorted, so the first hit is the smallest name
            if let Some(name) = names.iter().find(|n| n.eq_ignore_ascii_case(candidate)) {
                return Some(dir.join(name));
            }
        }
        None
    }
}

impl Default for LicenseLocator {
    fn default() -> Self {
        Self::new(DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_license_beats_license_md() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("LICENSE.md"), "md").unwrap();
        fs::write(dir.path().join("LICENSE"), "plain").unwrap();

        let found = LicenseLocator::default().locate(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("LICENSE"));
    }

    #[test]
    fn test_falls_through_priority_list() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("COPYING"), "gpl").unwrap();
        fs::write(dir.path().join("README.md"), "hi").unwrap();

        let found = LicenseLocator::default().locate(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("COPYING"));
    }

    #[test]
    fn test_case_insensitive_variant() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("License.txt"), "x").unwrap();

        let found = LicenseLocator::default().locate(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "License.txt");
    }

    #[test]
    fn test_directory_named_license_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("LICENSE")).unwrap();
        fs::write(dir.path().join("COPYRIGHT"), "x").unwrap();

        let found = LicenseLocator::default().locate(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("COPYRIGHT"));
    }

    #[test]
    fn test_not_found_outcomes() {
        let locator = LicenseLocator::default();
        assert_eq!(locator.locate(Path::new("")), None);
        assert_eq!(locator.locate(Path::new("/no/such/module/dir")), None);

        let empty = TempDir::new().unwrap();
        assert_eq!(locator.locate(empty.path()), None);
    }

    #[test]
    fn test_custom_candidate_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("LICENSE"), "a").unwrap();
        fs::write(dir.path().join("COPYING"), "b").unwrap();

        let locator = LicenseLocator::new(vec!["COPYING".into(), "LICENSE".into()]);
        assert_eq!(locator.locate(dir.path()).unwrap(), dir.path().join("COPYING"));
    }
}
