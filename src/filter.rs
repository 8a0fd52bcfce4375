//! View transforms over the canonical dependency set.
//!
//! None of these mutate their input. License terms match an identifier when
//! they are equal to it, or when the identifier starts with the term followed
//! by `-` (ASCII case-insensitive): `GPL` matches `GPL-2.0` and
//! `GPL-3.0-only` but not `LGPL-2.1` or `AGPL-3.0`.

use std::cmp::Ordering;

use crate::models::Dependency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Partition {
    #[default]
    All,
    DirectOnly,
    IndirectOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Path,
    Version,
    License,
}

pub fn partition(deps: &[Dependency], partition: Partition) -> Vec<Dependency> {
    deps.iter()
        .filter(|d| match partition {
            Partition::All => true,
            Partition::DirectOnly => !d.indirect,
            Partition::IndirectOnly => d.indirect,
        })
        .cloned()
        .collect()
}

/// Whether `license` belongs to the license or family named by `term`.
pub fn license_matches(license: &str, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return false;
    }
    let Some(head) = license.get(..term.len()) else {
        return false;
    };
    let tail = &license[term.len()..];
    head.eq_ignore_ascii_case(term) && (tail.is_empty() || tail.starts_with('-'))
}

fn matches_any(license: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| license_matches(license, t))
}

/// Keep dependencies whose license matches any term. No terms keeps all.
pub fn allow(deps: &[Dependency], terms: &[String]) -> Vec<Dependency> {
    if terms.is_empty() {
        return deps.to_vec();
    }
    deps.iter()
        .filter(|d| matches_any(&d.license, terms))
        .cloned()
        .collect()
}

/// Drop dependencies whose license matches any term.
pub fn deny(deps: &[Dependency], terms: &[String]) -> Vec<Dependency> {
    deps.iter()
        .filter(|d| !matches_any(&d.license, terms))
        .cloned()
        .collect()
}

/// Single-term allow filter.
pub fn filter_by_license(deps: &[Dependency], term: &str) -> Vec<Dependency> {
    allow(deps, &[term.to_string()])
}

/// Dependencies violating a fail-on list. Pass the full, unfiltered set.
pub fn violations(deps: &[Dependency], terms: &[String]) -> Vec<Dependency> {
    if terms.is_empty() {
        return Vec::new();
    }
    deps.iter()
        .filter(|d| matches_any(&d.license, terms))
        .cloned()
        .collect()
}

/// Sorted copy of `deps`; ties are broken by path.
pub fn sort_by(deps: &[Dependency], key: SortKey) -> Vec<Dependency> {
    let mut sorted = deps.to_vec();
    sorted.sort_by(|a, b| {
        let primary = match key {
            SortKey::Path => Ordering::Equal,
            SortKey::Version => compare_versions(&a.version, &b.version),
            SortKey::License => a.license.cmp(&b.license),
        };
        primary.then_with(|| a.path.cmp(&b.path))
    });
    sorted
}

/// Semantic order for `vX.Y.Z` versions, ahead of anything unparsable.
fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| semver::Version::parse(v.strip_prefix('v').unwrap_or(v)).ok();
    match (parse(a), parse(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(path: &str, version: &str, license: &str, indirect: bool) -> Dependency {
        Dependency {
            path: path.into(),
            version: version.into(),
            indirect,
            license: license.into(),
            license_file: String::new(),
            dir: String::new(),
        }
    }

    fn sample() -> Vec<Dependency> {
        vec![
            dep("example.com/a", "v1.10.0", "MIT", false),
            dep("example.com/b", "v1.2.0", "GPL-3.0", true),
            dep("example.com/c", "v0.0.0-20230101120000-abcdef123456", "LGPL-2.1", true),
            dep("example.com/d", "v1.2.0", "Apache-2.0", false),
            dep("example.com/e", "garbage", "UNKNOWN", false),
        ]
    }

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_license_matches_family_prefix() {
        assert!(license_matches("GPL-2.0", "GPL"));
        assert!(license_matches("GPL-3.0-only", "gpl"));
        assert!(license_matches("GPL-2.0-or-later", "GPL-2.0"));
        assert!(license_matches("MIT", "MIT"));
        assert!(!license_matches("LGPL-2.1", "GPL"));
        assert!(!license_matches("AGPL-3.0", "GPL"));
        assert!(!license_matches("MIT-0", "MIT-0-x"));
        assert!(!license_matches("MITX", "MIT"));
        assert!(!license_matches("MIT", ""));
    }

    #[test]
    fn test_partition() {
        let deps = sample();
        assert_eq!(partition(&deps, Partition::All).len(), 5);
        assert!(partition(&deps, Partition::DirectOnly).iter().all(|d| !d.indirect));
        assert_eq!(partition(&deps, Partition::IndirectOnly).len(), 2);
    }

    #[test]
    fn test_filter_by_license_subset() {
        let deps = sample();
        let mit = filter_by_license(&deps, "MIT");
        assert_eq!(mit.len(), 1);
        assert!(mit.iter().all(|d| d.license == "MIT" && deps.contains(d)));

        let none = filter_by_license(&deps, "ISC");
        assert!(none.is_empty());
    }

    #[test]
    fn test_allow_and_deny() {
        let deps = sample();
        assert_eq!(allow(&deps, &[]).len(), 5);
        let copyleft = allow(&deps, &terms(&["GPL", "LGPL"]));
        assert_eq!(copyleft.len(), 2);

        let denied = deny(&deps, &terms(&["GPL", "UNKNOWN"]));
        let paths: Vec<_> = denied.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, ["example.com/a", "example.com/c", "example.com/d"]);
    }

    #[test]
    fn test_violations_flip_with_one_gpl2_dep() {
        let mut deps = sample();
        assert!(violations(&deps, &terms(&["GPL-2.0"])).is_empty());

        deps.push(dep("example.com/f", "v1.0.0", "GPL-2.0", true));
        let found = violations(&deps, &terms(&["GPL-2.0"]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "example.com/f");
    }

    #[test]
    fn test_sort_by_version() {
        let sorted = sort_by(&sample(), SortKey::Version);
        let paths: Vec<_> = sorted.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "example.com/c",
                "example.com/b",
                "example.com/d",
                "example.com/a",
                "example.com/e"
            ]
        );
    }

    #[test]
    fn test_sort_by_license_ties_by_path() {
        let mut deps = sample();
        deps.push(dep("example.com/0", "v1.0.0", "MIT", false));
        let sorted = sort_by(&deps, SortKey::License);
        let pairs: Vec<_> = sorted
            .iter()
            .map(|d| (d.license.as_str(), d.path.as_str()))
            .collect();
        assert_eq!(pairs[0], ("Apache-2.0", "example.com/d"));
        assert_eq!(pairs[3], ("MIT", "example.com/0"));
        assert_eq!(pairs[4], ("MIT", "example.com/a"));
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let deps = sample();
        let before = deps.clone();
        let _ = sort_by(&deps, SortKey::License);
        assert_eq!(deps, before);
    }
}
