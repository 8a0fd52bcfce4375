use serde::{Deserialize, Serialize};

/// Identifier reported when no license could be determined.
pub const UNKNOWN_LICENSE: &str = "UNKNOWN";

/// A `require` entry declared in `go.mod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: String,
    pub version: String,
    /// Set by a trailing `// indirect` comment. Never recomputed.
    pub indirect: bool,
}

/// A `replace` entry declared in `go.mod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideDirective {
    pub from_path: String,
    /// `None` replaces every version of `from_path`.
    pub from_version: Option<String>,
    pub to_path: String,
    /// Absent for local filesystem targets.
    pub to_version: Option<String>,
    /// Filesystem target, relative to the manifest directory unless absolute.
    pub to_local_dir: Option<String>,
}

impl OverrideDirective {
    /// Whether this directive applies to `path` at `version`.
    pub fn applies_to(&self, path: &str, version: &str) -> bool {
        self.from_path == path
            && self
                .from_version
                .as_deref()
                .map_or(true, |v| v == version)
    }
}

/// One module record reported by the resolution oracle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedModule {
    pub path: String,
    pub version: String,
    /// Effective on-disk location; the replacement's directory when replaced.
    /// Empty when the module is not available locally.
    pub dir: String,
    pub is_override_target: bool,
    pub replacement_path: Option<String>,
    pub replacement_version: Option<String>,
    /// The root module being analyzed.
    pub main: bool,
}

/// Outcome of locating and classifying a module's license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseResult {
    pub identifier: String,
    /// Path of the license file, empty when none was found.
    pub file: String,
}

impl LicenseResult {
    pub fn unknown() -> Self {
        LicenseResult {
            identifier: UNKNOWN_LICENSE.to_string(),
            file: String::new(),
        }
    }
}

/// Canonical record for one dependency in the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dependency {
    pub path: String,
    pub version: String,
    pub indirect: bool,
    pub license: String,
    pub license_file: String,
    pub dir: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseRisk {
    Permissive,
    WeakCopyleft,
    StrongCopyleft,
    Unknown,
}

impl std::fmt::Display for LicenseRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseRisk::Permissive => write!(f, "Permissive"),
            LicenseRisk::WeakCopyleft => write!(f, "Weak Copyleft"),
            LicenseRisk::StrongCopyleft => write!(f, "Strong Copyleft"),
            LicenseRisk::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_json_shape() {
        let dep = Dependency {
            path: "example.com/a".into(),
            version: "v1.0.0".into(),
            indirect: false,
            license: "MIT".into(),
            license_file: "/mod/a/LICENSE".into(),
            dir: "/mod/a".into(),
        };
        let json = serde_json::to_string(&dep).unwrap();
        assert_eq!(
            json,
            r#"{"Path":"example.com/a","Version":"v1.0.0","Indirect":false,"License":"MIT","LicenseFile":"/mod/a/LICENSE","Dir":"/mod/a"}"#
        );
    }

    #[test]
    fn test_override_applies_to() {
        let wildcard = OverrideDirective {
            from_path: "example.com/a".into(),
            from_version: None,
            to_path: "../a".into(),
            to_version: None,
            to_local_dir: Some("../a".into()),
        };
        assert!(wildcard.applies_to("example.com/a", "v1.2.3"));
        assert!(!wildcard.applies_to("example.com/b", "v1.2.3"));

        let pinned = OverrideDirective {
            from_version: Some("v1.0.0".into()),
            ..wildcard
        };
        assert!(pinned.applies_to("example.com/a", "v1.0.0"));
        assert!(!pinned.applies_to("example.com/a", "v1.1.0"));
    }
}
