use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::license::classifier::DEFAULT_THRESHOLD;
use crate::license::locator::DEFAULT_CANDIDATES;
use crate::notify::Level;

/// Root configuration structure, deserialized from `.golicense-checkr/config.toml`.
///
/// Every section is optional; command-line flags override what is set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub resolver: ResolverConfig,
    pub licenses: LicensesConfig,
    pub classifier: ClassifierConfig,
    pub policy: PolicyConfig,
    pub notifications: NotificationsConfig,
}

/// How the module resolution oracle is invoked.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Go toolchain binary.
    pub go_binary: PathBuf,
    pub timeout_secs: u64,
    /// Run with `GOPROXY=off` so the module cache is the only source.
    pub offline: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            go_binary: PathBuf::from("go"),
            timeout_secs: 120,
            offline: true,
        }
    }
}

/// License file discovery.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LicensesConfig {
    /// Candidate file names, highest priority first.
    pub candidates: Vec<String>,
}

impl Default for LicensesConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Minimum fingerprint similarity, between 0 and 1.
    pub threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Default license lists; the `--allow`, `--deny` and `--fail-on` flags
/// replace the matching list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
    pub fail_on: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationsConfig {
    /// Emit notifications as log events.
    pub log: bool,
    /// Append notifications as JSON lines to this file.
    pub file: Option<PathBuf>,
    /// Lowest level delivered.
    pub min_level: Level,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            log: true,
            file: None,
            min_level: Level::Warn,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.golicense-checkr/config.toml`
/// 3. `~/.config/golicense-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".golicense-checkr").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("golicense-checkr")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    if !(0.0..=1.0).contains(&config.classifier.threshold) {
        anyhow::bail!(
            "invalid config {}: classifier.threshold must be between 0 and 1",
            path.display()
        );
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.resolver.go_binary, PathBuf::from("go"));
        assert_eq!(cfg.resolver.timeout_secs, 120);
        assert!(cfg.resolver.offline);
        assert_eq!(cfg.licenses.candidates[0], "LICENSE");
        assert!(cfg.policy.fail_on.is_empty());
        assert_eq!(cfg.notifications.min_level, Level::Warn);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[policy]
fail_on = ["GPL", "AGPL"]

[resolver]
timeout_secs = 30
"#,
        )
        .unwrap();
        assert_eq!(cfg.policy.fail_on, ["GPL", "AGPL"]);
        assert_eq!(cfg.resolver.timeout_secs, 30);
        assert_eq!(cfg.resolver.go_binary, PathBuf::from("go"));
        assert_eq!(cfg.licenses.candidates.len(), 5);
    }

    #[test]
    fn test_project_config_is_found() {
        let dir = TempDir::new().unwrap();
        let cfg_dir = dir.path().join(".golicense-checkr");
        std::fs::create_dir(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[licenses]\ncandidates = [\"COPYING\"]\n[notifications]\nmin_level = \"error\"\n",
        )
        .unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.licenses.candidates, ["COPYING"]);
        assert_eq!(cfg.notifications.min_level, Level::Error);
    }

    #[test]
    fn test_override_must_exist_and_parse() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(dir.path(), Some(&dir.path().join("missing.toml"))).is_err());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[policy]\nunknown_key = 1\n").unwrap();
        assert!(load_config(dir.path(), Some(&bad)).is_err());

        let out_of_range = dir.path().join("range.toml");
        std::fs::write(&out_of_range, "[classifier]\nthreshold = 1.5\n").unwrap();
        assert!(load_config(dir.path(), Some(&out_of_range)).is_err());
    }
}
