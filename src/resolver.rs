//! Module resolution through `go list -m -e -json all`.
//!
//! The oracle runs exactly once per scan. Its stdout and stderr go to
//! anonymous temp files so the child can never block on a full pipe while we
//! wait on it with a timeout; afterwards stdout is decoded as a stream of
//! concatenated JSON objects, one record at a time.

use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

use crate::error::ResolutionError;
use crate::models::ResolvedModule;

/// Expands a manifest root into the full set of resolved modules.
pub trait ModuleResolver {
    fn resolve(&self, root: &Path) -> Result<Vec<ResolvedModule>, ResolutionError>;
}

/// Default time allowed for the oracle to finish.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Resolver backed by the Go toolchain.
#[derive(Debug, Clone)]
pub struct GoListResolver {
    go_binary: PathBuf,
    timeout: Duration,
    offline: bool,
}

impl GoListResolver {
    pub fn new(go_binary: impl Into<PathBuf>) -> Self {
        Self {
            go_binary: go_binary.into(),
            timeout: DEFAULT_TIMEOUT,
            offline: true,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// When set, the child runs with `GOPROXY=off` so nothing is downloaded.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    fn program(&self) -> String {
        self.go_binary.display().to_string()
    }
}

impl Default for GoListResolver {
    fn default() -> Self {
        Self::new("go")
    }
}

impl ModuleResolver for GoListResolver {
    fn resolve(&self, root: &Path) -> Result<Vec<ResolvedModule>, ResolutionError> {
        let program = self.program();
        let mut stdout = tempfile::tempfile()?;
        let mut stderr = tempfile::tempfile()?;

        let mut command = Command::new(&self.go_binary);
        command
            .args(["list", "-m", "-e", "-json", "all"])
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout.try_clone()?))
            .stderr(Stdio::from(stderr.try_clone()?));
        if self.offline {
            command.env("GOPROXY", "off");
        }

        debug!(program = %program, dir = %root.display(), "running module resolver");
        let mut child = command
            .spawn()
            .map_err(|source| ResolutionError::Unavailable {
                program: program.clone(),
                source,
            })?;

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                // Kill and reap; the timeout is the error we report.
                let _ = child.kill();
                let _ = child.wait();
                return Err(ResolutionError::Timeout {
                    program,
                    timeout: self.timeout,
                });
            }
        };

        if !status.success() {
            let mut text = String::new();
            stderr.seek(SeekFrom::Start(0))?;
            stderr.read_to_string(&mut text)?;
            return Err(ResolutionError::Failed {
                program,
                status: status.to_string(),
                stderr: text.trim().to_string(),
            });
        }

        stdout.seek(SeekFrom::Start(0))?;
        let modules = decode_modules(BufReader::new(stdout))?;
        info!(modules = modules.len(), "resolved module graph");
        Ok(modules)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoListModule {
    path: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    dir: String,
    #[serde(default)]
    main: bool,
    replace: Option<GoListReplace>,
    error: Option<GoListError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoListReplace {
    path: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    dir: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoListError {
    #[serde(default)]
    err: String,
}

impl From<GoListModule> for ResolvedModule {
    fn from(m: GoListModule) -> Self {
        if let Some(error) = &m.error {
            warn!(module = %m.path, error = %error.err, "module not available locally");
        }
        let (dir, replacement_path, replacement_version) = match m.replace {
            Some(r) => {
                let dir = if r.dir.is_empty() { m.dir } else { r.dir };
                let version = Some(r.version).filter(|v| !v.is_empty());
                (dir, Some(r.path), version)
            }
            None => (m.dir, None, None),
        };
        let dir = if m.error.is_some() { String::new() } else { dir };
        ResolvedModule {
            path: m.path,
            version: m.version,
            dir,
            is_override_target: replacement_path.is_some(),
            replacement_path,
            replacement_version,
            main: m.main,
        }
    }
}

/// Decode a stream of concatenated `go list -m -json` objects.
///
/// Any undecodable record fails the whole decode; records decoded before it
/// are discarded.
pub fn decode_modules<R: Read>(reader: R) -> Result<Vec<ResolvedModule>, ResolutionError> {
    let mut modules = Vec::new();
    let stream = serde_json::Deserializer::from_reader(reader).into_iter::<GoListModule>();
    for record in stream {
        let record = record.map_err(|source| ResolutionError::Decode {
            decoded: modules.len(),
            source,
        })?;
        modules.push(ResolvedModule::from(record));
    }
    Ok(modules)
}
