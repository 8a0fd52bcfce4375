//! The scan pipeline: manifest, resolution, license lookup, aggregation.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::error::{ClassificationWarning, ScanError};
use crate::license::classifier::LicenseClassifier;
use crate::license::locator::LicenseLocator;
use crate::manifest::read_manifest;
use crate::models::Dependency;
use crate::resolver::ModuleResolver;

/// Result of a successful scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub module_path: String,
    /// Canonical dependency set, ordered by module path.
    pub dependencies: Vec<Dependency>,
    /// License files that existed but could not be read.
    pub warnings: Vec<ClassificationWarning>,
}

/// Run the full pipeline for the manifest at `manifest_path`.
///
/// The resolver runs once, in the manifest's directory. License lookup is
/// sequential in path order. With `show_progress` a progress bar is drawn on
/// stderr while licenses are classified.
pub fn scan(
    manifest_path: &Path,
    resolver: &dyn ModuleResolver,
    locator: &LicenseLocator,
    classifier: &LicenseClassifier,
    show_progress: bool,
) -> Result<ScanOutcome, ScanError> {
    let manifest = read_manifest(manifest_path)?;
    info!(
        module = %manifest.module_path,
        requirements = manifest.requirements.len(),
        overrides = manifest.overrides.len(),
        "parsed manifest"
    );

    let root = manifest_dir(manifest_path);
    let resolved = resolver.resolve(&root)?;

    let pb = progress_bar(manifest.requirements.len() as u64, show_progress);
    let mut warnings = Vec::new();
    let dependencies = aggregate(&manifest, &resolved, &root, |dir| {
        pb.set_message(dir.display().to_string());
        let file = locator.locate(dir);
        let (result, warning) = classifier.classify_file(file.as_deref());
        warnings.extend(warning);
        pb.inc(1);
        result
    });
    pb.finish_and_clear();

    debug!(
        dependencies = dependencies.len(),
        warnings = warnings.len(),
        "scan complete"
    );
    Ok(ScanOutcome {
        module_path: manifest.module_path,
        dependencies,
        warnings,
    })
}

/// Directory containing the manifest; a bare file name means the current one.
fn manifest_dir(manifest_path: &Path) -> PathBuf {
    match manifest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
