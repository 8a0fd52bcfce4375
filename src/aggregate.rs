//! Joins manifest requirements with resolver records and license lookups
//! into the canonical dependency set.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::debug;

use crate::manifest::Manifest;
use crate::models::{Dependency, LicenseResult, OverrideDirective, Requirement, ResolvedModule};

/// Build the canonical dependency set, ordered by module path.
///
/// `lookup` locates and classifies the license in a module directory; it is
/// not called for modules without a directory.
///
/// Each entry is keyed by the path required in the manifest, even when a
/// `replace` directive points it at a differently named module.
///
/// Version precedence: the resolver's replacement version, the resolver's
/// selected version, the directive's target version, the required version.
/// Directory precedence: the resolver record for the required path, the
/// local replacement directory, the resolver record for the replacement path.
pub fn aggregate<F>(
    manifest: &Manifest,
    resolved: &[ResolvedModule],
    manifest_dir: &Path,
    mut lookup: F,
) -> Vec<Dependency>
where
    F: FnMut(&Path) -> LicenseResult,
{
    let mut index: HashMap<&str, &ResolvedModule> = HashMap::new();
    for module in resolved {
        if module.main || module.path == manifest.module_path {
            continue;
        }
        index.entry(module.path.as_str()).or_insert(module);
    }

    let mut deps: BTreeMap<String, Dependency> = BTreeMap::new();
    for req in &manifest.requirements {
        if req.path == manifest.module_path {
            continue;
        }
        if deps.contains_key(&req.path) {
            debug!(module = %req.path, "duplicate requirement, keeping the first");
            continue;
        }

        let module = index.get(req.path.as_str()).copied();
        let selected = module
            .map(|m| m.version.as_str())
            .filter(|v| !v.is_empty())
            .unwrap_or(req.version.as_str());
        let directive = find_override(&manifest.overrides, &req.path, selected);
        let version = effective_version(req, directive, module);
        let dir = effective_dir(directive, module, &index, manifest_dir);

        let license = if dir.is_empty() {
            debug!(module = %req.path, "no module directory, skipping license lookup");
            LicenseResult::unknown()
        } else {
            lookup(Path::new(&dir))
        };

        deps.insert(
            req.path.clone(),
            Dependency {
                path: req.path.clone(),
                version,
                indirect: req.indirect,
                license: license.identifier,
                license_file: license.file,
                dir,
            },
        );
    }

    deps.into_values().collect()
}

/// Directives are matched against the version the build actually selected.
/// A version-pinned directive takes precedence over a wildcard one.
fn find_override<'a>(
    overrides: &'a [OverrideDirective],
    path: &str,
    version: &str,
) -> Option<&'a OverrideDirective> {
    overrides
        .iter()
        .filter(|o| o.applies_to(path, version))
        .max_by_key(|o| o.from_version.is_some())
}

fn effective_version(
    req: &Requirement,
    directive: Option<&OverrideDirective>,
    module: Option<&ResolvedModule>,
) -> String {
    module
        .and_then(|m| m.replacement_version.clone())
        .or_else(|| module.map(|m| m.version.clone()).filter(|v| !v.is_empty()))
        .or_else(|| directive.and_then(|d| d.to_version.clone()))
        .unwrap_or_else(|| req.version.clone())
}

fn effective_dir(
    directive: Option<&OverrideDirective>,
    module: Option<&ResolvedModule>,
    index: &HashMap<&str, &ResolvedModule>,
    manifest_dir: &Path,
) -> String {
    if let Some(m) = module.filter(|m| !m.dir.is_empty()) {
        return m.dir.clone();
    }
    let Some(directive) = directive else {
        return String::new();
    };
    if let Some(local) = &directive.to_local_dir {
        return std::fs::canonicalize(manifest_dir.join(local))
            .ok()
            .filter(|p| p.is_dir())
            .map(|p| p.display().to_string())
            .unwrap_or_default();
    }
    index
        .get(directive.to_path.as_str())
        .map(|m| m.dir.clone())
        .unwrap_or_default()
}
