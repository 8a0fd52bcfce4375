use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Dependency;

/// Aggregate counts over a dependency set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Summary {
    pub total: usize,
    pub direct: usize,
    pub indirect: usize,
    /// Keyed by license identifier, in byte order.
    pub licenses: BTreeMap<String, usize>,
}

impl Summary {
    pub fn from_deps(deps: &[Dependency]) -> Self {
        let indirect = deps.iter().filter(|d| d.indirect).count();
        let mut licenses = BTreeMap::new();
        for dep in deps {
            *licenses.entry(dep.license.clone()).or_insert(0) += 1;
        }
        Summary {
            total: deps.len(),
            direct: deps.len() - indirect,
            indirect,
            licenses,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Total dependencies : {}\n", self.total));
        out.push_str(&format!("  Direct           : {}\n", self.direct));
        out.push_str(&format!("  Indirect         : {}\n", self.indirect));
        if !self.licenses.is_empty() {
            out.push_str("\nLicenses:\n");
            for (license, count) in &self.licenses {
                out.push_str(&format!("  {:<16} : {}\n", license, count));
            }
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self).map(|s| s + "\n")
    }
}
