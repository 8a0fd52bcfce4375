use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::ClassificationWarning;
use crate::license::corpus;
use crate::models::{LicenseResult, UNKNOWN_LICENSE};

/// Minimum containment score for a fingerprint match.
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Phrase signatures checked when no fingerprint matches, in priority order.
///
/// Every phrase of an entry must occur. The LGPL and AGPL texts mention the
/// plain GPL, so the GPL family lists them before the GPL entries.
pub(crate) const KEYWORD_SIGNATURES: &[(&str, &[&str])] = &[
    ("MIT", &["permission is hereby granted free of charge to any person obtaining a copy"]),
    ("Apache-2.0", &["apache license", "version 2 0"]),
    ("AGPL-3.0", &["gnu affero general public license"]),
    ("LGPL-3.0", &["gnu lesser general public license", "version 3"]),
    ("LGPL-2.1", &["gnu lesser general public license"]),
    ("LGPL-2.0", &["gnu library general public license"]),
    ("GPL-3.0", &["gnu general public license", "version 3"]),
    ("GPL-2.0", &["gnu general public license", "version 2"]),
    ("BSD-3-Clause", &["redistribution and use in source and binary forms", "neither the name"]),
    (
        "BSD-3-Clause",
        &["redistribution and use in source and binary forms", "names of its contributors may not be used"],
    ),
    ("BSD-2-Clause", &["redistribution and use in source and binary forms"]),
    (
        "ISC",
        &[
            "permission to use copy modify and or distribute this software for any purpose",
            "provided that the above copyright notice",
        ],
    ),
    ("MPL-2.0", &["mozilla public license version 2 0"]),
    ("MPL-2.0", &["mozilla public license v 2 0"]),
];

struct Reference {
    id: &'static str,
    shingles: HashSet<String>,
}

/// A fingerprint match against the reference corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: &'static str,
    pub score: f64,
}

/// Two-tier license classifier: fingerprint similarity, then keywords.
pub struct LicenseClassifier {
    threshold: f64,
    corpus: Vec<Reference>,
}

impl LicenseClassifier {
    pub fn new(threshold: f64) -> Self {
        let corpus = corpus::references()
            .into_iter()
            .map(|(id, parts)| Reference {
                id,
                shingles: shingles(&words(&parts.join("\n"))),
            })
            .collect();
        Self { threshold, corpus }
    }

    /// Classify raw license file contents. Never fails; worst case `UNKNOWN`.
    pub fn classify(&self, contents: &[u8]) -> String {
        let text = String::from_utf8_lossy(contents);
        let words = words(&text);

        if let Some(m) = self.best_match(&words) {
            debug!(license = m.id, score = m.score, "fingerprint match");
            return m.id.to_string();
        }
        if let Some(id) = keyword_match(&words) {
            debug!(license = id, "keyword match");
            return id.to_string();
        }
        UNKNOWN_LICENSE.to_string()
    }

    /// Read and classify `file`. `None` means no license file was located.
    pub fn classify_file(&self, file: Option<&Path>) -> (LicenseResult, Option<ClassificationWarning>) {
        let Some(path) = file else {
            return (LicenseResult::unknown(), None);
        };
        match std::fs::read(path) {
            Ok(bytes) => (
                LicenseResult {
                    identifier: self.classify(&bytes),
                    file: path.display().to_string(),
                },
                None,
            ),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "unreadable license file");
                let warning = ClassificationWarning {
                    file: path.to_path_buf(),
                    reason: e.to_string(),
                };
                let result = LicenseResult {
                    identifier: UNKNOWN_LICENSE.to_string(),
                    file: path.display().to_string(),
                };
                (result, Some(warning))
            }
        }
    }

    /// Best fingerprint match at or above the threshold.
    ///
    /// Equal scores go to the larger reference, so a BSD-3-Clause text is not
    /// reported as the BSD-2-Clause text it contains.
    fn best_match(&self, words: &[String]) -> Option<Match> {
        let doc = shingles(words);
        if doc.is_empty() {
            return None;
        }

        let mut best: Option<(&Reference, f64)> = None;
        for reference in &self.corpus {
            let score = containment(&reference.shingles, &doc);
            if score < self.threshold {
                continue;
            }
            let better = match best {
                None => true,
                Some((current, current_score)) => {
                    score > current_score + f64::EPSILON
                        || ((score - current_score).abs() <= f64::EPSILON
                            && reference.shingles.len() > current.shingles.len())
                }
            };
            if better {
                best = Some((reference, score));
            }
        }
        best.map(|(r, score)| Match { id: r.id, score })
    }
}

impl Default for LicenseClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

/// Lowercased alphanumeric words; punctuation and layout are ignored.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn shingles(words: &[String]) -> HashSet<String> {
    words
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect()
}

/// Share of the reference's shingles that occur in the document.
fn containment(reference: &HashSet<String>, doc: &HashSet<String>) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    let hits = reference.iter().filter(|s| doc.contains(*s)).count();
    hits as f64 / reference.len() as f64
}

fn keyword_match(words: &[String]) -> Option<&'static str> {
    let text = format!(" {} ", words.join(" "));
    KEYWORD_SIGNATURES
        .iter()
        .find(|(_, phrases)| {
            phrases
                .iter()
                .all(|phrase| text.contains(&format!(" {} ", phrase)))
        })
        .map(|(id, _)| *id)
}
