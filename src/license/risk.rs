use crate::models::LicenseRisk;

/// Risk level of an identifier the classifier can report.
///
/// SPDX `-only`, `-or-later` and `+` forms fall back to their base id, so a
/// hand-written `GPL-3.0-or-later` filter term rates like `GPL-3.0`.
pub fn risk_of(id: &str) -> LicenseRisk {
    match base_id(id.trim()) {
        "MIT" | "MIT-0" | "ISC" | "0BSD" | "BSD-2-Clause" | "BSD-3-Clause" | "Apache-2.0"
        | "BSL-1.0" | "Unlicense" | "Zlib" => LicenseRisk::Permissive,
        "MPL-2.0" | "LGPL-2.0" | "LGPL-2.1" | "LGPL-3.0" => LicenseRisk::WeakCopyleft,
        "GPL-2.0" | "GPL-3.0" | "AGPL-3.0" => LicenseRisk::StrongCopyleft,
        _ => LicenseRisk::Unknown,
    }
}

fn base_id(id: &str) -> &str {
    ["-or-later", "-only", "+"]
        .iter()
        .find_map(|suffix| id.strip_suffix(suffix))
        .unwrap_or(id)
}

/// Map a user-supplied filter term onto the identifier the classifier reports.
///
/// Family names such as `GPL` or `BSD` are left alone so they keep matching
/// every member of the family.
pub fn normalize_term(raw: &str) -> String {
    let term = base_id(raw.trim());
    let canonical = match term.to_ascii_lowercase().as_str() {
        "mit license" | "the mit license" | "expat" => "MIT",
        "apache 2.0" | "apache2" | "apache license 2.0" | "apache license, version 2.0" => {
            "Apache-2.0"
        }
        "simplified bsd" | "bsd 2-clause" | "freebsd" => "BSD-2-Clause",
        "new bsd" | "modified bsd" | "bsd 3-clause" => "BSD-3-Clause",
        "boost" | "boost software license" => "BSL-1.0",
        "mpl 2.0" | "mplv2" => "MPL-2.0",
        "gplv2" | "gpl v2" | "gnu gpl v2" => "GPL-2.0",
        "gplv3" | "gpl v3" | "gnu gpl v3" => "GPL-3.0",
        "agplv3" | "agpl v3" | "gnu agpl v3" => "AGPL-3.0",
        "lgplv2" | "lgpl v2" | "library gpl" => "LGPL-2.0",
        "lgplv2.1" | "lgpl v2.1" | "gnu lgpl v2.1" => "LGPL-2.1",
        "lgplv3" | "lgpl v3" | "gnu lgpl v3" => "LGPL-3.0",
        _ => term,
    };
    canonical.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::classifier::KEYWORD_SIGNATURES;
    use crate::license::corpus;
    use crate::models::UNKNOWN_LICENSE;

    #[test]
    fn test_every_reported_id_is_rated() {
        let corpus_ids = corpus::references().into_iter().map(|(id, _)| id);
        let keyword_ids = KEYWORD_SIGNATURES.iter().map(|(id, _)| *id);
        for id in corpus_ids.chain(keyword_ids) {
            assert_ne!(risk_of(id), LicenseRisk::Unknown, "{id} has no risk level");
        }
        assert_eq!(risk_of(UNKNOWN_LICENSE), LicenseRisk::Unknown);
    }

    #[test]
    fn test_copyleft_levels() {
        assert_eq!(risk_of("AGPL-3.0"), LicenseRisk::StrongCopyleft);
        assert_eq!(risk_of("GPL-2.0"), LicenseRisk::StrongCopyleft);
        assert_eq!(risk_of("LGPL-2.0"), LicenseRisk::WeakCopyleft);
        assert_eq!(risk_of("MPL-2.0"), LicenseRisk::WeakCopyleft);
        assert_eq!(risk_of("BSL-1.0"), LicenseRisk::Permissive);
    }

    #[test]
    fn test_family_suffixes_use_base_id() {
        assert_eq!(risk_of("GPL-3.0-or-later"), LicenseRisk::StrongCopyleft);
        assert_eq!(risk_of("LGPL-2.1-only"), LicenseRisk::WeakCopyleft);
        assert_eq!(risk_of("GPL-2.0+"), LicenseRisk::StrongCopyleft);
        assert_eq!(risk_of("MIT OR Apache-2.0"), LicenseRisk::Unknown);
        assert_eq!(risk_of("EPL-2.0"), LicenseRisk::Unknown);
    }

    #[test]
    fn test_terms_map_to_reported_ids() {
        assert_eq!(normalize_term("GPLv3"), "GPL-3.0");
        assert_eq!(normalize_term(" Apache License 2.0 "), "Apache-2.0");
        assert_eq!(normalize_term("GPL-2.0-or-later"), "GPL-2.0");
        assert_eq!(normalize_term("library GPL"), "LGPL-2.0");
        assert_eq!(normalize_term("gplv3"), "GPL-3.0");
        assert_eq!(normalize_term("GPL"), "GPL");
        assert_eq!(normalize_term("BSD"), "BSD");
    }
}
