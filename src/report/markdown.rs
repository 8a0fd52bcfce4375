use crate::models::Dependency;

const TABLE_HEADER: &str = "| Module | Version | Type | License | License File |\n";
const TABLE_SEPARATOR: &str = "|--------|---------|------|---------|--------------|\n";

/// Render a Markdown table, one row per dependency in input order.
pub fn render(deps: &[Dependency]) -> String {
    let mut out = String::from(TABLE_HEADER);
    out.push_str(TABLE_SEPARATOR);
    for dep in deps {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            escape_cell(&dep.path),
            escape_cell(&dep.version),
            if dep.indirect { "indirect" } else { "direct" },
            escape_cell(&dep.license),
            escape_cell(&dep.license_file),
        ));
    }
    out
}

/// Escapes pipe characters and newlines for safe Markdown table rendering
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rows_in_order() {
        let deps = vec![
            Dependency {
                path: "example.com/b".into(),
                version: "v2.0.0".into(),
                indirect: true,
                license: "UNKNOWN".into(),
                license_file: String::new(),
                dir: String::new(),
            },
            Dependency {
                path: "example.com/a".into(),
                version: "v1.0.0".into(),
                indirect: false,
                license: "MIT OR Apache|2".into(),
                license_file: "/m/a/LICENSE".into(),
                dir: "/m/a".into(),
            },
        ];
        let out = render(&deps);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "| example.com/b | v2.0.0 | indirect | UNKNOWN |  |");
        assert_eq!(
            lines[3],
            "| example.com/a | v1.0.0 | direct | MIT OR Apache\\|2 | /m/a/LICENSE |"
        );
    }

    #[test]
    fn test_empty_set_renders_header_only() {
        assert_eq!(render(&[]), format!("{}{}", TABLE_HEADER, TABLE_SEPARATOR));
    }
}
