use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::license::risk::risk_of;
use crate::models::{Dependency, LicenseRisk};

/// Render a dependency table.
///
/// With `styled`, cells are coloured and the table wraps to the terminal
/// width; otherwise the output is plain and independent of the terminal.
pub fn render(deps: &[Dependency], styled: bool) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        header("Module", styled),
        header("Version", styled),
        header("Type", styled),
        header("License", styled),
        header("Risk", styled),
        header("License File", styled),
    ]);
    if styled {
        table
            .set_content_arrangement(ContentArrangement::Dynamic)
            .enforce_styling();
    } else {
        table
            .set_content_arrangement(ContentArrangement::Disabled)
            .force_no_tty();
    }

    for dep in deps {
        let risk = risk_of(&dep.license);
        let mut risk_cell = Cell::new(risk.to_string());
        let mut license_cell = Cell::new(&dep.license);
        if styled {
            let color = risk_color(risk);
            risk_cell = risk_cell.fg(color);
            license_cell = license_cell.fg(color);
        }

        table.add_row(vec![
            Cell::new(&dep.path),
            Cell::new(&dep.version),
            Cell::new(if dep.indirect { "indirect" } else { "direct" }),
            license_cell,
            risk_cell,
            Cell::new(&dep.license_file),
        ]);
    }

    format!("{}\n", table)
}

fn header(title: &str, styled: bool) -> Cell {
    let cell = Cell::new(title);
    if styled {
        cell.add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

fn risk_color(risk: LicenseRisk) -> Color {
    match risk {
        LicenseRisk::Permissive => Color::Green,
        LicenseRisk::WeakCopyleft => Color::Yellow,
        LicenseRisk::StrongCopyleft => Color::Red,
        LicenseRisk::Unknown => Color::DarkGrey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_table_has_rows_and_no_escapes() {
        let deps = vec![Dependency {
            path: "example.com/a".into(),
            version: "v1.0.0".into(),
            indirect: true,
            license: "GPL-3.0".into(),
            license_file: "/m/a/COPYING".into(),
            dir: "/m/a".into(),
        }];
        let out = render(&deps, false);
        assert!(out.contains("example.com/a"));
        assert!(out.contains("indirect"));
        assert!(out.contains("Strong Copyleft"));
        assert!(!out.contains('\u{1b}'));
    }
}
