use comfy_table::{presets, CellAlignment, Table};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Print `data` as JSON (if `--json`) or call `display_fn` for human-readable output.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        let json = serde_json::to_string_pretty(data)?;
        println!("{json}");
    } else {
        display_fn(data);
    }
    Ok(())
}

/// Render `rows` under `headers` as a borderless table, two spaces between columns and every
/// line indented by two. Columns listed in `numeric` are right-aligned.
pub fn render_table(headers: &[&str], numeric: &[usize], rows: Vec<Vec<String>>) -> String {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING).set_header(headers.to_vec());
    for row in rows {
        table.add_row(row);
    }

    let last = headers.len().saturating_sub(1);
    for (index, column) in table.column_iter_mut().enumerate() {
        if numeric.contains(&index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
        column.set_padding((0, if index == last { 0 } else { 2 }));
    }

    table
        .to_string()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("  {}\n", line.trim_end()))
        .collect()
}

pub fn print_table(headers: &[&str], numeric: &[usize], rows: Vec<Vec<String>>) {
    print!("{}", render_table(headers, numeric, rows));
}

/// Compact rendering of a float: integral values without a fraction.
pub fn float(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_formatting() {
        assert_eq!(float(400.0), "400");
        assert_eq!(float(-150.0), "-150");
        assert_eq!(float(0.5), "0.5");
    }

    #[test]
    fn table_columns_line_up() {
        let rows = vec![
            vec!["M_Title".to_string(), "1".to_string()],
            vec!["M_Bg".to_string(), "12".to_string()],
        ];
        let rendered = render_table(&["Name", "TEV"], &[1], rows);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.starts_with("  ")));
        assert!(lines[0].contains("Name"));
        assert!(lines[1].ends_with(" 1"));
        assert!(lines[2].ends_with("12"));
        assert_eq!(lines[1].len(), lines[2].len());
        assert_eq!(lines[0].len(), lines[1].len());
    }
}
