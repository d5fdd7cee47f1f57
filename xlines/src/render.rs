//! Terminal table rendering for counting results.
//!
//! Layout follows the classic two-column report: a dashed rule, an
//! `object` / `line count` header, one row per counted object, and a
//! `Total (N objects):` footer. Styling is applied after padding so column
//! alignment survives both terminals and pipes.

use console::style;
use xlineslib::{failed_records, PathRecord, Totals};

/// Width reserved for the right-hand count column.
const COUNT_COLUMN_WIDTH: usize = 12;

/// Bounds on the object-name column.
const MIN_NAME_WIDTH: usize = 24;
const MAX_NAME_WIDTH: usize = 72;

/// Counts above this threshold are accented in the table.
const HIGH_COUNT_THRESHOLD: u64 = 1000;

/// Left indent applied to every table line.
const INDENT: &str = "    ";

/// Render the full report table.
pub fn render_table(records: &[PathRecord], totals: &Totals) -> String {
    let name_width = records
        .iter()
        .map(|r| r.path.to_string_lossy().chars().count())
        .max()
        .unwrap_or(0)
        .clamp(MIN_NAME_WIDTH, MAX_NAME_WIDTH);
    let total_width = name_width + COUNT_COLUMN_WIDTH;

    let mut out = String::new();
    push_rule(&mut out, total_width);
    out.push_str(&format!(
        "{INDENT}{:<name_width$}{:>COUNT_COLUMN_WIDTH$}\n",
        "object", "line count"
    ));
    push_rule(&mut out, total_width);

    for record in records {
        out.push_str(&render_row(record, name_width));
        out.push('\n');
    }

    push_rule(&mut out, total_width);
    let label = format!("Total ({} objects):", group_thousands(totals.total_objects));
    let count = format!(
        "{:>width$}",
        group_thousands(totals.total_lines),
        width = total_width.saturating_sub(label.len())
    );
    out.push_str(&format!(
        "{INDENT}{}{}\n",
        style(&label).bold(),
        style(count).bold()
    ));
    out
}

/// Render the "skipped objects" section for unknown-count records.
///
/// Returns `None` when every record carried a count.
pub fn render_failures(records: &[PathRecord]) -> Option<String> {
    let failed = failed_records(records);
    if failed.is_empty() {
        return None;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "\n{INDENT}Skipped objects ({}):\n",
        failed.len()
    ));
    for record in failed {
        out.push_str(&format!(
            "{INDENT}{INDENT}{}\n",
            style(record.path.display()).dim()
        ));
    }
    Some(out)
}

fn push_rule(out: &mut String, width: usize) {
    out.push_str(INDENT);
    out.push_str(&"-".repeat(width));
    out.push('\n');
}

fn render_row(record: &PathRecord, name_width: usize) -> String {
    let display = record.path.to_string_lossy();
    let truncated = truncate_name(&display, name_width);
    let padding = " ".repeat(name_width.saturating_sub(truncated.chars().count()));

    // style the directory part dim and the filename bright, padding first
    let name = match truncated.rsplit_once('/') {
        Some((dir, file)) => format!(
            "{}{}{}",
            style(dir).dim(),
            style("/").dim(),
            style(file).cyan()
        ),
        None => style(truncated.as_str()).cyan().to_string(),
    };

    let count_cell = match record.line_count {
        Some(count) => {
            let plain = format!("{:>COUNT_COLUMN_WIDTH$}", group_thousands(count));
            if count > HIGH_COUNT_THRESHOLD {
                style(plain).yellow().bold().to_string()
            } else {
                plain
            }
        }
        None => format!("{:>COUNT_COLUMN_WIDTH$}", "--"),
    };

    format!("{INDENT}{name}{padding}{count_cell}")
}

/// Truncate long names from the left, keeping the tail visible.
///
/// Works in characters, not bytes, so the cut never lands inside a
/// multibyte sequence.
fn truncate_name(name: &str, max_len: usize) -> String {
    let total = name.chars().count();
    if total <= max_len {
        return name.to_string();
    }
    let keep = max_len.saturating_sub(2);
    let tail: String = name.chars().skip(total - keep).collect();
    format!("..{tail}")
}

/// Insert thousands separators: 1234567 -> "1,234,567".
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short.txt", 20), "short.txt");
        let long = "a/very/deep/directory/tree/file.txt";
        let cut = truncate_name(long, 12);
        assert_eq!(cut.len(), 12);
        assert!(cut.starts_with(".."));
        assert!(cut.ends_with("file.txt"));
    }

    #[test]
    fn test_truncate_name_multibyte() {
        let name = format!("123456789{}x", "é".repeat(35));
        let cut = truncate_name(&name, 12);
        assert_eq!(cut.chars().count(), 12);
        assert!(cut.starts_with(".."));
        assert!(cut.ends_with('x'));
    }

    #[test]
    fn test_render_table_multibyte_path() {
        let name = format!("deep/{}/fichier.txt", "é".repeat(80));
        let records = vec![PathRecord::counted(name, 2)];
        let totals = Totals::from_records(&records);
        let table = render_table(&records, &totals);

        assert!(table.contains("fichier.txt"));
        assert!(table.contains("Total (1 objects):"));
    }

    #[test]
    fn test_footer_aligned_when_styled() {
        console::set_colors_enabled(true);
        let records = vec![PathRecord::counted("a.txt", 7)];
        let totals = Totals::from_records(&records);
        let table = render_table(&records, &totals);

        let footer = table.lines().last().unwrap();
        let visible = console::strip_ansi_codes(footer);
        assert_eq!(
            visible.len(),
            INDENT.len() + MIN_NAME_WIDTH + COUNT_COLUMN_WIDTH
        );
    }

    #[test]
    fn test_render_table_shape() {
        let records = vec![
            PathRecord::counted("src/a.txt", 3),
            PathRecord::counted("src/b.txt", 1500),
            PathRecord::failed("src/c.bin"),
        ];
        let totals = Totals::from_records(&records);
        let table = render_table(&records, &totals);

        assert!(table.contains("object"));
        assert!(table.contains("line count"));
        assert!(table.contains("1,500"));
        assert!(table.contains("--"));
        assert!(table.contains("Total (2 objects):"));
    }

    #[test]
    fn test_render_failures_lists_unknown_records() {
        let records = vec![
            PathRecord::counted("a.txt", 1),
            PathRecord::failed("b.bin"),
        ];
        let section = render_failures(&records).unwrap();
        assert!(section.contains("Skipped objects (1):"));
        assert!(section.contains("b.bin"));
    }

    #[test]
    fn test_render_failures_none_when_all_counted() {
        let records = vec![PathRecord::counted(PathBuf::from("a.txt"), 1)];
        assert!(render_failures(&records).is_none());
    }
}
