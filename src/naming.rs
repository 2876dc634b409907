//! File names for exported documents and archives.

use chrono::{DateTime, Local};

/// Longest label kept after sanitizing.
pub const MAX_LABEL_CHARS: usize = 64;

/// `{exportId}_{styleNameSlug}.pdf`. Characters that are unsafe in a file
/// name are dropped from the export id.
pub fn document_file_name(export_id: &str, style_name: &str) -> String {
    let id = file_safe(export_id);
    let style = slug::slugify(style_name);
    match (id.is_empty(), style.is_empty()) {
        (false, false) => format!("{}_{}.pdf", id, style),
        (false, true) => format!("{}.pdf", id),
        (true, false) => format!("{}.pdf", style),
        (true, true) => "document.pdf".to_string(),
    }
}

/// `export_{batchNumber}_{YYYYMMDDHHMMSS}.zip`. The batch number keeps its
/// case; unsafe characters are dropped as in [`document_file_name`].
pub fn archive_file_name(batch_number: &str, at: DateTime<Local>) -> String {
    let number = file_safe(batch_number);
    let number = if number.is_empty() { "batch".to_string() } else { number };
    format!("export_{}_{}.zip", number, at.format("%Y%m%d%H%M%S"))
}

fn file_safe(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}

/// Collapses whitespace, strips control characters and truncates to
/// [`MAX_LABEL_CHARS`]. Returns `None` when nothing printable is left.
pub fn sanitize_label(label: &str) -> Option<String> {
    let cleaned: String = label
        .split_whitespace()
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let truncated: String = cleaned.chars().take(MAX_LABEL_CHARS).collect();
    let truncated = truncated.trim_end().to_string();
    (!truncated.is_empty()).then_some(truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn document_names_use_export_id_and_style_slug() {
        assert_eq!(document_file_name("QR-0042", "Classic Black"), "QR-0042_classic-black.pdf");
        assert_eq!(document_file_name(" a/b ", "Ünïcode Style!"), "ab_unicode-style.pdf");
        assert_eq!(document_file_name("X1", "!!!"), "X1.pdf");
    }

    #[test]
    fn archive_name_carries_batch_number_and_timestamp() {
        let at = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(archive_file_name("B-17", at), "export_B-17_20260307090501.zip");
        assert_eq!(archive_file_name(" Run 7/B ", at), "export_Run7B_20260307090501.zip");
        assert_eq!(archive_file_name("../", at), "export_batch_20260307090501.zip");
    }

    #[test]
    fn labels_are_collapsed_and_truncated() {
        assert_eq!(sanitize_label("  Table\t 12 \n"), Some("Table 12".to_string()));
        assert_eq!(sanitize_label("\u{0007}"), None);
        assert_eq!(sanitize_label(&"x".repeat(100)).unwrap().len(), MAX_LABEL_CHARS);
    }
}
