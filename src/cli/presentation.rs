//! Presentation: render an update report for the console.

use crate::error::ManifestError;
use crate::pipeline::UpdateReport;
use crate::reconcile::FileChange;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Abbreviate a digest for table display.
fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

pub fn format_report_text(report: &UpdateReport, color: bool) -> String {
    let mut out = String::new();

    if report.changes.is_empty() {
        out.push_str("No file changes.\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Change", "Path", "Hash"]);
        for change in &report.changes {
            let (kind, hash) = match change {
                FileChange::Added { hash, .. } => ("added", short_hash(hash).to_string()),
                FileChange::Modified {
                    old_hash, new_hash, ..
                } => (
                    "modified",
                    format!("{} -> {}", short_hash(old_hash), short_hash(new_hash)),
                ),
                FileChange::Removed { hash, .. } => ("removed", short_hash(hash).to_string()),
            };
            table.add_row(vec![kind, change.path(), hash.as_str()]);
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }

    let version = format!("{} -> {}", report.previous_version, report.version);
    let version = if color {
        version.green().to_string()
    } else {
        version
    };
    out.push_str(&format!(
        "{}: {} files, version {}",
        report.name, report.file_count, version
    ));
    if !report.written {
        out.push_str(" (dry run, manifest not written)");
    }
    out
}

pub fn format_report_json(report: &UpdateReport) -> Result<String, ManifestError> {
    Ok(serde_json::to_string_pretty(report)?)
}
