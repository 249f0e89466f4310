use std::path::PathBuf;

use crate::batch::{ConvertedFile, FileOutcome};
use crate::error::ConvertError;

/// Accumulated results of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConvertedFile>,
    /// Files already in the target format, with their declared version.
    pub skipped: Vec<(PathBuf, u64)>,
    pub failures: Vec<ConvertError>,
}

impl BatchReport {
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Converted(file) => self.converted.push(file),
            FileOutcome::Skipped { path, version } => self.skipped.push((path, version)),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Total blocks dropped across all converted files.
    pub fn total_dropped(&self) -> usize {
        self.converted.iter().map(|f| f.dropped).sum()
    }
}

/// Format results as a markdown summary table followed by any failures.
pub fn format_summary(report: &BatchReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} converted, {} skipped, {} failed\n",
        report.converted.len(),
        report.skipped.len(),
        report.failures.len()
    ));

    if !report.converted.is_empty() {
        out.push_str("\n| File | Blocks | Entries | Dropped | Backup |\n");
        out.push_str("|------|--------|---------|---------|--------|\n");
        for file in &report.converted {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                file.path.display(),
                file.block_count,
                file.entry_count,
                file.dropped,
                file.backup
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |b| b.display().to_string()),
            ));
        }
    }

    let dropped = report.total_dropped();
    if dropped > 0 {
        out.push_str(&format!(
            "\nWARNING: {} block(s) outside their prefab's size were dropped.\n",
            dropped
        ));
    }

    if report.has_failures() {
        out.push_str("\nFAILED:\n");
        for failure in &report.failures {
            out.push_str(&format!("  - {}\n", failure));
        }
    }

    out
}
