//! Directory-level import driver.

use std::io;
use std::path::{Path, PathBuf};

use super::loader::BulkLoader;
use super::types::{FileOutcome, ImportSummary};
use crate::app::print_failure_statistics;
use crate::config::ImportOptions;
use crate::error_handling::ProcessingStats;

const RULE: &str = "============================================================";

/// Lists the regular files in `dir` whose extension matches `extension`
/// (case-insensitive), sorted by file name.
pub fn list_input_files(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let wanted = extension.trim_start_matches('.');
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
            .unwrap_or(false);
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Imports every matching file in the configured directory.
///
/// Each file is its own transaction; a failed file never stops the files
/// after it. Progress is reported after every file and the summary block is
/// written to the loader's sink at the end.
///
/// # Errors
///
/// Only a failure to list the directory is returned as an error.
pub async fn import_directory(
    loader: &mut BulkLoader,
    options: &ImportOptions,
) -> io::Result<ImportSummary> {
    let files = list_input_files(&options.directory, &options.extension)?;
    let sink = loader.sink().clone();

    if files.is_empty() {
        sink.status(&format!(
            "No .{} files found in {}",
            options.extension,
            options.directory.display()
        ));
        return Ok(ImportSummary::default());
    }

    let total = files.len();
    sink.status(&format!("Found {} file(s) to import", total));

    let stats = ProcessingStats::new();
    let mut summary = ImportSummary {
        total,
        ..Default::default()
    };

    for (idx, path) in files.iter().enumerate() {
        let name = file_name(path);
        match loader.load_file(path).await {
            FileOutcome::Success(_) => {
                summary.successful += 1;
                summary.success_files.push(name);
            }
            FileOutcome::Skipped(_) => {
                summary.skipped += 1;
                summary.skipped_files.push(name);
            }
            FileOutcome::Failure { kind, .. } => {
                stats.increment_failure(kind);
                summary.failed += 1;
                summary.failed_files.push(name);
            }
        }
        sink.progress(idx + 1, total);
    }

    sink.status(RULE);
    sink.status("IMPORT SUMMARY");
    sink.status(RULE);
    sink.status(&format!("Total files processed: {}", summary.total));
    sink.status(&format!("Successfully imported: {}", summary.successful));
    sink.status(&format!("Failed imports: {}", summary.failed));
    sink.status(&format!("Skipped (empty): {}", summary.skipped));
    if !summary.failed_files.is_empty() {
        sink.status("Failed files:");
        for name in &summary.failed_files {
            sink.status(&format!("  - {}", name));
        }
    }
    sink.status(RULE);

    print_failure_statistics(&stats);

    Ok(summary)
}
