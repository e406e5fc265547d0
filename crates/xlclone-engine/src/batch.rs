//! Folder batch driver.
//!
//! Clones every workbook file directly inside a folder: open read-only,
//! clone, close without saving. One document's failure is tallied and the
//! batch moves on; only a fatal host condition stops the run early.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use xlclone_core::DocumentHost;

use crate::error::{CloneError, CloneResult};
use crate::options::CloneOptions;
use crate::pipeline::{ClonePipeline, CloneReport};

/// Tally of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents attempted.
    pub processed: usize,
    /// Documents cloned.
    pub succeeded: usize,
    /// Documents that could not be opened or failed every strategy.
    pub failed: usize,
    /// Where the clones were written.
    pub output_dir: PathBuf,
}

/// Clone every `.xlsx` directly inside `folder` (no recursion) into
/// `output_dir`, which defaults to `<folder>/new` and is created if
/// missing.
///
/// Fails up front with [`CloneError::EmptyFolder`] when the folder holds no
/// workbook files at all.
pub fn clone_folder(
    host: &dyn DocumentHost,
    folder: &Path,
    output_dir: Option<&Path>,
    options: CloneOptions,
) -> CloneResult<BatchSummary> {
    let sources = xlsx_files(folder)?;
    if sources.is_empty() {
        return Err(CloneError::EmptyFolder(folder.to_path_buf()));
    }

    let output_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => folder.join("new"),
    };
    fs::create_dir_all(&output_dir)?;

    info!(
        folder = %folder.display(),
        files = sources.len(),
        output = %output_dir.display(),
        "batch clone"
    );

    let pipeline = ClonePipeline::new(host, options);
    let mut summary = BatchSummary {
        processed: 0,
        succeeded: 0,
        failed: 0,
        output_dir: output_dir.clone(),
    };

    for source in sources {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        let output = output_dir.join(output_name(&source));
        summary.processed += 1;

        match clone_one(host, &pipeline, &source, &name, &output) {
            Ok(report) => {
                info!(document = name, strategy = %report.strategy, "document cloned");
                summary.succeeded += 1;
            }
            Err(e) if e.is_fatal_for_session() => return Err(e),
            Err(e) => {
                warn!(document = name, error = %e, "document failed, continuing");
                summary.failed += 1;
            }
        }
    }

    info!(
        processed = summary.processed,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch done"
    );
    Ok(summary)
}

/// Output file name for one source: the source stem with the canonical
/// extension.
pub fn output_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook".to_string());
    format!("{stem}.xlsx")
}

/// Open read-only, clone, close. The close runs whether or not the clone
/// succeeded; the host must not accumulate our handles across a batch.
fn clone_one(
    host: &dyn DocumentHost,
    pipeline: &ClonePipeline<'_>,
    source: &Path,
    name: &str,
    output: &Path,
) -> CloneResult<CloneReport> {
    let doc = host.open_readonly(source)?;
    let result = pipeline.clone_document(doc, name, output);

    if let Err(e) = host.close_without_saving(doc) {
        if e.is_fatal() {
            return Err(e.into());
        }
        warn!(document = name, error = %e, "close without saving failed");
    }
    result
}

/// The `.xlsx` files directly inside `folder`, sorted by name. Subfolders
/// are not descended into, so an earlier run's output folder never becomes
/// input.
fn xlsx_files(folder: &Path) -> CloneResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_xlsx_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.xlsx"), b"b").unwrap();
        fs::write(dir.path().join("a.XLSX"), b"a").unwrap();
        fs::write(dir.path().join("notes.txt"), b"n").unwrap();
        fs::create_dir(dir.path().join("new")).unwrap();
        fs::write(dir.path().join("new/c.xlsx"), b"c").unwrap();

        let files = xlsx_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.XLSX", "b.xlsx"]);
    }

    #[test]
    fn test_output_name_normalizes_the_extension() {
        assert_eq!(output_name(Path::new("/tmp/Report.xlsx")), "Report.xlsx");
        assert_eq!(output_name(Path::new("Report.XLSX")), "Report.xlsx");
        assert_eq!(output_name(Path::new("plain")), "plain.xlsx");
    }
}
