//! Batch parsing of agenda files.
//!
//! A bad document never stops a batch: its error is logged with the document
//! uid and recorded in the report, and the next document is parsed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::agenda::Agenda;
use crate::convert::DocumentConverter;
use crate::error::{ParserError, Result};

/// A document that could not be parsed.
#[derive(Debug)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub uid: String,
    pub error: ParserError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Agendas parsed, in input order.
    pub agendas: Vec<Agenda>,

    /// Documents that failed, in input order.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Total number of documents seen.
    #[must_use]
    pub fn total(&self) -> usize {
        self.agendas.len() + self.failures.len()
    }

    /// Total number of warnings over all parsed agendas.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.agendas.iter().map(|a| a.warnings.len()).sum()
    }
}

/// Uid of a document from its file name, e.g. `council_agenda-20131009-e.html`.
#[must_use]
pub fn uid_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Convert and parse a single agenda file.
///
/// # Errors
/// Returns conversion errors and parse errors of the document.
pub fn parse_agenda_file(path: &Path, converter: &dyn DocumentConverter) -> Result<Agenda> {
    let uid = uid_from_path(path)
        .ok_or_else(|| ParserError::InvalidUid(path.display().to_string()))?;
    let markup = converter.convert(path)?;
    Agenda::parse(&uid, &markup)
}

/// Parse agenda files, collecting failures instead of stopping.
pub fn parse_agenda_files<P: AsRef<Path>>(
    paths: &[P],
    converter: &dyn DocumentConverter,
) -> BatchReport {
    parse_agenda_files_with_progress(paths, converter, |_| {})
}

/// Parse agenda files, calling `on_done` after each document.
pub fn parse_agenda_files_with_progress<P, F>(
    paths: &[P],
    converter: &dyn DocumentConverter,
    mut on_done: F,
) -> BatchReport
where
    P: AsRef<Path>,
    F: FnMut(&Path),
{
    let mut report = BatchReport::default();

    for path in paths {
        let path = path.as_ref();
        match parse_agenda_file(path, converter) {
            Ok(agenda) => report.agendas.push(agenda),
            Err(error) => {
                let uid = uid_from_path(path).unwrap_or_default();
                tracing::warn!(uid = %uid, path = %path.display(), error = %error, "Could not parse agenda");
                report.failures.push(BatchFailure {
                    path: path.to_path_buf(),
                    uid,
                    error,
                });
            }
        }
        on_done(path);
    }

    tracing::info!(
        parsed = report.agendas.len(),
        failed = report.failures.len(),
        "Batch finished"
    );
    report
}

/// List the files in a directory the converter accepts, sorted by name.
///
/// # Errors
/// Returns an IO error if the directory cannot be read.
pub fn collect_files(dir: &Path, converter: &dyn DocumentConverter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if converter.accepts(&path) {
            files.push(path);
        } else {
            tracing::debug!(path = %path.display(), "Skipping file the converter does not accept");
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::HtmlConverter;
    use tempfile::tempdir;

    #[test]
    fn test_uid_from_path() {
        assert_eq!(
            uid_from_path(Path::new("/data/council_agenda-20131009-e.html")).as_deref(),
            Some("council_agenda-20131009-e")
        );
    }

    #[test]
    fn test_batch_continues_after_failures() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("council_agenda-20131009-e.html");
        let empty = dir.path().join("council_agenda-20131016-e.html");
        let bad_uid = dir.path().join("agenda.html");
        let word = dir.path().join("council_agenda-20131023-e.doc");
        fs::write(&good, "<p>I. Questions</p><p>1. Hon A to ask:</p>").unwrap();
        fs::write(&empty, "<script></script>").unwrap();
        fs::write(&bad_uid, "<p>I. Bills</p>").unwrap();
        fs::write(&word, "binary").unwrap();

        let paths = vec![good, empty, bad_uid, word];
        let mut seen = 0;
        let report =
            parse_agenda_files_with_progress(&paths, &HtmlConverter, |_| seen += 1);

        assert_eq!(seen, 4);
        assert_eq!(report.total(), 4);
        assert_eq!(report.agendas.len(), 1);
        assert_eq!(report.agendas[0].uid, "council_agenda-20131009-e");

        let failed: Vec<_> = report.failures.iter().map(|f| f.uid.as_str()).collect();
        assert_eq!(
            failed,
            vec![
                "council_agenda-20131016-e",
                "agenda",
                "council_agenda-20131023-e"
            ]
        );
        assert!(matches!(
            report.failures[0].error,
            ParserError::EmptyDocument { .. }
        ));
        assert!(matches!(report.failures[1].error, ParserError::InvalidUid(_)));
        assert!(matches!(
            report.failures[2].error,
            ParserError::UnsupportedFormat { .. }
        ));
    }

    #[test]
    fn test_collect_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.html"), "").unwrap();
        fs::write(dir.path().join("a.htm"), "").unwrap();
        fs::write(dir.path().join("c.docx"), "").unwrap();
        fs::create_dir(dir.path().join("sub.html")).unwrap();

        let files = collect_files(dir.path(), &HtmlConverter).unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.htm", "b.html"]);
    }
}
