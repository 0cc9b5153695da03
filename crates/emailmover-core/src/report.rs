use crate::error::Error;
use crate::manifest::{ManifestIndex, Subject};
use csv::Writer;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MANIFEST_REPORT: &str = "info.csv";
pub const MATCHED_REPORT: &str = "output.csv";
pub const QUESTIONABLE_REPORT: &str = "output_questionable.csv";

const MANIFEST_HEADER: [&str; 2] = ["Directory", "Subject"];
const AUDIT_HEADER: [&str; 4] = ["Current path", "Subject", "File name", "Move target"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub directory: String,
    pub subject: String,
}

/// One file in the matched or questionable table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRow {
    pub current_path: String,
    pub subject: String,
    pub file_name: String,
    pub target_path: String,
}

#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub manifest: PathBuf,
    pub matched: PathBuf,
    pub questionable: PathBuf,
}

pub fn manifest_rows(index: &ManifestIndex) -> Vec<ManifestRow> {
    index
        .directories()
        .iter()
        .flat_map(|dir| {
            let directory = dir.current_path().to_string_lossy().into_owned();
            dir.subjects.iter().map(move |subject| ManifestRow {
                directory: directory.clone(),
                subject: subject.text.clone(),
            })
        })
        .collect()
}

pub fn matched_rows(index: &ManifestIndex) -> Vec<AuditRow> {
    audit_rows(index, Subject::matched_files)
}

pub fn questionable_rows(index: &ManifestIndex) -> Vec<AuditRow> {
    audit_rows(index, Subject::questionable_files)
}

fn audit_rows(index: &ManifestIndex, files: fn(&Subject) -> &[String]) -> Vec<AuditRow> {
    let mut rows = Vec::new();
    for dir in index.directories() {
        let current_path = dir.current_path().to_string_lossy();
        let target_path = dir.target_path().to_string_lossy();
        for subject in &dir.subjects {
            for file_name in files(subject) {
                rows.push(AuditRow {
                    current_path: current_path.to_string(),
                    subject: subject.text.clone(),
                    file_name: file_name.clone(),
                    target_path: target_path.to_string(),
                });
            }
        }
    }
    rows
}

pub fn write_manifest_csv(index: &ManifestIndex, path: &Path) -> Result<usize, Error> {
    let rows = manifest_rows(index);
    let mut writer = Writer::from_path(path)?;

    writer.write_record(MANIFEST_HEADER)?;
    for row in &rows {
        writer.write_record([row.directory.as_str(), row.subject.as_str()])?;
    }
    writer.flush()?;

    Ok(rows.len())
}

pub fn write_audit_csv(rows: &[AuditRow], path: &Path) -> Result<usize, Error> {
    let mut writer = Writer::from_path(path)?;

    writer.write_record(AUDIT_HEADER)?;
    for row in rows {
        writer.write_record([
            row.current_path.as_str(),
            row.subject.as_str(),
            row.file_name.as_str(),
            row.target_path.as_str(),
        ])?;
    }
    writer.flush()?;

    Ok(rows.len())
}

/// Write the manifest echo. Done before scanning so the expected subjects are
/// on disk even if the scan is interrupted.
pub fn export_manifest(index: &ManifestIndex, output_dir: &Path) -> Result<PathBuf, Error> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(MANIFEST_REPORT);
    let count = write_manifest_csv(index, &path)?;
    info!("Wrote {} manifest rows to {}", count, path.display());
    Ok(path)
}

/// Write the matched and questionable tables after a scan.
pub fn export_results(index: &ManifestIndex, output_dir: &Path) -> Result<(PathBuf, PathBuf), Error> {
    fs::create_dir_all(output_dir)?;

    let matched = output_dir.join(MATCHED_REPORT);
    let count = write_audit_csv(&matched_rows(index), &matched)?;
    info!("Wrote {} matched rows to {}", count, matched.display());

    let questionable = output_dir.join(QUESTIONABLE_REPORT);
    let count = write_audit_csv(&questionable_rows(index), &questionable)?;
    info!("Wrote {} questionable rows to {}", count, questionable.display());

    Ok((matched, questionable))
}

pub fn export_all(index: &ManifestIndex, output_dir: &Path) -> Result<ReportPaths, Error> {
    let manifest = export_manifest(index, output_dir)?;
    let (matched, questionable) = export_results(index, output_dir)?;
    Ok(ReportPaths {
        manifest,
        matched,
        questionable,
    })
}
