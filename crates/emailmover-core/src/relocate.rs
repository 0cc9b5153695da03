use crate::error::Error;
use crate::manifest::{Directory, ManifestIndex};
use crate::progress::ProgressReporter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationOutcome {
    Moved { from: PathBuf, to: PathBuf },
    /// The matched file no longer exists at its current path.
    Missing { path: PathBuf },
    Failed { path: PathBuf, error: String },
}

#[derive(Debug, Default, Clone)]
pub struct RelocationReport {
    pub outcomes: Vec<RelocationOutcome>,
}

impl RelocationReport {
    pub fn moved(&self) -> usize {
        self.count(|o| matches!(o, RelocationOutcome::Moved { .. }))
    }

    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, RelocationOutcome::Missing { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RelocationOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&RelocationOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelocationSummary {
    pub directories: usize,
    /// Directories whose target could not be prepared.
    pub directory_errors: usize,
    pub moved: usize,
    pub missing: usize,
    pub failed: usize,
}

/// Moves confidently matched files from each directory's current path to its
/// target path.
#[derive(Debug, Default)]
pub struct Relocator;

impl Relocator {
    pub fn new() -> Self {
        Self
    }

    pub fn relocate_all(
        &self,
        index: &ManifestIndex,
        reporter: &dyn ProgressReporter,
    ) -> RelocationSummary {
        let total = index.len();
        let mut summary = RelocationSummary::default();

        reporter.on_relocate_start(total);
        let start = Instant::now();

        for (position, directory) in index.directories().iter().enumerate() {
            reporter.on_directory_start(position, total - position, directory.current_path());
            summary.directories += 1;
            match self.relocate_directory(directory, reporter) {
                Ok(report) => {
                    summary.moved += report.moved();
                    summary.missing += report.missing();
                    summary.failed += report.failed();
                }
                Err(err) => {
                    error!("Could not relocate {}: {}", directory.current_path().display(), err);
                    summary.directory_errors += 1;
                }
            }
        }

        info!(
            "Relocation finished: {} moved, {} missing, {} failed",
            summary.moved, summary.missing, summary.failed
        );
        reporter.on_relocate_complete(&summary, start.elapsed().as_secs_f64());
        summary
    }

    /// Move every matched file of `directory`. Per-file problems become
    /// outcomes; only failing to create the target directory is an error.
    pub fn relocate_directory(
        &self,
        directory: &Directory,
        reporter: &dyn ProgressReporter,
    ) -> Result<RelocationReport, Error> {
        let mut report = RelocationReport::default();
        let mut target_ready = false;

        for subject in &directory.subjects {
            for file_name in subject.matched_files() {
                let from = directory.current_path().join(file_name);
                let to = directory.target_path().join(file_name);

                if !from.exists() {
                    error!("Missing file: {}", from.display());
                    reporter.on_missing_file(&from);
                    report.outcomes.push(RelocationOutcome::Missing { path: from });
                    continue;
                }

                if !target_ready {
                    fs::create_dir_all(directory.target_path())?;
                    target_ready = true;
                }

                info!("Moving file: {} | {}", from.display(), to.display());
                match move_file(&from, &to) {
                    Ok(()) => report.outcomes.push(RelocationOutcome::Moved { from, to }),
                    Err(err) => {
                        error!("Failed to move {}: {}", from.display(), err);
                        report.outcomes.push(RelocationOutcome::Failed {
                            path: from,
                            error: err.to_string(),
                        });
                    }
                }
            }
        }

        Ok(report)
    }
}

/// Rename, falling back to copy + remove when the target is on another device.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            warn!(
                "Rename failed for {} ({}), copying instead",
                from.display(),
                rename_err
            );
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
