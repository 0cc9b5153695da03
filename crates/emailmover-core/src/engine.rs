use crate::error::Error;
use crate::manifest::{Directory, ManifestIndex, Subject};
use crate::progress::ProgressReporter;
use crate::subject::extract_subject;
use std::time::Instant;
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// File names carrying this marker were excluded upstream and are never read.
/// Underscores count as spaces when looking for it.
pub const NO_SUBJECT_MARKER: &str = "no subject";

/// Counters for one directory or, once absorbed, a whole run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub directories_scanned: usize,
    pub missing_directories: usize,
    /// Every file in a scanned listing, skipped or not.
    pub files_seen: usize,
    pub files_skipped: usize,
    /// Files handed to subject extraction.
    pub files_read: usize,
    pub no_subject: usize,
    pub extraction_failures: usize,
    pub matched: usize,
    pub questionable: usize,
    /// Files proposed as questionable for a subject they already matched.
    pub conflicts: usize,
}

impl ScanStats {
    pub fn absorb(&mut self, other: &ScanStats) {
        self.directories_scanned += other.directories_scanned;
        self.missing_directories += other.missing_directories;
        self.files_seen += other.files_seen;
        self.files_skipped += other.files_skipped;
        self.files_read += other.files_read;
        self.no_subject += other.no_subject;
        self.extraction_failures += other.extraction_failures;
        self.matched += other.matched;
        self.questionable += other.questionable;
        self.conflicts += other.conflicts;
    }
}

#[derive(Debug, Default)]
pub struct MatchingEngine;

impl MatchingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Classify every manifest directory in order. A directory that cannot be
    /// scanned is logged and counted; the run always reaches the end.
    pub fn scan(&self, index: &mut ManifestIndex, reporter: &dyn ProgressReporter) -> ScanStats {
        let total = index.len();
        let mut totals = ScanStats::default();

        reporter.on_scan_start(total);
        let start = Instant::now();

        for (position, directory) in index.directories_mut().iter_mut().enumerate() {
            reporter.on_directory_start(position, total - position, directory.current_path());
            match self.match_directory(directory) {
                Ok(stats) => totals.absorb(&stats),
                Err(err) => {
                    error!("Skipping {}: {}", directory.original_path(), err);
                    totals.missing_directories += 1;
                }
            }
        }

        let duration = start.elapsed();
        info!("Total files in searched directories: {}", totals.files_seen);
        info!("Total files interpreted: {}", totals.files_read);
        debug!(
            "Scan completed in {:.2}s: {} matched, {} questionable, {} without subject, {} failures",
            duration.as_secs_f64(),
            totals.matched,
            totals.questionable,
            totals.no_subject,
            totals.extraction_failures,
        );
        reporter.on_scan_complete(&totals, duration.as_secs_f64());

        totals
    }

    /// Scan the immediate files of one directory and record each file against
    /// the directory's subjects. Subdirectories are not entered.
    pub fn match_directory(&self, directory: &mut Directory) -> Result<ScanStats, Error> {
        let dir_path = directory.current_path().to_path_buf();
        if !dir_path.is_dir() {
            return Err(Error::MissingDirectory(dir_path));
        }

        let mut stats = ScanStats {
            directories_scanned: 1,
            ..ScanStats::default()
        };

        let walker = WalkDir::new(&dir_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    error!("Error reading entry in {}: {}", dir_path.display(), err);
                    continue;
                }
            };
            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            stats.files_seen += 1;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if is_excluded(&file_name) {
                stats.files_skipped += 1;
                continue;
            }

            stats.files_read += 1;
            let file_subject = match extract_subject(path) {
                Ok(Some(subject)) => subject,
                Ok(None) => {
                    stats.no_subject += 1;
                    continue;
                }
                Err(err) => {
                    error!("Could not read subject of {}: {}", path.display(), err);
                    stats.extraction_failures += 1;
                    continue;
                }
            };

            classify_file(&mut directory.subjects, &file_name, &file_subject, &mut stats);
        }

        Ok(stats)
    }
}

fn is_excluded(file_name: &str) -> bool {
    file_name.replace('_', " ").contains(NO_SUBJECT_MARKER)
}

/// Exact subject equality is a confident match. Failing that, a known subject
/// appearing in the file *name* marks the file questionable; the extracted
/// subject is not consulted for that.
fn classify_file(
    subjects: &mut [Subject],
    file_name: &str,
    file_subject: &str,
    stats: &mut ScanStats,
) {
    for subject in subjects.iter_mut() {
        if file_subject == subject.text {
            if subject.add_matched_file(file_name) {
                debug!("Matched {} to '{}'", file_name, subject.text);
                stats.matched += 1;
            }
        } else if file_name.contains(subject.text.as_str()) {
            match subject.add_questionable_file(file_name) {
                Ok(true) => {
                    debug!("Questionable {} for '{}'", file_name, subject.text);
                    stats.questionable += 1;
                }
                Ok(false) => {}
                Err(err) => {
                    error!("{}", err);
                    stats.conflicts += 1;
                }
            }
        }
    }
}
