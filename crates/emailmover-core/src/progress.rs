use crate::engine::ScanStats;
use crate::relocate::RelocationSummary;
use std::path::Path;

/// Trait for reporting run progress.
///
/// The CLI implements it with indicatif and console output; tests use
/// [`SilentReporter`]. All methods have default no-op implementations.
pub trait ProgressReporter {
    fn on_manifest_loaded(&self, _directories: usize, _subjects: usize) {}
    fn on_scan_start(&self, _total_directories: usize) {}
    fn on_directory_start(&self, _position: usize, _remaining: usize, _path: &Path) {}
    fn on_scan_complete(&self, _stats: &ScanStats, _duration_secs: f64) {}
    fn on_relocate_start(&self, _total_directories: usize) {}
    /// A matched file was gone by the time it was due to move.
    fn on_missing_file(&self, _path: &Path) {}
    fn on_relocate_complete(&self, _summary: &RelocationSummary, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
