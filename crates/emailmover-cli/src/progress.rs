use colored::*;
use emailmover_core::{ProgressReporter, RelocationSummary, ScanStats};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::Path;

/// CLI progress reporter using an indicatif bar per phase.
///
/// - Scan phase: one tick per manifest directory, counting down like the log
/// - Relocate phase: same, plus a loud line for every missing file
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn start_bar(&self, total: usize, label: &str) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::with_template(&format!(
                "  {{spinner:.cyan}} {} [{{bar:30.cyan/dim}}] {{pos}}/{{len}} {{msg}}",
                label
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        if let Some(old) = self.bar.replace(Some(pb)) {
            old.finish_and_clear();
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }

    fn println(&self, line: String) {
        match self.bar.borrow().as_ref() {
            Some(pb) => pb.println(line),
            None => eprintln!("{}", line),
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_manifest_loaded(&self, directories: usize, subjects: usize) {
        eprintln!(
            "  {} Manifest loaded: {} directories, {} subjects",
            "✓".green(),
            directories,
            subjects
        );
    }

    fn on_scan_start(&self, total_directories: usize) {
        self.start_bar(total_directories, "Matching");
    }

    fn on_directory_start(&self, position: usize, remaining: usize, path: &Path) {
        let guard = self.bar.borrow();
        if let Some(pb) = guard.as_ref() {
            pb.set_position(position as u64);
            pb.set_message(format!("{} - {}", remaining, path.display()));
        }
    }

    fn on_scan_complete(&self, stats: &ScanStats, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Matching complete: {} files seen, {} read in {:.2}s",
            "✓".green(),
            stats.files_seen,
            stats.files_read,
            duration_secs
        );
    }

    fn on_relocate_start(&self, total_directories: usize) {
        self.start_bar(total_directories, "Moving");
    }

    fn on_missing_file(&self, path: &Path) {
        self.println(format!("  {}{}", "!!!Missing file: ".red().bold(), path.display()));
    }

    fn on_relocate_complete(&self, summary: &RelocationSummary, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Relocation complete: {} moved, {} missing, {} failed in {:.2}s",
            "✓".green(),
            summary.moved,
            summary.missing,
            summary.failed,
            duration_secs
        );
    }
}
