use crate::error::Error;
use crate::normalize::{normalize_path, strip_bracket_suffix};
use ahash::AHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An expected subject within a manifest directory, plus the files the scan
/// attributed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub text: String,
    matched_files: Vec<String>,
    questionable_files: Vec<String>,
}

impl Subject {
    /// `text` must already be bracket-stripped.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            matched_files: Vec::new(),
            questionable_files: Vec::new(),
        }
    }

    pub fn matched_files(&self) -> &[String] {
        &self.matched_files
    }

    pub fn questionable_files(&self) -> &[String] {
        &self.questionable_files
    }

    /// Returns false if the file was already matched.
    pub fn add_matched_file(&mut self, file_name: &str) -> bool {
        if self.matched_files.iter().any(|f| f == file_name) {
            return false;
        }
        self.matched_files.push(file_name.to_string());
        true
    }

    /// Record a file whose name contains this subject but whose own subject
    /// did not match. A file already confidently matched is refused.
    pub fn add_questionable_file(&mut self, file_name: &str) -> Result<bool, Error> {
        if self.matched_files.iter().any(|f| f == file_name) {
            return Err(Error::AlreadyMatched {
                subject: self.text.clone(),
                file_name: file_name.to_string(),
            });
        }
        if self.questionable_files.iter().any(|f| f == file_name) {
            return Ok(false);
        }
        self.questionable_files.push(file_name.to_string());
        Ok(true)
    }
}

/// A manifest directory, keyed by its raw share path.
#[derive(Debug, Clone)]
pub struct Directory {
    original_path: String,
    relative_path: String,
    current_path: PathBuf,
    target_path: PathBuf,
    pub subjects: Vec<Subject>,
}

impl Directory {
    pub fn new(original_path: &str, source_root: &Path, target_root: &Path) -> Self {
        let relative_path = normalize_path(original_path);
        // a path on another share normalizes to `//host/...`;
        // joined as-is it would replace the root instead of extending it
        let under_root = relative_path.trim_start_matches('/');
        Self {
            original_path: original_path.to_string(),
            current_path: source_root.join(under_root),
            target_path: target_root.join(under_root),
            relative_path,
            subjects: Vec::new(),
        }
    }

    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Adds the bracket-stripped subject unless an equal one is already present.
    pub fn add_subject(&mut self, raw_subject: &str) -> bool {
        let text = strip_bracket_suffix(raw_subject);
        if self.subjects.iter().any(|s| s.text == text) {
            return false;
        }
        self.subjects.push(Subject::new(text));
        true
    }
}

/// Directories in manifest order, indexed by original path.
#[derive(Debug)]
pub struct ManifestIndex {
    source_root: PathBuf,
    target_root: PathBuf,
    directories: Vec<Directory>,
    by_original_path: AHashMap<String, usize>,
}

impl ManifestIndex {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            directories: Vec::new(),
            by_original_path: AHashMap::new(),
        }
    }

    /// Read a headerless two-column manifest CSV encoded as Windows-1252.
    pub fn load(
        manifest_path: &Path,
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
    ) -> Result<Self, Error> {
        let bytes = fs::read(manifest_path)?;
        Self::from_bytes(&bytes, source_root, target_root)
    }

    pub fn from_bytes(
        bytes: &[u8],
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
    ) -> Result<Self, Error> {
        let (content, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut index = Self::new(source_root, target_root);
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            match (record.get(0), record.get(1)) {
                (Some(directory), Some(subject)) => index.add_row(directory, subject),
                _ => warn!("Skipping manifest row {}: expected 2 columns", row_idx + 1),
            }
        }

        debug!(
            "Manifest loaded: {} directories, {} subjects",
            index.len(),
            index.subject_count()
        );
        Ok(index)
    }

    /// Merge a manifest row into the index.
    pub fn add_row(&mut self, directory_path: &str, subject_text: &str) {
        let position = match self.by_original_path.get(directory_path) {
            Some(&position) => position,
            None => {
                let directory =
                    Directory::new(directory_path, &self.source_root, &self.target_root);
                self.directories.push(directory);
                let position = self.directories.len() - 1;
                self.by_original_path
                    .insert(directory_path.to_string(), position);
                position
            }
        };
        self.directories[position].add_subject(subject_text);
    }

    pub fn get(&self, original_path: &str) -> Option<&Directory> {
        self.by_original_path
            .get(original_path)
            .map(|&position| &self.directories[position])
    }

    pub fn directories(&self) -> &[Directory] {
        &self.directories
    }

    pub fn directories_mut(&mut self) -> &mut [Directory] {
        &mut self.directories
    }

    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    pub fn subject_count(&self) -> usize {
        self.directories.iter().map(|d| d.subjects.len()).sum()
    }
}
