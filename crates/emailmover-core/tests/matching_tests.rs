use std::fs;
use std::path::Path;
use tempfile::tempdir;

use emailmover_core::{Error, ManifestIndex, MatchingEngine, SilentReporter};

const PROJECT_X: &str = r"\\ahg-sto-100\nf\ProjectX";

fn message(subject: &str) -> String {
    format!(
        "From: pm@example.com\r\nTo: site@example.com\r\nSubject: {}\r\n\r\nSee attached.\r\n",
        subject
    )
}

/// Layout:
///   source/ProjectX/
///     visit.msg                   (Subject: Site Visit)
///     notes.msg                   (Subject: Site Visit Notes)
///     Site Visit Notes copy.msg   (Subject: Site Visit Notes)
///     report_no_subject.txt       (Subject: Site Visit) never read
///     readme.txt                  (no headers)
///     archive/nested.msg          (Subject: Site Visit) below scan depth
fn create_project_tree(source: &Path) {
    let project = source.join("ProjectX");
    fs::create_dir_all(project.join("archive")).unwrap();

    fs::write(project.join("visit.msg"), message("Site Visit")).unwrap();
    fs::write(project.join("notes.msg"), message("Site Visit Notes")).unwrap();
    fs::write(project.join("Site Visit Notes copy.msg"), message("Site Visit Notes")).unwrap();
    fs::write(project.join("report_no_subject.txt"), message("Site Visit")).unwrap();
    fs::write(project.join("readme.txt"), "plain text, not a message\n").unwrap();
    fs::write(project.join("archive").join("nested.msg"), message("Site Visit")).unwrap();
}

fn project_index(source: &Path, target: &Path) -> ManifestIndex {
    let mut index = ManifestIndex::new(source, target);
    index.add_row(PROJECT_X, "Site Visit [urgent]");
    index
}

#[test]
fn test_manifest_row_normalizes_directory_and_subject() {
    let index = project_index(Path::new("/src"), Path::new("/dst"));
    let dir = index.get(PROJECT_X).unwrap();
    assert_eq!(dir.relative_path(), "ProjectX");
    assert_eq!(dir.subjects.len(), 1);
    assert_eq!(dir.subjects[0].text, "Site Visit");
}

#[test]
fn test_exact_subject_is_matched() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    create_project_tree(&source);
    let mut index = project_index(&source, &tmp.path().join("target"));

    let stats = MatchingEngine::new().scan(&mut index, &SilentReporter);

    let subject = &index.directories()[0].subjects[0];
    assert_eq!(subject.matched_files(), &["visit.msg".to_string()]);
    assert_eq!(stats.matched, 1);
    assert_eq!(stats.directories_scanned, 1);
}

#[test]
fn test_longer_subject_is_questionable_only_by_file_name() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    create_project_tree(&source);
    let mut index = project_index(&source, &tmp.path().join("target"));

    MatchingEngine::new().scan(&mut index, &SilentReporter);

    let subject = &index.directories()[0].subjects[0];
    // notes.msg has subject "Site Visit Notes" but its name lacks "Site Visit"
    assert!(!subject.matched_files().contains(&"notes.msg".to_string()));
    assert!(!subject.questionable_files().contains(&"notes.msg".to_string()));
    // same subject, but the file name contains the known subject
    assert_eq!(
        subject.questionable_files(),
        &["Site Visit Notes copy.msg".to_string()]
    );
}

#[test]
fn test_questionable_rule_checks_file_name_not_extracted_subject() {
    // The extracted subject "Site Visit Notes" contains "Site Visit", yet only
    // a file *named* after the subject is flagged. Kept deliberately.
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("ProjectX");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("a.msg"), message("Site Visit Notes")).unwrap();
    fs::write(dir.join("Site Visit b.msg"), message("Unrelated")).unwrap();

    let mut index = ManifestIndex::new(tmp.path(), tmp.path().join("target"));
    index.add_row(PROJECT_X, "Site Visit");
    MatchingEngine::new().scan(&mut index, &SilentReporter);

    let subject = &index.directories()[0].subjects[0];
    assert!(subject.matched_files().is_empty());
    assert_eq!(subject.questionable_files(), &["Site Visit b.msg".to_string()]);
}

#[test]
fn test_exact_match_never_also_questionable() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("ProjectX");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Site Visit.msg"), message("Site Visit")).unwrap();

    let mut index = ManifestIndex::new(tmp.path(), tmp.path().join("target"));
    index.add_row(PROJECT_X, "Site Visit");
    let stats = MatchingEngine::new().scan(&mut index, &SilentReporter);

    let subject = &index.directories()[0].subjects[0];
    assert_eq!(subject.matched_files(), &["Site Visit.msg".to_string()]);
    assert!(subject.questionable_files().is_empty());
    assert_eq!(stats.conflicts, 0);
}

#[test]
fn test_counters_skip_marker_and_depth() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    create_project_tree(&source);
    let mut index = project_index(&source, &tmp.path().join("target"));

    let stats = MatchingEngine::new().scan(&mut index, &SilentReporter);

    // five files at depth 1; archive/ is neither counted nor entered
    assert_eq!(stats.files_seen, 5);
    assert_eq!(stats.files_skipped, 1);
    assert_eq!(stats.files_read, 4);
    assert_eq!(stats.no_subject + stats.extraction_failures, 1);

    let subject = &index.directories()[0].subjects[0];
    let all: Vec<&String> = subject
        .matched_files()
        .iter()
        .chain(subject.questionable_files())
        .collect();
    assert!(!all.iter().any(|f| f.as_str() == "report_no_subject.txt"));
    assert!(!all.iter().any(|f| f.as_str() == "nested.msg"));
}

#[test]
fn test_rescan_is_idempotent() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    create_project_tree(&source);
    let mut index = project_index(&source, &tmp.path().join("target"));
    let engine = MatchingEngine::new();

    engine.scan(&mut index, &SilentReporter);
    let second = engine.scan(&mut index, &SilentReporter);

    let subject = &index.directories()[0].subjects[0];
    assert_eq!(subject.matched_files().len(), 1);
    assert_eq!(subject.questionable_files().len(), 1);
    assert_eq!(second.matched, 0);
    assert_eq!(second.questionable, 0);
}

#[test]
fn test_missing_directory_does_not_stop_scan() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("source");
    create_project_tree(&source);

    let mut index = ManifestIndex::new(&source, tmp.path().join("target"));
    index.add_row(r"\\ahg-sto-100\nf\Gone", "Site Visit");
    index.add_row(PROJECT_X, "Site Visit");

    let stats = MatchingEngine::new().scan(&mut index, &SilentReporter);
    assert_eq!(stats.missing_directories, 1);
    assert_eq!(stats.directories_scanned, 1);
    assert_eq!(stats.matched, 1);

    let err = MatchingEngine::new()
        .match_directory(&mut index.directories_mut()[0])
        .unwrap_err();
    assert!(matches!(err, Error::MissingDirectory(_)));
}

#[test]
fn test_subjects_matched_independently_within_directory() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("ProjectX");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("1.msg"), message("Budget")).unwrap();
    fs::write(dir.join("2.msg"), message("Minutes")).unwrap();
    fs::write(dir.join("3.msg"), message("Budget")).unwrap();

    let mut index = ManifestIndex::new(tmp.path(), tmp.path().join("target"));
    index.add_row(PROJECT_X, "Budget [fy14]");
    index.add_row(PROJECT_X, "Minutes");
    index.add_row(PROJECT_X, "Budget");

    MatchingEngine::new().scan(&mut index, &SilentReporter);

    let dir = index.get(PROJECT_X).unwrap();
    assert_eq!(dir.subjects.len(), 2);
    assert_eq!(
        dir.subjects[0].matched_files(),
        &["1.msg".to_string(), "3.msg".to_string()]
    );
    assert_eq!(dir.subjects[1].matched_files(), &["2.msg".to_string()]);
}
