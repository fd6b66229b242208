use std::fs;

use labelmatch::{
    analyze_files, overview_files, AppConfig, IngestError, MatchError, PipelineError,
};
use tempfile::TempDir;

#[test]
fn single_file_is_rejected_before_reading() {
    let result = analyze_files(&["/does/not/exist.html"], &AppConfig::default());
    assert_eq!(result, Err(PipelineError::NotEnoughDocuments { found: 1 }));

    let result = overview_files(&["/does/not/exist.html"], &AppConfig::default());
    assert!(matches!(
        result,
        Err(PipelineError::NotEnoughDocuments { found: 1 })
    ));
}

#[test]
fn missing_file_aborts_the_run() {
    let dir = TempDir::new().expect("temp dir");
    let present = dir.path().join("present.html");
    fs::write(&present, "<manual_label name='x'>a</manual_label>").expect("write");
    let missing = dir.path().join("missing.html");

    let result = analyze_files(&[present, missing.clone()], &AppConfig::default());
    assert_eq!(
        result,
        Err(PipelineError::Ingest(IngestError::NotFound(
            missing.display().to_string()
        )))
    );
}

#[test]
fn oversized_file_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let a = dir.path().join("a.html");
    let b = dir.path().join("b.html");
    fs::write(&a, "<p>small</p>").expect("write");
    fs::write(&b, "x".repeat(4096)).expect("write");

    let mut cfg = AppConfig::default();
    cfg.ingest.max_input_bytes = Some(1024);
    assert!(matches!(
        analyze_files(&[a, b], &cfg),
        Err(PipelineError::Ingest(IngestError::InputTooLarge { limit: 1024, .. }))
    ));
}

#[test]
fn invalid_threshold_is_a_match_error() {
    let dir = TempDir::new().expect("temp dir");
    let a = dir.path().join("a.html");
    let b = dir.path().join("b.html");
    fs::write(&a, "<p/>").expect("write");
    fs::write(&b, "<p/>").expect("write");

    let mut cfg = AppConfig::default();
    cfg.matcher.min_overlap = -0.5;
    assert!(matches!(
        analyze_files(&[a, b], &cfg),
        Err(PipelineError::Match(MatchError::InvalidConfig(_)))
    ));
}

#[test]
fn undecodable_bytes_do_not_fail_the_run() {
    let dir = TempDir::new().expect("temp dir");
    let a = dir.path().join("a.html");
    let b = dir.path().join("b.html");
    fs::write(&a, b"<manual_label name='x'>caf\xE9 \xFF</manual_label>").expect("write");
    fs::write(&b, "<manual_label name='x'>café ÿ</manual_label>").expect("write");

    let report = analyze_files(&[a, b], &AppConfig::default()).expect("latin-1 fallback");
    assert_eq!(report.summary.exact_matches, 2);
}

#[test]
fn empty_labels_and_documents_are_not_errors() {
    let dir = TempDir::new().expect("temp dir");
    let a = dir.path().join("a.html");
    let b = dir.path().join("b.html");
    fs::write(&a, "<manual_label name='x'>   </manual_label>").expect("write");
    fs::write(&b, "").expect("write");

    let report = analyze_files(&[a, b], &AppConfig::default()).expect("total");
    assert_eq!(report.summary.total_labels, 1);
    assert_eq!(report.summary.total_comparisons, 1);
    assert_eq!(report.summary.no_matches, 1);
}
