use chrono::Utc;
use cli::files;
use retriever_core::models::{Document, RankedResult, ScoredCandidate, SkippedDocument};
use std::fs;
use tempfile::tempdir;

#[test]
fn corpus_loading_drops_blank_lines() {
    let temp = tempdir().unwrap();
    let corpus_path = temp.path().join("documents.txt");
    fs::write(
        &corpus_path,
        "The cat sat on the mat\n\n   \nStock markets rose today\n",
    )
    .unwrap();

    let docs = files::load_corpus(&corpus_path).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].text, "The cat sat on the mat");
    assert_eq!(docs[1].index, 1);
}

#[test]
fn query_loading_trims_the_blob() {
    let temp = tempdir().unwrap();
    let query_path = temp.path().join("query.txt");
    fs::write(&query_path, "feline behavior\n").unwrap();

    let query = files::load_query(&query_path).unwrap();
    assert_eq!(query.text, "feline behavior");
}

#[test]
fn reports_are_written_side_by_side() {
    let temp = tempdir().unwrap();
    let json_path = temp.path().join("retrieved_context.json");
    let text_path = temp.path().join("retrieved_context.txt");

    let result = RankedResult {
        results: vec![ScoredCandidate {
            document: Document::new(0, "Cats are popular pets"),
            score: 0.87654,
        }],
        skipped: vec![SkippedDocument {
            document: Document::new(1, "broken entry"),
            reason: "request failed: boom".into(),
        }],
        generated_at: Utc::now(),
    };

    files::write_outputs(&result, &json_path, &text_path).unwrap();

    let payload: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(payload["results"][0]["document"], "Cats are popular pets");
    assert_eq!(payload["results"][0]["similarity"], 0.877);
    assert_eq!(payload["skipped"][0]["document"], "broken entry");
    assert!(payload["date"].is_string());

    let text = fs::read_to_string(&text_path).unwrap();
    assert!(text.starts_with("Retrieved Context\n"));
    assert!(text.contains("Score: 0.877 — Cats are popular pets"));
}

#[test]
fn missing_corpus_file_is_a_contextual_error() {
    let temp = tempdir().unwrap();
    let err = files::load_corpus(&temp.path().join("nope.txt")).unwrap_err();
    assert!(err.to_string().contains("reading corpus"));
}
