//! Golden corpus: token files under tests/corpus with expected outcomes
//!
//! Every `<case>.json` sits next to a `<case>.meta.json` describing the
//! Gray events it must produce, in order, and optionally the degeneracy
//! verdict at a given window size.

use codex_canon::canon::validate_sequence;
use codex_canon::degeneracy::{detect_degeneracy, DegeneracyConfig};
use codex_canon::parser::parse_tokens;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const CATEGORIES: [&str; 4] = ["lawful", "illegal", "degenerate", "edge_cases"];

fn corpus_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("corpus")
}

/// (token file, meta document) pairs for one category, sorted by name
fn load_category(category: &str) -> Vec<(PathBuf, Value)> {
    let dir = corpus_dir().join(category);
    let mut cases: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", dir.display(), e))
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            let name = path.file_name().unwrap().to_string_lossy();
            name.ends_with(".json") && !name.ends_with(".meta.json")
        })
        .collect();
    cases.sort();

    cases
        .into_iter()
        .map(|path| {
            let meta_path = path.with_extension("meta.json");
            let meta = fs::read_to_string(&meta_path)
                .unwrap_or_else(|e| panic!("missing {}: {}", meta_path.display(), e));
            (path, serde_json::from_str(&meta).unwrap())
        })
        .collect()
}

/// Parse, validate and (when requested) analyze one case against its meta
fn check_case(path: &Path, meta: &Value) {
    let name = path.display().to_string();
    let content = fs::read_to_string(path).unwrap();
    let parsed = parse_tokens(&content).unwrap();
    let validation = validate_sequence(&parsed.indices);

    let mut events = parsed.unknown.clone();
    events.extend(validation.to_gray_events());
    let actual: Vec<(String, u64)> = events
        .iter()
        .map(|e| (e.kind().to_string(), e.index() as u64))
        .collect();
    let expected: Vec<(String, u64)> = meta["expected_gray_events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["type"].as_str().unwrap().to_string(),
                e["index"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(actual, expected, "{}", name);

    let expected_result = meta["expected_result"].as_str().unwrap();
    assert_eq!(
        events.is_empty(),
        expected_result != "invalid",
        "{}: expected {}",
        name,
        expected_result
    );

    if let Some(degeneracy) = meta.get("expected_degeneracy") {
        let window_size = degeneracy["window_size"].as_u64().unwrap() as usize;
        let config = DegeneracyConfig::default().with_window_size(window_size);
        let metrics = detect_degeneracy(&parsed.indices, &config);
        assert_eq!(
            metrics.is_degenerate,
            degeneracy["is_degenerate"].as_bool().unwrap(),
            "{}: {:?}",
            name,
            metrics.trigger_reason
        );
        assert_eq!(metrics.is_degenerate, expected_result == "degenerate", "{}", name);
    }
}

#[test]
fn test_corpus_categories_are_populated() {
    for category in CATEGORIES {
        assert!(
            !load_category(category).is_empty(),
            "no cases in {}",
            category
        );
    }
}

#[test]
fn test_corpus_meta_documents_are_complete() {
    for category in CATEGORIES {
        for (path, meta) in load_category(category) {
            for key in ["description", "expected_result", "tags", "expected_gray_events"] {
                assert!(meta.get(key).is_some(), "{} lacks {}", path.display(), key);
            }
        }
    }
}

#[test]
fn test_lawful_corpus() {
    for (path, meta) in load_category("lawful") {
        check_case(&path, &meta);
    }
}

#[test]
fn test_illegal_corpus() {
    for (path, meta) in load_category("illegal") {
        check_case(&path, &meta);
    }
}

#[test]
fn test_degenerate_corpus() {
    for (path, meta) in load_category("degenerate") {
        check_case(&path, &meta);
    }
}

#[test]
fn test_edge_case_corpus() {
    for (path, meta) in load_category("edge_cases") {
        check_case(&path, &meta);
    }
}
