//! Integration tests for saving and loading execution traces

use codex_canon::gray_event::{GrayEventKind, Metadata};
use codex_canon::trace::{CostMetrics, ExecutionTrace, TraceError};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn sample_trace() -> ExecutionTrace {
    let mut trace = ExecutionTrace::new("persist");
    let mut cost = CostMetrics::new();
    cost.insert("energy".to_string(), 0.25);
    cost.insert("latency_ms".to_string(), 3.0);
    let mut meta = Metadata::new();
    meta.insert("domain".to_string(), json!("thermo"));

    trace.add_step(0, "forward", 1, Some(cost), Some(meta));
    trace.add_step(1, "forward", 2, None, None);
    trace.add_step(2, "leap", 6, None, None);
    trace.add_step(6, "forward", 0, None, None);
    trace
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trace.json");
    let trace = sample_trace();

    trace.save(&path).unwrap();
    let loaded = ExecutionTrace::load(&path).unwrap();

    assert_eq!(loaded, trace);
    assert_eq!(loaded.states(), vec![0, 1, 2, 6, 0]);
    assert_eq!(loaded.steps[0].cost_metrics.as_ref().unwrap()["energy"], 0.25);
    assert_eq!(loaded.steps[0].metadata.as_ref().unwrap()["domain"], "thermo");
}

#[test]
fn test_saved_document_shape() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trace.json");
    sample_trace().save(&path).unwrap();

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["trace_id"], "persist");
    assert_eq!(doc["total_steps"], 4);
    assert_eq!(doc["legal_steps"], 3);
    assert_eq!(doc["illegal_steps"], 1);

    let illegal = &doc["steps"][2];
    assert_eq!(illegal["is_legal"], false);
    assert_eq!(illegal["delta"], 4);
    assert_eq!(illegal["gray_event"]["type"], "adjacency_violation");
    assert_eq!(illegal["gray_event"]["index"], 2);
    assert_eq!(doc["gray_events"].as_array().unwrap().len(), 1);
}

#[test]
fn test_loaded_trace_keeps_recording() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trace.json");
    sample_trace().save(&path).unwrap();

    let mut trace = ExecutionTrace::load(&path).unwrap();
    let step = trace.add_step(0, "jump", 3, None, None);
    assert_eq!(step.step_number, 4);
    assert!(!step.is_legal);
    assert_eq!(trace.illegal_steps, 2);
    assert_eq!(trace.gray_events[1].kind(), GrayEventKind::AdjacencyViolation);
    assert_eq!(trace.gray_events[1].index(), 4);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ExecutionTrace::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, TraceError::Io(_)));
}

#[test]
fn test_load_rejects_miscounted_trace() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trace.json");
    let mut doc = serde_json::to_value(sample_trace()).unwrap();
    doc["legal_steps"] = json!(4);
    fs::write(&path, doc.to_string()).unwrap();

    let err = ExecutionTrace::load(&path).unwrap_err();
    assert!(matches!(err, TraceError::Inconsistent(_)));
}

#[test]
fn test_load_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trace.json");
    fs::write(&path, "not json").unwrap();
    assert!(matches!(
        ExecutionTrace::load(&path).unwrap_err(),
        TraceError::Json(_)
    ));
}
