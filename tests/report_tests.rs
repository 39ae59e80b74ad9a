//! Aggregation and rendering of the final report.

use crossbeam_channel::bounded;
use outreach::report::aggregate;
use outreach::{Record, RecordStatus};

fn settled(position: usize, id: &str, name: &str, failure: Option<&str>) -> Record {
    let mut r = Record::new(position, id, name, format!("https://example.com/{id}"));
    r.settle(failure.map(str::to_string));
    r
}

// --- aggregate ---

#[test]
fn test_aggregate_counts_and_sorts() {
    let (tx, rx) = bounded(3);
    tx.send(settled(2, "3", "C", None)).unwrap();
    tx.send(settled(0, "1", "A", None)).unwrap();
    tx.send(settled(1, "2", "B", Some("timed out after 30s"))).unwrap();
    drop(tx);

    let report = aggregate(rx);
    assert_eq!(report.total, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.pending, 0);
    let ids: Vec<&str> = report.lines.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(report.lines[1].error.as_deref(), Some("timed out after 30s"));
}

#[test]
fn test_aggregate_flags_unsettled_records() {
    let (tx, rx) = bounded(1);
    tx.send(Record::new(0, "1", "A", "u")).unwrap();
    drop(tx);
    let report = aggregate(rx);
    assert_eq!(report.pending, 1);
    assert_eq!(report.count(RecordStatus::Pending), 1);
    assert!(!report.is_all_success());
}

#[test]
fn test_aggregate_empty_channel() {
    let (tx, rx) = bounded::<Record>(1);
    drop(tx);
    let report = aggregate(rx);
    assert_eq!(report.total, 0);
    assert!(report.is_all_success());
}

// --- record status transitions ---

#[test]
fn test_settle_only_once() {
    let mut r = Record::new(0, "1", "A", "u");
    assert_eq!(r.status(), RecordStatus::Pending);
    assert!(r.settle(Some("boom".into())));
    assert_eq!(r.status(), RecordStatus::Failed);
    assert!(!r.settle(None));
    assert_eq!(r.status(), RecordStatus::Failed);
    assert_eq!(r.failure(), Some("boom"));
}

// --- rendering ---

#[test]
fn test_render_lines() {
    let (tx, rx) = bounded(2);
    tx.send(settled(0, "1", "A", None)).unwrap();
    tx.send(settled(1, "2", "B", Some("remote action failed: HTTP 404"))).unwrap();
    drop(tx);
    let text = aggregate(rx).render();
    assert!(text.starts_with("--- Final Execution Report ---\n"));
    assert!(text.contains("[Success] A\n"));
    assert!(text.contains("[Failed] B (remote action failed: HTTP 404)\n"));
    assert!(text.contains("Total: 2  Success: 1  Failed: 1"));
}

#[test]
fn test_json_output() {
    let (tx, rx) = bounded(1);
    tx.send(settled(0, "1", "A", None)).unwrap();
    drop(tx);
    let json = aggregate(rx).to_json().unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["total"], 1);
    assert_eq!(v["lines"][0]["status"], "Success");
    assert_eq!(v["lines"][0]["display_name"], "A");
    assert!(v["lines"][0].get("error").is_none());
}
