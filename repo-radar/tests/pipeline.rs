use std::path::Path;

use repo_radar::{new_full_names, DiscoveryRecord, RepositoryRecord, Snapshot, Store};
use tempfile::TempDir;

fn record(full_name: &str, created_at: &str) -> RepositoryRecord {
    let (owner, name) = full_name.split_once('/').unwrap();
    RepositoryRecord {
        name: name.to_string(),
        full_name: full_name.to_string(),
        owner: owner.to_string(),
        html_url: format!("https://github.com/{full_name}"),
        description: None,
        created_at: created_at.to_string(),
        updated_at: Some(created_at.to_string()),
    }
}

fn store_in(temp: &TempDir) -> Store {
    Store::new(temp.path().join("data"), temp.path().join("docs"))
}

fn read_value(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn first_run_discovers_and_persists() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    // No snapshot file yet: the previous state is empty.
    let previous = store.load_previous_snapshot().unwrap();
    assert!(previous.is_empty());

    let mut current = Snapshot::new();
    current.insert(record("alice/tool", "2024-01-01T00:00:00Z"));

    let discovered = new_full_names(&previous, &current);
    assert_eq!(discovered, ["alice/tool"]);

    let discoveries = vec![DiscoveryRecord::from_record(
        current.get("alice/tool").unwrap(),
        Some("Tool\nDoes things".to_string()),
    )];
    store.persist_run(&current, &discoveries, "2024-01-02").unwrap();

    let history = read_value(&temp.path().join("data/2024-01-02.json"));
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["full_name"], "alice/tool");
    assert_eq!(history[0]["readme_snippet"], "Tool\nDoes things");
    assert_eq!(history[0]["created_at"], "2024-01-01T00:00:00Z");

    // The latest pointer duplicates the history file.
    let history_body = std::fs::read_to_string(temp.path().join("data/2024-01-02.json")).unwrap();
    let latest_body = std::fs::read_to_string(temp.path().join("docs/latest.json")).unwrap();
    assert_eq!(history_body, latest_body);

    let snapshot = read_value(&temp.path().join("data/latest_snapshot.json"));
    let keys: Vec<_> = snapshot.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["alice/tool"]);

    let dates = read_value(&temp.path().join("docs/dates.json"));
    assert_eq!(dates, serde_json::json!(["2024-01-02"]));
}

#[test]
fn snapshot_round_trips_between_runs() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    let mut current = Snapshot::new();
    current.insert(record("alice/tool", "2024-01-01T00:00:00Z"));
    current.insert(record("bob/other", "2024-01-03T00:00:00Z"));
    store.persist_run(&current, &[], "2024-01-04").unwrap();

    let previous = store.load_previous_snapshot().unwrap();
    assert_eq!(previous.len(), 2);
    assert!(previous.contains("alice/tool"));
    assert!(previous.contains("bob/other"));

    // Nothing changed upstream: the next diff is empty.
    assert!(new_full_names(&previous, &current).is_empty());
}

#[test]
fn empty_discovery_set_still_writes_empty_sequences() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    let mut current = Snapshot::new();
    current.insert(record("alice/tool", "2024-01-01T00:00:00Z"));
    store.persist_run(&current, &[], "2024-02-01").unwrap();

    let history = read_value(&temp.path().join("data/2024-02-01.json"));
    assert_eq!(history, serde_json::json!([]));
    let latest = read_value(&temp.path().join("docs/latest.json"));
    assert_eq!(latest, serde_json::json!([]));
}

#[test]
fn same_day_rerun_overwrites_history() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    let mut current = Snapshot::new();
    current.insert(record("alice/tool", "2024-01-01T00:00:00Z"));
    let discovery = DiscoveryRecord::from_record(current.get("alice/tool").unwrap(), None);
    store
        .persist_run(&current, std::slice::from_ref(&discovery), "2024-02-01")
        .unwrap();

    // A later run the same day found nothing new.
    store.persist_run(&current, &[], "2024-02-01").unwrap();

    let history = read_value(&temp.path().join("data/2024-02-01.json"));
    assert_eq!(history, serde_json::json!([]));

    let dates = read_value(&temp.path().join("docs/dates.json"));
    assert_eq!(dates, serde_json::json!(["2024-02-01"]));
}

#[test]
fn date_index_accumulates_descending_across_runs() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    let current = Snapshot::new();

    store.persist_run(&current, &[], "2024-01-15").unwrap();
    store.persist_run(&current, &[], "2024-03-01").unwrap();
    store.persist_run(&current, &[], "2023-12-31").unwrap();

    let dates = read_value(&temp.path().join("docs/dates.json"));
    assert_eq!(
        dates,
        serde_json::json!(["2024-03-01", "2024-01-15", "2023-12-31"])
    );
}

#[test]
fn non_ascii_content_is_preserved_literally() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    let mut source = record("alice/outil", "2024-01-01T00:00:00Z");
    source.description = Some("Un outil très utile — 日本語".to_string());
    let mut current = Snapshot::new();
    current.insert(source.clone());

    let discoveries = vec![DiscoveryRecord::from_record(&source, None)];
    store.persist_run(&current, &discoveries, "2024-01-02").unwrap();

    let body = std::fs::read_to_string(temp.path().join("data/2024-01-02.json")).unwrap();
    assert!(body.contains("Un outil très utile — 日本語"));
    assert!(!body.contains("\\u"));
}
