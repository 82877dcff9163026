//! Demo seed and snapshot behavior.

use gantt_core::{dates, Core};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

async fn seeded_core() -> (TempDir, Core) {
    let dir = TempDir::new().unwrap();
    let core = Core::open(dir.path()).await.unwrap();
    core.seed_demo().await.unwrap();
    (dir, core)
}

#[tokio::test]
async fn seed_populates_the_demo_project() {
    let (_dir, core) = seeded_core().await;
    let snapshot = core.snapshot().await.unwrap();

    assert_eq!(snapshot.tasks.len(), 16);
    assert_eq!(snapshot.dependencies.len(), 12);
    assert_eq!(snapshot.resources.len(), 3);
    assert_eq!(snapshot.assignments.len(), 4);

    let setup = &snapshot.tasks[0];
    assert_eq!(setup.id, 1);
    assert_eq!(setup.name, "Project Setup");
    assert_eq!(setup.parent_id, None);
    assert_eq!(setup.duration, Some(5.0));
    assert_eq!(setup.percent_done, 100.0);
    assert!(setup.expanded);
    assert_eq!(setup.start_date, dates::parse("2024-01-01"));

    let gantt = &snapshot.tasks[6];
    assert_eq!(gantt.name, "Implement Gantt chart");
    assert_eq!(gantt.parent_id, Some(5));
    assert_eq!(gantt.start_date, dates::parse("2024-01-11"));

    // Phase roll-ups hang off the project roots.
    let edge = &snapshot.dependencies[2];
    assert_eq!((edge.from_event, edge.to_event, edge.kind), (1, 5, 0));

    let jane = &snapshot.resources[1];
    assert_eq!(jane.name, "Jane Smith");
    assert_eq!(jane.email.as_deref(), Some("jane@example.com"));

    let last = &snapshot.assignments[3];
    assert_eq!((last.event_id, last.resource_id), (11, 3));
    assert_eq!(last.units, 100.0);
}

#[tokio::test]
async fn reseeding_replaces_rather_than_duplicates() {
    let (_dir, core) = seeded_core().await;

    // Drift the store, then reseed.
    core.apply_sync(json!({
        "requestId": "1",
        "tasks": { "added": [{ "name": "Stray task" }] }
    }))
    .await
    .unwrap();
    core.seed_demo().await.unwrap();

    let snapshot = core.snapshot().await.unwrap();
    assert_eq!(snapshot.tasks.len(), 16);
    assert!(snapshot.tasks.iter().all(|t| t.name != "Stray task"));
}

#[tokio::test]
async fn allocation_continues_past_the_seeded_rows() {
    let (_dir, core) = seeded_core().await;

    let response = core
        .apply_sync(json!({
            "requestId": "1",
            "tasks": { "added": [{ "$PhantomId": "new", "name": "Post-seed task" }] },
            "resources": { "added": [{ "name": "Dana" }] }
        }))
        .await
        .unwrap();

    let task_rows = &response.tasks.as_ref().unwrap().rows;
    assert_eq!(task_rows[0].id, 17);
    let resource_rows = &response.resources.as_ref().unwrap().rows;
    assert_eq!(resource_rows[0].id, 4);
}

#[tokio::test]
async fn snapshot_rows_are_ordered_by_id() {
    let (_dir, core) = seeded_core().await;
    let snapshot = core.snapshot().await.unwrap();

    let ids: Vec<i32> = snapshot.tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, (1..=16).collect::<Vec<i32>>());
    let dep_ids: Vec<i32> = snapshot.dependencies.iter().map(|d| d.id).collect();
    assert_eq!(dep_ids, (1..=12).collect::<Vec<i32>>());
}

#[tokio::test]
async fn empty_store_snapshots_cleanly() {
    let dir = TempDir::new().unwrap();
    let core = Core::open(dir.path()).await.unwrap();

    let snapshot = core.snapshot().await.unwrap();
    assert!(snapshot.tasks.is_empty());
    assert!(snapshot.dependencies.is_empty());
    assert!(snapshot.resources.is_empty());
    assert!(snapshot.assignments.is_empty());
}
