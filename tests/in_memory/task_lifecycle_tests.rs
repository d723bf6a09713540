//! In-memory integration tests for task lifecycle operations.

use super::helpers::{StubEnrichment, TestService, service, service_with};
use rstest::rstest;
use serde_json::Value;
use showbay::task::{
    domain::{ExternalId, FieldUpdate, TaskPatch},
    services::{CreateTaskRequest, ListTasksRequest, TaskLifecycleError},
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Parses the stored enrichment snapshot.
///
/// # Errors
///
/// Returns an error if the snapshot is missing or not JSON.
fn snapshot_of(data: Option<&str>) -> Result<Value, eyre::Report> {
    let text = data.ok_or_else(|| eyre::eyre!("expected an enrichment snapshot"))?;
    Ok(serde_json::from_str(text)?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_round_trip(service: TestService) -> Result<(), eyre::Report> {
    let created = service
        .create(
            CreateTaskRequest::new("Prepare demo")
                .with_priority("high")
                .with_external_id(ExternalId::new(3)),
        )
        .await?;
    eyre::ensure!(created.created_at() == created.updated_at(), "fresh timestamps differ");
    let snapshot = snapshot_of(created.external_api_data())?;
    eyre::ensure!(snapshot.get("id") == Some(&Value::from(3)), "snapshot id mismatch");

    let patch = TaskPatch {
        status: FieldUpdate::Set("completed".to_owned()),
        ..TaskPatch::default()
    };
    let updated = service.update(created.id(), patch).await?;
    eyre::ensure!(updated.priority() == "high", "priority was not preserved");
    eyre::ensure!(
        updated.external_api_data() == created.external_api_data(),
        "snapshot changed on update"
    );
    eyre::ensure!(updated.updated_at() > created.updated_at(), "updated_at did not advance");

    service.delete(created.id()).await?;
    let missing = service.get(created.id()).await;
    eyre::ensure!(
        matches!(missing, Err(TaskLifecycleError::NotFound(_))),
        "deleted task is still readable"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_enrichment_still_creates_task() {
    let service = service_with(StubEnrichment::Failing(500));

    let created = service
        .create(CreateTaskRequest::new("Offline upstream").with_external_id(ExternalId::new(1)))
        .await
        .expect("creation succeeds");

    assert_eq!(created.external_api_data(), None);
    assert_eq!(
        service.get(created.id()).await.expect("task exists"),
        created
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_receive_distinct_identifiers(service: TestService) {
    let shared = Arc::new(service);
    let handles: Vec<_> = (0..16)
        .map(|n| {
            let worker = Arc::clone(&shared);
            tokio::spawn(async move {
                worker
                    .create(CreateTaskRequest::new(format!("Parallel {n}")))
                    .await
            })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for handle in handles {
        let task = handle
            .await
            .expect("task joins")
            .expect("creation succeeds");
        ids.insert(task.id());
    }

    assert_eq!(ids.len(), 16);
    let listing = shared
        .list(ListTasksRequest::new(0, 100))
        .await
        .expect("list succeeds");
    assert_eq!(listing.total, 16);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_identifiers_are_not_reused(service: TestService) {
    let first = service
        .create(CreateTaskRequest::new("First"))
        .await
        .expect("creation succeeds");
    service.delete(first.id()).await.expect("delete succeeds");

    let second = service
        .create(CreateTaskRequest::new("Second"))
        .await
        .expect("creation succeeds");

    assert!(second.id() > first.id());
    assert!(matches!(
        service.get(first.id()).await,
        Err(TaskLifecycleError::NotFound(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn page_past_the_end_is_empty_but_counts_total(service: TestService) {
    for n in 0..3 {
        service
            .create(CreateTaskRequest::new(format!("Task {n}")))
            .await
            .expect("creation succeeds");
    }

    let listing = service
        .list(ListTasksRequest::new(50, 10))
        .await
        .expect("list succeeds");

    assert!(listing.tasks.is_empty());
    assert_eq!(listing.total, 3);
    assert_eq!(listing.page, 6);
}
