//! HTTP contract tests driven through the router without a socket.

use super::helpers::{StubEnrichment, app, app_with, create_task, send};
use axum::{
    Router,
    http::{Method, StatusCode},
};
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn root_and_health_report_service(app: Router) {
    let (status, root) = send(&app, Method::GET, "/", None).await.expect("root");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        root,
        json!({ "message": "ShowBay Task Management API is running!" })
    );

    let (status, health) = send(&app, Method::GET, "/health", None)
        .await
        .expect("health");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        health,
        json!({ "status": "healthy", "service": "ShowBay Task Management API" })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_returns_created_task_with_defaults(app: Router) {
    let (status, task) = send(
        &app,
        Method::POST,
        "/api/v1/tasks/",
        Some(json!({ "title": "Review PR", "description": "Check tests" })),
    )
    .await
    .expect("create");

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["title"], "Review PR");
    assert_eq!(task["description"], "Check tests");
    assert_eq!(task["status"], "pending");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["external_id"], Value::Null);
    assert_eq!(task["external_api_data"], Value::Null);
    assert_eq!(task["completed_at"], Value::Null);
    assert_eq!(task["created_at"], task["updated_at"]);
    assert!(task["id"].is_i64());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn collection_route_accepts_path_without_trailing_slash(app: Router) {
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/tasks",
        Some(json!({ "title": "No slash" })),
    )
    .await
    .expect("create");
    assert_eq!(status, StatusCode::CREATED);

    let (status, listing) = send(&app, Method::GET, "/api/v1/tasks", None)
        .await
        .expect("list");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_with_external_id_embeds_snapshot(app: Router) {
    let (status, task) = send(
        &app,
        Method::POST,
        "/api/v1/tasks/",
        Some(json!({ "title": "Enriched", "external_id": 1 })),
    )
    .await
    .expect("create");

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["external_id"], 1);
    let snapshot = task["external_api_data"]
        .as_str()
        .expect("snapshot is a JSON string");
    let parsed: Value = serde_json::from_str(snapshot).expect("snapshot parses");
    assert_eq!(parsed["id"], 1);
    assert_eq!(parsed["title"], "Test Post");
}

#[rstest]
#[case(404)]
#[case(503)]
#[tokio::test(flavor = "multi_thread")]
async fn create_degrades_when_enrichment_fails(#[case] upstream_status: u16) {
    let app = app_with(StubEnrichment::Failing(upstream_status));

    let (status, task) = send(
        &app,
        Method::POST,
        "/api/v1/tasks/",
        Some(json!({ "title": "Still created", "external_id": 99999 })),
    )
    .await
    .expect("create");

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["external_id"], 99999);
    assert_eq!(task["external_api_data"], Value::Null);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_with_empty_title_reports_validation_error(app: Router) {
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/tasks/",
        Some(json!({ "title": "" })),
    )
    .await
    .expect("create");

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert_eq!(body["detail"][0]["loc"], json!(["body", "title"]));
    assert_eq!(body["detail"][0]["type"], "string_too_short");
    assert_eq!(body["detail"][0]["input"], "");

    let (_, listing) = send(&app, Method::GET, "/api/v1/tasks/", None)
        .await
        .expect("list");
    assert_eq!(listing["total"], 0);
}

#[rstest]
#[case(json!({ "description": "no title" }), "title", "missing")]
#[case(json!({ "title": null }), "title", "string_type")]
#[case(json!({ "title": "x", "priority": null }), "priority", "string_type")]
#[tokio::test(flavor = "multi_thread")]
async fn absent_or_null_required_field_is_located(
    app: Router,
    #[case] body: Value,
    #[case] field: &str,
    #[case] kind: &str,
) {
    let (status, error) = send(&app, Method::POST, "/api/v1/tasks/", Some(body))
        .await
        .expect("create");

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error_code"], "VALIDATION_ERROR");
    assert_eq!(error["detail"][0]["loc"], json!(["body", field]));
    assert_eq!(error["detail"][0]["type"], kind);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_reports_missing_title_with_length_violations(app: Router) {
    let (status, error) = send(
        &app,
        Method::POST,
        "/api/v1/tasks/",
        Some(json!({ "priority": "p".repeat(21), "status": "s".repeat(51) })),
    )
    .await
    .expect("create");

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let violations: Vec<(&Value, &Value)> = error["detail"]
        .as_array()
        .expect("violation list")
        .iter()
        .map(|violation| (&violation["loc"], &violation["type"]))
        .collect();
    assert_eq!(
        violations,
        [
            (&json!(["body", "title"]), &json!("missing")),
            (&json!(["body", "status"]), &json!("string_too_long")),
            (&json!(["body", "priority"]), &json!("string_too_long")),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn undecodable_body_is_located_at_body(app: Router) {
    let (status, error) = send(
        &app,
        Method::POST,
        "/api/v1/tasks/",
        Some(json!({ "title": 7 })),
    )
    .await
    .expect("create");

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error_code"], "VALIDATION_ERROR");
    assert_eq!(error["detail"][0]["loc"], json!(["body"]));
    assert_eq!(error["detail"][0]["type"], "value_error");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_returns_stored_task(app: Router) {
    let id = create_task(&app, json!({ "title": "Fetch me", "user_id": "u-1" }))
        .await
        .expect("create");

    let (status, task) = send(&app, Method::GET, &format!("/api/v1/tasks/{id}"), None)
        .await
        .expect("get");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["id"], id);
    assert_eq!(task["title"], "Fetch me");
    assert_eq!(task["user_id"], "u-1");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_task_is_not_found(app: Router) {
    let (status, body) = send(&app, Method::GET, "/api/v1/tasks/999", None)
        .await
        .expect("get");

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "detail": "Task with ID 999 not found", "error_code": "NOT_FOUND" })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_numeric_id_is_a_path_validation_error(app: Router) {
    let (status, body) = send(&app, Method::GET, "/api/v1/tasks/abc", None)
        .await
        .expect("get");

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert_eq!(body["detail"][0]["loc"], json!(["path", "task_id"]));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_changes_only_supplied_fields(app: Router) {
    let id = create_task(
        &app,
        json!({ "title": "Original", "description": "Keep", "priority": "high" }),
    )
    .await
    .expect("create");
    let uri = format!("/api/v1/tasks/{id}");
    let (_, before) = send(&app, Method::GET, &uri, None).await.expect("get");

    let (status, after) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "status": "completed", "completed_at": "2026-10-17T12:00:00Z" })),
    )
    .await
    .expect("update");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["status"], "completed");
    assert_eq!(after["title"], "Original");
    assert_eq!(after["description"], "Keep");
    assert_eq!(after["priority"], "high");
    assert_eq!(after["created_at"], before["created_at"]);
    assert_ne!(after["updated_at"], before["updated_at"]);
    assert_eq!(after["completed_at"], "2026-10-17T12:00:00Z");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_with_null_clears_description(app: Router) {
    let id = create_task(&app, json!({ "title": "Clear", "description": "Gone soon" }))
        .await
        .expect("create");

    let (status, task) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/tasks/{id}"),
        Some(json!({ "description": null })),
    )
    .await
    .expect("update");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["description"], Value::Null);
    assert_eq!(task["title"], "Clear");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_update_reports_every_field(app: Router) {
    let id = create_task(&app, json!({ "title": "Valid" }))
        .await
        .expect("create");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/tasks/{id}"),
        Some(json!({ "title": "", "status": "s".repeat(51) })),
    )
    .await
    .expect("update");

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&Value> = body["detail"]
        .as_array()
        .expect("violation list")
        .iter()
        .map(|violation| &violation["loc"][1])
        .collect();
    assert_eq!(fields, [&json!("title"), &json!("status")]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_missing_task_is_not_found(app: Router) {
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/tasks/12",
        Some(json!({ "status": "completed" })),
    )
    .await
    .expect("update");

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "NOT_FOUND");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_returns_no_content_then_not_found(app: Router) {
    let id = create_task(&app, json!({ "title": "Temporary" }))
        .await
        .expect("create");
    let uri = format!("/api/v1/tasks/{id}");

    let (status, body) = send(&app, Method::DELETE, &uri, None)
        .await
        .expect("delete");
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &uri, None).await.expect("get");
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &uri, None)
        .await
        .expect("delete again");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_paginates_and_filters(app: Router) {
    for n in 0..12 {
        let priority = if matches!(n, 0 | 3 | 6 | 9) { "high" } else { "low" };
        create_task(&app, json!({ "title": format!("Task {n}"), "priority": priority }))
            .await
            .expect("create");
    }

    let (status, third_page) = send(&app, Method::GET, "/api/v1/tasks/?skip=10&limit=5", None)
        .await
        .expect("list");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(third_page["page"], 3);
    assert_eq!(third_page["size"], 5);
    assert_eq!(third_page["total"], 12);
    assert_eq!(third_page["tasks"].as_array().map(Vec::len), Some(2));

    let (_, high) = send(
        &app,
        Method::GET,
        "/api/v1/tasks/?priority_filter=high&status_filter=pending",
        None,
    )
    .await
    .expect("list");
    assert_eq!(high["total"], 4);
    assert_eq!(high["page"], 1);
    assert_eq!(high["size"], 10);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn largest_skip_returns_an_empty_last_page(app: Router) {
    create_task(&app, json!({ "title": "Only one" }))
        .await
        .expect("create");

    let (status, listing) = send(
        &app,
        Method::GET,
        "/api/v1/tasks/?skip=9223372036854775807&limit=1",
        None,
    )
    .await
    .expect("list");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["tasks"], json!([]));
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["page"], i64::MAX);
    assert_eq!(listing["size"], 1);
}

#[rstest]
#[case("/api/v1/tasks/?limit=0", "limit")]
#[case("/api/v1/tasks/?limit=101", "limit")]
#[case("/api/v1/tasks/?skip=-1", "skip")]
#[tokio::test(flavor = "multi_thread")]
async fn out_of_range_window_is_a_query_error(
    app: Router,
    #[case] uri: &str,
    #[case] field: &str,
) {
    let (status, body) = send(&app, Method::GET, uri, None).await.expect("list");

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["query", field]));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_numeric_limit_is_a_query_error(app: Router) {
    let (status, body) = send(&app, Method::GET, "/api/v1/tasks/?limit=ten", None)
        .await
        .expect("list");

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert_eq!(body["detail"][0]["loc"][0], "query");
}
