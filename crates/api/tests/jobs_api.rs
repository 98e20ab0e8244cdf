//! Integration tests for the async job protocol: submission, status polling,
//! chunked retrieval, expiry, and error propagation.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use common::{body_bytes, body_json, build_test_app, build_test_app_with_ttl, get};
use refscope_core::job;
use serde_json::Value;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Submit the over-threshold graph and return the job id from the ack.
async fn submit_graph_job(app: &Router) -> String {
    let json = body_json(get(app, "/script/graph?path=/Game/Scripts/Arena50").await).await;
    assert_eq!(json["mode"], "async");
    json["job_id"].as_str().unwrap().to_string()
}

/// Poll the status endpoint until the job reports `done`, returning the
/// final status payload. Panics if the job does not finish in time.
async fn wait_done(app: &Router, job_id: &str) -> Value {
    for _ in 0..200 {
        let json = body_json(get(app, &format!("/analysis/job/status?id={job_id}")).await).await;
        match json["status"].as_str() {
            Some("done") => return json,
            Some("error") => panic!("job failed: {json}"),
            _ => tokio::time::sleep(Duration::from_millis(5)).await,
        }
    }
    panic!("job {job_id} did not complete in time");
}

// ---------------------------------------------------------------------------
// Property: chunking covers the payload exactly once, no gaps/overlaps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chunked_retrieval_reassembles_payload() {
    let (app, _state) = build_test_app();
    let job_id = submit_graph_job(&app).await;

    let status = wait_done(&app, &job_id).await;
    let total_chars = status["total_chars"].as_u64().unwrap() as usize;
    assert!(total_chars > 0);

    let mut assembled = String::new();
    let mut offset = 0_usize;
    let mut done_count = 0;

    loop {
        let json = body_json(
            get(
                &app,
                &format!("/analysis/job/result?id={job_id}&offset={offset}&limit=700"),
            )
            .await,
        )
        .await;

        assert_eq!(json["ok"], true);
        assert_eq!(json["total_chars"].as_u64().unwrap() as usize, total_chars);
        assert_eq!(json["offset"].as_u64().unwrap() as usize, offset);
        assembled.push_str(json["chunk"].as_str().unwrap());

        if json["done"].as_bool().unwrap() {
            done_count += 1;
            break;
        }
        offset = json["next_offset"].as_u64().unwrap() as usize;
    }

    assert_eq!(done_count, 1);
    assert_eq!(assembled.chars().count(), total_chars);

    // The reassembled text is the full payload the sync path would have
    // returned for this graph.
    let payload: Value = serde_json::from_str(&assembled).unwrap();
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["node_count"], 50);
    assert_eq!(payload["connection_count"], 49);
    assert_eq!(payload["script"], "/Game/Scripts/Arena50");
}

// ---------------------------------------------------------------------------
// Property: idempotent retrieval
// ---------------------------------------------------------------------------

#[tokio::test]
async fn retrieval_is_idempotent() {
    let (app, _state) = build_test_app();
    let job_id = submit_graph_job(&app).await;
    wait_done(&app, &job_id).await;

    let uri = format!("/analysis/job/result?id={job_id}&offset=16&limit=64");
    let first = body_bytes(get(&app, &uri).await).await;
    let second = body_bytes(get(&app, &uri).await).await;

    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Property: offset clamping past the end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn offset_past_end_reports_done_with_empty_chunk() {
    let (app, _state) = build_test_app();
    let job_id = submit_graph_job(&app).await;
    let status = wait_done(&app, &job_id).await;
    let total_chars = status["total_chars"].as_u64().unwrap();

    let json = body_json(
        get(
            &app,
            &format!(
                "/analysis/job/result?id={job_id}&offset={}&limit=64",
                total_chars + 1000
            ),
        )
        .await,
    )
    .await;

    assert_eq!(json["ok"], true);
    assert_eq!(json["done"], true);
    assert_eq!(json["chunk"], "");
    assert_eq!(json["offset"].as_u64().unwrap(), total_chars);
}

// ---------------------------------------------------------------------------
// Property: not-ready is distinct from not-found
// ---------------------------------------------------------------------------

#[tokio::test]
async fn result_before_completion_is_not_ready() {
    let (app, state) = build_test_app();

    // Stage a pending job directly so there is no completion race.
    let id = state.jobs.create();
    let id_str = id.simple().to_string();

    let response = get(&app, &format!("/analysis/job/result?id={id_str}")).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Job not ready");
    assert_eq!(json["detail"], "pending");

    // The status endpoint still answers 200 for the same job.
    let status = get(&app, &format!("/analysis/job/status?id={id_str}")).await;
    assert_eq!(status.status(), StatusCode::OK);

    let json = body_json(status).await;
    assert_eq!(json["status"], "pending");
    assert!(json.get("total_chars").is_none());
}

// ---------------------------------------------------------------------------
// Property: expiry surfaces as 404, not 200/202
// ---------------------------------------------------------------------------

#[tokio::test]
async fn expired_job_reports_not_found_over_http() {
    let (app, state) = build_test_app_with_ttl(Duration::ZERO);

    let id = state.jobs.create();
    let id_str = id.simple().to_string();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(state.jobs.get(id).is_none());

    let response = get(&app, &format!("/analysis/job/status?id={id_str}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Job not found");
    assert_eq!(json["detail"], id_str);
}

// ---------------------------------------------------------------------------
// Property: computation failures are preserved verbatim
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_computation_preserves_error_detail() {
    let (app, state) = build_test_app();

    let id = state.jobs.create();
    let id_str = id.simple().to_string();
    job::execute(&state.jobs, id, || {
        Err("walk aborted: node N7 references a missing package".to_string())
    });

    let status = body_json(get(&app, &format!("/analysis/job/status?id={id_str}")).await).await;
    assert_eq!(status["status"], "error");
    assert_eq!(
        status["error"],
        "walk aborted: node N7 references a missing package"
    );
    assert!(status.get("total_chars").is_none());

    // The result endpoint never fabricates a Done state.
    let response = get(&app, &format!("/analysis/job/result?id={id_str}")).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    assert_eq!(json["detail"], "error");
}

// ---------------------------------------------------------------------------
// Parameter handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_job_id_is_rejected() {
    let (app, _state) = build_test_app();
    let response = get(&app, "/analysis/job/status?id=not-a-job").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Invalid job id");
    assert_eq!(json["detail"], "not-a-job");
}

#[tokio::test]
async fn unknown_job_id_is_not_found() {
    let (app, _state) = build_test_app();
    let ghost = Uuid::new_v4().simple().to_string();

    let response = get(&app, &format!("/analysis/job/result?id={ghost}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn omitted_limit_uses_default_window() {
    let (app, _state) = build_test_app();
    let job_id = submit_graph_job(&app).await;
    let status = wait_done(&app, &job_id).await;
    let total_chars = status["total_chars"].as_u64().unwrap();

    // The fixture payload is far below the default window, so one read
    // covers it.
    let json = body_json(get(&app, &format!("/analysis/job/result?id={job_id}")).await).await;
    assert_eq!(json["limit"].as_u64().unwrap(), total_chars);
    assert_eq!(json["done"], true);
}
