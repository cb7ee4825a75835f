use actix_web::test;
use serde_json::Value;

use crate::common::assert_trace_id_matches;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn problem_details_carry_request_trace_id() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/game/status?gameId=999999")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
    let trace_header = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-trace-id header");
    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-request-id header");
    assert_eq!(trace_header, request_id);

    let body: Value = test::read_body_json(resp).await;
    assert_trace_id_matches(&body, &trace_header);
    assert_eq!(body["type"], "https://quipreel.app/errors/GAME_NOT_FOUND");
    assert_eq!(body["title"], "Game Not Found");
    assert_eq!(body["status"], 404);

    Ok(())
}

#[actix_web::test]
async fn caller_request_id_is_reused() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;
    let request_id = "0b6f7c1e-7d7e-4f43-9d55-7f0a4a3c2e10";

    let req = test::TestRequest::get()
        .uri("/api/game/status?gameId=abc")
        .insert_header(("x-request-id", request_id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), request_id);
    assert_eq!(resp.headers().get("x-trace-id").unwrap(), request_id);

    Ok(())
}
