use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::json;

use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn submit_without_session_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/game/submit")
        .set_json(json!({ "content": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "SESSION_REQUIRED",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/game/vote")
        .insert_header(("x-session-id", "abc"))
        .set_json(json!({ "submissionId": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_SESSION_ID",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;

    Ok(())
}

#[actix_web::test]
async fn game_id_query_is_validated() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    for (uri, code, status) in [
        ("/api/game/status", "INVALID_GAME_ID", StatusCode::BAD_REQUEST),
        ("/api/game/status?gameId=abc", "INVALID_GAME_ID", StatusCode::BAD_REQUEST),
        ("/api/game/status?gameId=-4", "INVALID_GAME_ID", StatusCode::BAD_REQUEST),
        ("/api/game/status?gameId=777777", "GAME_NOT_FOUND", StatusCode::NOT_FOUND),
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details_from_service_response(resp, code, status, None).await;
    }

    Ok(())
}

#[actix_web::test]
async fn malformed_bodies_are_bad_requests() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/game/join")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"gameId\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("Invalid JSON"),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/game/join")
        .set_json(json!({ "gameId": 1, "name": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "VALIDATION_ERROR",
        StatusCode::BAD_REQUEST,
        Some("name"),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/game/next")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_GAME_ID",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;

    Ok(())
}
