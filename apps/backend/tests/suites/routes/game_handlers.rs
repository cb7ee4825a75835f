use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use quipreel::db::require_db;
use quipreel::db::txn::SharedTxn;
use serde_json::{json, Value};

use crate::support::{build_test_state, create_test_app};

fn cookie_value(resp: &actix_web::dev::ServiceResponse, name: &str) -> Option<String> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

#[actix_web::test]
async fn create_join_submit_vote_and_tally() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let app = create_test_app(state)
        .with_prod_routes()
        .with_shared_txn(shared.clone())
        .build()
        .await?;

    let req = test::TestRequest::post().uri("/api/game/new").to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let game_id = created["game"]["id"].as_i64().expect("game id");
    assert_eq!(created["game"]["currentRound"], 1);
    assert_eq!(created["round"]["roundNumber"], 1);

    let mut sessions = Vec::new();
    for name in ["Ada", "Linus", "Grace"] {
        let req = test::TestRequest::post()
            .uri("/api/game/join")
            .set_json(json!({ "gameId": game_id, "name": name }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let session_cookie = cookie_value(&resp, "sessionId").expect("sessionId cookie");
        assert_eq!(
            cookie_value(&resp, "gameId").as_deref(),
            Some(game_id.to_string().as_str())
        );
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["id"].as_i64().map(|id| id.to_string()), Some(session_cookie));
        sessions.push(body);
    }
    assert_eq!(sessions[0]["role"], "player");
    assert_eq!(sessions[1]["role"], "player");
    assert_eq!(sessions[2]["role"], "voter");

    let player = sessions[0]["id"].as_i64().unwrap();
    let voter = sessions[2]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/game/submit")
        .cookie(Cookie::new("sessionId", player.to_string()))
        .set_json(json!({ "content": "a cat skateboarding" }))
        .to_request();
    let submission: Value = test::call_and_read_body_json(&app, req).await;
    let submission_id = submission["id"].as_i64().expect("submission id");
    assert!(submission["resultUrl"].as_str().unwrap().starts_with("https://"));

    let req = test::TestRequest::post()
        .uri("/api/game/vote")
        .insert_header(("x-session-id", voter.to_string()))
        .set_json(json!({ "submissionId": submission_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/game/roundResults?gameId={game_id}"))
        .to_request();
    let results: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(results["votes"][submission_id.to_string()], 1);
    assert_eq!(results["votes"].as_object().map(|m| m.len()), Some(1));
    assert_eq!(results["submissions"].as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::get()
        .uri("/api/game/results")
        .cookie(Cookie::new("gameId", game_id.to_string()))
        .to_request();
    let results: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(results["winners"], json!([player]));

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn status_then_next_until_max_rounds() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let app = create_test_app(state)
        .with_prod_routes()
        .with_shared_txn(shared.clone())
        .build()
        .await?;

    let req = test::TestRequest::post().uri("/api/game/new").to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let game_id = created["game"]["id"].as_i64().unwrap();

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/game/status?gameId={game_id}"))
            .to_request();
        let status: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status["roundCount"], 1);
        assert_eq!(status["isActive"], true);
        assert!(status["roundDeadline"].is_string());
    }

    let req = test::TestRequest::post()
        .uri("/api/game/advanceIfDue")
        .set_json(json!({ "gameId": game_id }))
        .to_request();
    let outcome: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(outcome, json!({ "advanced": false, "round": null }));

    for expected in [2, 3] {
        let req = test::TestRequest::post()
            .uri("/api/game/next")
            .set_json(json!({ "gameId": game_id.to_string() }))
            .to_request();
        let round: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(round["roundNumber"], expected);
    }

    let req = test::TestRequest::post()
        .uri("/api/game/next")
        .set_json(json!({ "gameId": game_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "MAX_ROUNDS_REACHED",
        StatusCode::CONFLICT,
        None,
    )
    .await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn ended_game_rejects_submit() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let app = create_test_app(state)
        .with_prod_routes()
        .with_shared_txn(shared.clone())
        .build()
        .await?;

    let req = test::TestRequest::post().uri("/api/game/new").to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let game_id = created["game"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/game/join")
        .set_json(json!({ "gameId": game_id, "name": "Ada" }))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/game/end")
        .set_json(json!({ "gameId": game_id }))
        .to_request();
    let ended: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ended, json!({ "gameId": game_id, "ended": true }));

    let req = test::TestRequest::post()
        .uri("/api/game/submit")
        .insert_header(("x-session-id", session["id"].to_string()))
        .set_json(json!({ "content": "too late" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "GAME_INACTIVE",
        StatusCode::CONFLICT,
        Some("has ended"),
    )
    .await;

    drop(app);
    shared.rollback().await?;
    Ok(())
}

#[actix_web::test]
async fn end_unknown_game_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/game/end")
        .set_json(json!({ "gameId": 424_242 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "GAME_NOT_FOUND",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;

    Ok(())
}

#[actix_web::test]
async fn failing_generator_is_bad_gateway() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::Arc;

    use quipreel::config::game::GameConfig;
    use quipreel::video_gen::FakeVideoGenerator;

    let state = crate::support::build_test_state_with(
        Arc::new(FakeVideoGenerator::failing()),
        GameConfig::default(),
    )
    .await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let app = create_test_app(state)
        .with_prod_routes()
        .with_shared_txn(shared.clone())
        .build()
        .await?;

    let req = test::TestRequest::post().uri("/api/game/new").to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let game_id = created["game"]["id"].as_i64().unwrap();
    let req = test::TestRequest::post()
        .uri("/api/game/join")
        .set_json(json!({ "gameId": game_id, "name": "Ada" }))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/game/submit")
        .insert_header(("x-session-id", session["id"].to_string()))
        .set_json(json!({ "content": "a cat skateboarding" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let problem = assert_problem_details_from_service_response(
        resp,
        "GENERATION_FAILED",
        StatusCode::BAD_GATEWAY,
        None,
    )
    .await;
    // Upstream error text stays in the logs.
    assert!(!problem.detail.contains("fake generator"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/game/roundResults?gameId={game_id}"))
        .to_request();
    let results: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(results["submissions"], json!([]));

    drop(app);
    shared.rollback().await?;
    Ok(())
}
