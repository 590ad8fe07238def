//! Integration tests for the quest-server API

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use quest_core::roster::{random_avatar, random_warrior, WarriorStatus};
use quest_server::{create_router, ServerState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_state() -> Arc<ServerState> {
    let state = Arc::new(ServerState::new());
    let mut rng = rand::thread_rng();

    let mut avatars = state.avatars.write().unwrap();
    let mut warriors = state.warriors.write().unwrap();
    for name in ["Ana", "Luis"] {
        let id = state.avatar_ids.next();
        let mut avatar = random_avatar(&mut rng, id, name);
        avatar.coins = 500;
        avatars.insert(id, avatar);
    }
    // avatar 1 owns warrior 1, warrior 2 is store stock
    let id = state.warrior_ids.next();
    let mut owned = random_warrior(&mut rng, id, WarriorStatus::Warrior);
    owned.avatar_id = Some(1);
    owned.level = 2;
    warriors.insert(id, owned);

    let id = state.warrior_ids.next();
    let mut stock = random_warrior(&mut rng, id, WarriorStatus::Store);
    stock.name = "Thunder".to_string();
    stock.cost = 100;
    warriors.insert(id, stock);

    drop(avatars);
    drop(warriors);
    state
}

fn test_app() -> axum::Router {
    create_router(test_state())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["engine"], "rust");
}

#[tokio::test]
async fn test_create_and_get_game() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/games",
            json!({ "name": "Period 3", "rows": 5, "columns": 5, "avatars": [1, 2] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["gameId"], 1);
    assert_eq!(json["message"], "Game created with 25 cells");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/games/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["game"]["name"], "Period 3");
    let cells = json["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 25);
    assert_eq!(cells[0]["cellId"], "A1");
    assert_eq!(cells[0]["background"], "#3a3a3a");
    assert!(json["battle"].is_null());
}

#[tokio::test]
async fn test_get_missing_game_is_404() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/games/99")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_advance_turn_duplicate_is_not_ready() {
    let app = test_app();

    app.clone()
        .oneshot(post_json(
            "/api/games",
            json!({ "name": "g", "rows": 3, "columns": 3, "avatars": [1, 2] }),
        ))
        .await
        .unwrap();

    // first advance starts the clock
    let response = app
        .clone()
        .oneshot(post_json("/api/games/1/advance-turn", json!({})))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["newTurnIndex"], 1);

    // an immediate second request is a duplicate, answered as a no-op
    let response = app
        .oneshot(post_json("/api/games/1/advance-turn", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Turn not ready to advance yet");
}

#[tokio::test]
async fn test_place_warrior_ownership() {
    let app = test_app();

    app.clone()
        .oneshot(post_json(
            "/api/games",
            json!({ "name": "g", "rows": 5, "columns": 5 }),
        ))
        .await
        .unwrap();

    // avatar 2 does not own warrior 1
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/game-cells/1/B2/place-warrior",
            json!({ "warriorId": 1, "avatarId": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "This warrior does not belong to you");

    // the owner may place it
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/game-cells/1/B2/place-warrior",
            json!({ "warriorId": 1, "avatarId": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // the cell is now occupied
    let response = app
        .oneshot(post_json(
            "/api/game-cells/1/B2/place-warrior",
            json!({ "warriorId": 1, "avatarId": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_move_warrior_range_enforced() {
    let app = test_app();

    app.clone()
        .oneshot(post_json(
            "/api/games",
            json!({ "name": "g", "rows": 5, "columns": 5 }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json(
            "/api/game-cells/1/A1/place-warrior",
            json!({ "warriorId": 1, "avatarId": 1 }),
        ))
        .await
        .unwrap();

    // warrior 1 is level 2: D4 is three steps away
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/game-cells/move-warrior",
            json!({
                "gameId": 1, "fromCellId": "A1", "toCellId": "D4",
                "warriorId": 1, "avatarId": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(post_json(
            "/api/game-cells/move-warrior",
            json!({
                "gameId": 1, "fromCellId": "A1", "toCellId": "C3",
                "warriorId": 1, "avatarId": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_store_purchase() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/store")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    let listings = json["listings"].as_array().unwrap();
    assert!(listings.iter().any(|l| l["name"] == "Thunder"));

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/store/purchase",
            json!({ "name": "Thunder", "avatarId": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["coins"], 400);

    // stock is gone now
    let response = app
        .oneshot(post_json(
            "/api/store/purchase",
            json!({ "name": "Thunder", "avatarId": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_avatars_listed_with_assets() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/avatars")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let avatars = json["avatars"].as_array().unwrap();
    assert_eq!(avatars.len(), 2);
    assert_eq!(avatars[0]["assetCount"], 1);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/avatars/1/assets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["assets"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_assets_sorted_fallen_first() {
    let state = test_state();
    {
        let mut rng = rand::thread_rng();
        let mut warriors = state.warriors.write().unwrap();
        let id = state.warrior_ids.next();
        let mut fallen = random_warrior(&mut rng, id, WarriorStatus::Warrior);
        fallen.avatar_id = Some(1);
        fallen.level = 1;
        fallen.health = 0;
        fallen.status = WarriorStatus::Rip;
        warriors.insert(id, fallen);
    }
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/avatars/1/assets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    let assets = json["assets"].as_array().unwrap();
    assert_eq!(assets.len(), 2);
    // rip sorts ahead of live warriors even at a lower level
    assert_eq!(assets[0]["status"], "rip");
    assert_eq!(assets[1]["status"], "warrior");
}

#[tokio::test]
async fn test_ws_route_registered_under_api() {
    let app = test_app();

    // a plain GET is not a valid upgrade, but the route must exist
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ws")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_battle_flow() {
    let app = test_app();

    // give avatar 2 a warrior to defend with
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/store/purchase",
            json!({ "name": "Thunder", "avatarId": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/battles",
            json!({
                "name": "Duel",
                "reward": 50,
                "attacker": 1,
                "defender": 2,
                "attackerAvatarId": 1,
                "defenderAvatarId": 2,
                "questions": [
                    { "prompt": "How do you say 'dog' in Spanish?", "answer": "el perro",
                      "avatarId": 1, "possiblePoints": 10 },
                    { "prompt": "How do you say 'cat' in Spanish?", "answer": "el gato",
                      "avatarId": 2, "possiblePoints": 10 }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["battleId"], 1);

    app.clone()
        .oneshot(post_json("/api/battles/1/start", json!({})))
        .await
        .unwrap();

    // attacker answers correctly, defender never answers
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/battles/1/submit-answer",
            json!({ "questionId": 1, "answer": "El Perro", "avatarId": 1 }),
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["correct"], true);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/battles/1/questions/unanswered/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert!(json["question"].is_null());

    let response = app
        .oneshot(post_json("/api/battles/1/complete", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    // attacker answered, defender did not: damage lands on the defender
    assert!(json["defenderHealth"].as_i64().unwrap() < 100);
    assert_eq!(json["attackerStamina"], 100);
}

#[tokio::test]
async fn test_assignments_and_streak() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/assignments/daily-vocab",
            json!({
                "avatarIds": [1],
                "words": [["dog", "el perro"], ["cat", "el gato"]],
                "wordWorth": 5
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["assignmentIds"].as_array().unwrap().len(), 1);

    // not completed yet: no streak
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/assignments/streak/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["streak"], "0 days");

    // completing it pays out and starts the streak
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/api/assignments/1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "completed": true, "coinsReceived": 10 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/assignments/streak/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["streak"], "1 days");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/avatars/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["avatar"]["coins"], 510);
}
