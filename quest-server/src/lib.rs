//! Spanish Quest Server - HTTP API for the classroom client
//!
//! This crate provides the web backend:
//! - REST API for games, avatars, warriors, battles and assignments
//! - The store purchase flow
//! - Websocket push of realtime game updates

mod routes;
mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use state::{ServerState, UpdateEvent};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Games API
        .route(
            "/api/games",
            get(routes::games::list_games).post(routes::games::create_game),
        )
        .route(
            "/api/games/{id}",
            get(routes::games::get_game)
                .put(routes::games::update_game)
                .delete(routes::games::delete_game),
        )
        .route(
            "/api/games/{id}/advance-turn",
            post(routes::games::advance_turn),
        )
        .route("/api/games/{id}/set-turn", post(routes::games::set_turn))
        // Cells API
        .route(
            "/api/game-cells/{game_id}/{cell_id}",
            put(routes::cells::update_cell),
        )
        .route(
            "/api/game-cells/{game_id}/{cell_id}/place-warrior",
            post(routes::cells::place_warrior),
        )
        .route(
            "/api/game-cells/move-warrior",
            post(routes::cells::move_warrior),
        )
        // Avatars API
        .route("/api/avatars", get(routes::avatars::list_avatars))
        .route(
            "/api/avatars/{id}",
            get(routes::avatars::get_avatar).put(routes::avatars::update_avatar),
        )
        .route("/api/avatars/{id}/assets", get(routes::avatars::get_assets))
        .route("/api/assets/{id}", get(routes::avatars::get_asset))
        // Store API
        .route("/api/store", get(routes::store::get_listings))
        .route("/api/store/purchase", post(routes::store::purchase))
        // Battles API
        .route(
            "/api/battles",
            get(routes::battles::list_battles).post(routes::battles::create_battle),
        )
        .route(
            "/api/battles/{id}",
            get(routes::battles::get_battle).put(routes::battles::update_battle),
        )
        .route("/api/battles/{id}/start", post(routes::battles::start_battle))
        .route("/api/battles/{id}/stop", post(routes::battles::stop_battle))
        .route(
            "/api/battles/{id}/submit-answer",
            post(routes::battles::submit_answer),
        )
        .route("/api/battles/{id}/grade", post(routes::battles::grade))
        .route(
            "/api/battles/{id}/questions/unanswered/{avatar_id}",
            get(routes::battles::unanswered_question),
        )
        .route(
            "/api/battles/{id}/complete",
            post(routes::battles::complete_battle),
        )
        // Assignments API
        .route(
            "/api/assignments",
            get(routes::assignments::list_assignments).post(routes::assignments::create_assignment),
        )
        .route(
            "/api/assignments/daily-vocab",
            post(routes::assignments::create_daily_vocab),
        )
        .route(
            "/api/assignments/{id}",
            put(routes::assignments::update_assignment)
                .delete(routes::assignments::delete_assignment),
        )
        .route(
            "/api/assignments/streak/{avatar_id}",
            get(routes::assignments::get_streak),
        )
        // Realtime updates
        .route("/api/ws", get(routes::ws::ws_handler))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig, state: Arc<ServerState>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let router = create_router(state);

    tracing::info!("Spanish Quest server starting on http://0.0.0.0:{}", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
