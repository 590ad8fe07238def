//! Game board endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use quest_core::game::{GameBoard, TurnAdvance};
use quest_core::{AvatarId, GameId};

use super::ApiError;
use crate::state::ServerState;

/// List games, newest first
pub async fn list_games(State(state): State<Arc<ServerState>>) -> Json<Value> {
    let games = state.games.read().unwrap();
    let mut list: Vec<&GameBoard> = games.values().collect();
    list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(json!({ "games": list }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub name: String,
    pub rows: u16,
    pub columns: u16,
    pub turn_duration: Option<i64>,
    #[serde(default)]
    pub avatars: Vec<AvatarId>,
}

/// Create a game with a fresh board
pub async fn create_game(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<CreateGameRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = state.game_ids.next();
    let mut game = GameBoard::new(id, &req.name, req.rows, req.columns, Utc::now())?;
    if let Some(duration) = req.turn_duration {
        if duration <= 0 {
            return Err(ApiError::bad_request("turn duration must be positive"));
        }
        game.turn_duration = duration;
    }
    game.turn_order = req.avatars;
    let cell_count = game.cell_count();

    state.games.write().unwrap().insert(id, game);
    tracing::info!(game_id = id, cells = cell_count, "game created");

    Ok(Json(json!({
        "success": true,
        "gameId": id,
        "message": format!("Game created with {} cells", cell_count)
    })))
}

/// Get a game with its cells and, if one is linked, the running battle
pub async fn get_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<GameId>,
) -> Result<Json<Value>, ApiError> {
    let games = state.games.read().unwrap();
    let game = games.get(&id).ok_or_else(|| ApiError::not_found("game"))?;

    let battle = game.battle_id.and_then(|battle_id| {
        let battles = state.battles.read().unwrap();
        let battle = battles.get(&battle_id)?.clone();
        let questions = state.questions.read().unwrap();
        let next_for = |avatar: AvatarId| -> Option<Value> {
            let mut pending: Vec<_> = questions
                .values()
                .filter(|q| q.battle_id == battle_id && q.avatar_id == avatar && !q.is_answered())
                .collect();
            pending.sort_by_key(|q| q.id);
            pending.first().map(|q| json!(q))
        };
        Some(json!({
            "battle": battle,
            "attackerQuestion": next_for(battle.attacker_avatar_id),
            "defenderQuestion": next_for(battle.defender_avatar_id),
        }))
    });

    Ok(Json(json!({
        "game": game,
        "cells": game.cells_sorted(),
        "battle": battle,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameRequest {
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub turn_duration: Option<i64>,
    pub avatars: Option<Vec<AvatarId>>,
}

/// Update game settings
pub async fn update_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<GameId>,
    Json(req): Json<UpdateGameRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut games = state.games.write().unwrap();
    let game = games.get_mut(&id).ok_or_else(|| ApiError::not_found("game"))?;

    if let Some(name) = req.name {
        game.name = name;
    }
    if let Some(thumbnail) = req.thumbnail {
        game.thumbnail = thumbnail;
    }
    if let Some(duration) = req.turn_duration {
        if duration <= 0 {
            return Err(ApiError::bad_request("turn duration must be positive"));
        }
        game.turn_duration = duration;
    }
    if let Some(avatars) = req.avatars {
        game.turn_order = avatars;
        if game.current_turn_index >= game.turn_order.len() {
            game.current_turn_index = 0;
        }
    }
    drop(games);

    state.broadcast_game_update(id);
    Ok(Json(json!({ "success": true })))
}

/// Delete a game
pub async fn delete_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<GameId>,
) -> Result<Json<Value>, ApiError> {
    let removed = state.games.write().unwrap().remove(&id);
    if removed.is_none() {
        return Err(ApiError::not_found("game"));
    }
    Ok(Json(json!({ "success": true })))
}

/// Advance the shared turn clock.
///
/// Every client asks for this when its countdown hits zero; requests that
/// arrive before 90% of the turn elapsed are duplicates and answered with a
/// success-shaped no-op so clients do not retry.
pub async fn advance_turn(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<GameId>,
) -> Result<Json<Value>, ApiError> {
    let outcome = {
        let mut games = state.games.write().unwrap();
        let game = games.get_mut(&id).ok_or_else(|| ApiError::not_found("game"))?;
        game.advance_turn(Utc::now())?
    };

    match outcome {
        TurnAdvance::Advanced { new_index, started } => {
            state.broadcast_game_update(id);
            Ok(Json(json!({
                "success": true,
                "newTurnIndex": new_index,
                "turnStartTime": started,
            })))
        }
        TurnAdvance::NotReady { elapsed, required } => Ok(Json(json!({
            "success": true,
            "message": "Turn not ready to advance yet",
            "elapsed": elapsed,
            "required": required,
        }))),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTurnRequest {
    pub avatar_id: AvatarId,
}

/// Hand the turn to a specific avatar
pub async fn set_turn(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<GameId>,
    Json(req): Json<SetTurnRequest>,
) -> Result<Json<Value>, ApiError> {
    let index = {
        let mut games = state.games.write().unwrap();
        let game = games.get_mut(&id).ok_or_else(|| ApiError::not_found("game"))?;
        game.set_turn(req.avatar_id, Utc::now())?
    };

    state.broadcast_game_update(id);
    Ok(Json(json!({
        "success": true,
        "newTurnIndex": index,
    })))
}
