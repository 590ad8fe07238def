//! Cell endpoints: editing, warrior placement and movement

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use quest_core::game::CellPatch;
use quest_core::roster::WarriorStatus;
use quest_core::{AvatarId, GameId, WarriorId};

use super::ApiError;
use crate::state::ServerState;

/// Edit a cell's display state
pub async fn update_cell(
    State(state): State<Arc<ServerState>>,
    Path((game_id, cell_id)): Path<(GameId, String)>,
    Json(patch): Json<CellPatch>,
) -> Result<Json<Value>, ApiError> {
    let cell = {
        let mut games = state.games.write().unwrap();
        let game = games
            .get_mut(&game_id)
            .ok_or_else(|| ApiError::not_found("game"))?;
        let coord = game.resolve(&cell_id)?;
        game.update_cell(coord, patch)?.clone()
    };

    state.broadcast_game_update(game_id);
    Ok(Json(json!({ "success": true, "cell": cell })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceWarriorRequest {
    pub warrior_id: WarriorId,
    pub avatar_id: AvatarId,
}

/// Checks that the asset exists, belongs to the acting avatar and is a
/// live warrior. Returns its level for the movement range check.
fn check_warrior(
    state: &ServerState,
    warrior_id: WarriorId,
    avatar_id: AvatarId,
) -> Result<u32, ApiError> {
    let warriors = state.warriors.read().unwrap();
    let warrior = warriors
        .get(&warrior_id)
        .ok_or_else(|| ApiError::not_found("warrior"))?;
    if warrior.avatar_id != Some(avatar_id) {
        return Err(ApiError::forbidden("This warrior does not belong to you"));
    }
    if warrior.status != WarriorStatus::Warrior {
        return Err(ApiError::bad_request("This asset is not a warrior"));
    }
    Ok(warrior.level)
}

/// Place a warrior on an empty active cell
pub async fn place_warrior(
    State(state): State<Arc<ServerState>>,
    Path((game_id, cell_id)): Path<(GameId, String)>,
    Json(req): Json<PlaceWarriorRequest>,
) -> Result<Json<Value>, ApiError> {
    check_warrior(&state, req.warrior_id, req.avatar_id)?;

    {
        let mut games = state.games.write().unwrap();
        let game = games
            .get_mut(&game_id)
            .ok_or_else(|| ApiError::not_found("game"))?;
        let coord = game.resolve(&cell_id)?;
        game.place_warrior(coord, req.warrior_id)?;
    }

    state.broadcast_game_update(game_id);
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveWarriorRequest {
    pub game_id: GameId,
    pub from_cell_id: String,
    pub to_cell_id: String,
    pub warrior_id: WarriorId,
    pub avatar_id: AvatarId,
}

/// Move a warrior. The client pre-checks range; the board enforces it.
pub async fn move_warrior(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<MoveWarriorRequest>,
) -> Result<Json<Value>, ApiError> {
    let level = check_warrior(&state, req.warrior_id, req.avatar_id)?;

    {
        let mut games = state.games.write().unwrap();
        let game = games
            .get_mut(&req.game_id)
            .ok_or_else(|| ApiError::not_found("game"))?;
        let from = game.resolve(&req.from_cell_id)?;
        let to = game.resolve(&req.to_cell_id)?;
        game.move_warrior(from, to, req.warrior_id, level)?;
    }

    state.broadcast_game_update(req.game_id);
    Ok(Json(json!({ "success": true })))
}
