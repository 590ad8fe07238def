//! Avatar and asset endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use quest_core::roster::{rank_by_power, Avatar, Warrior, WarriorStatus};
use quest_core::{AvatarId, WarriorId};

use super::ApiError;
use crate::state::ServerState;

/// List all avatars with class ranks filled in
pub async fn list_avatars(State(state): State<Arc<ServerState>>) -> Json<Value> {
    let mut list: Vec<Avatar> = state.avatars.read().unwrap().values().cloned().collect();
    list.sort_by_key(|a| a.id);
    let warriors: Vec<Warrior> = state.warriors.read().unwrap().values().cloned().collect();
    rank_by_power(&mut list, &warriors);
    Json(json!({ "avatars": list }))
}

/// Get one avatar
pub async fn get_avatar(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<AvatarId>,
) -> Result<Json<Value>, ApiError> {
    let avatars = state.avatars.read().unwrap();
    let avatar = avatars.get(&id).ok_or_else(|| ApiError::not_found("avatar"))?;
    Ok(Json(json!({ "avatar": avatar })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvatarRequest {
    pub name: Option<String>,
    pub avatar_name: Option<String>,
    pub thumbnail: Option<String>,
    pub coins: Option<i64>,
    pub level: Option<u32>,
    pub element: Option<String>,
    pub super_power: Option<String>,
    pub personality: Option<String>,
    pub weakness: Option<String>,
    pub animal_ally: Option<String>,
    pub mascot: Option<String>,
}

/// Update an avatar's profile
pub async fn update_avatar(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<AvatarId>,
    Json(req): Json<UpdateAvatarRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut avatars = state.avatars.write().unwrap();
    let avatar = avatars.get_mut(&id).ok_or_else(|| ApiError::not_found("avatar"))?;

    if let Some(name) = req.name {
        avatar.name = name;
    }
    if let Some(avatar_name) = req.avatar_name {
        avatar.avatar_name = avatar_name;
    }
    if let Some(thumbnail) = req.thumbnail {
        avatar.thumbnail = thumbnail;
    }
    if let Some(coins) = req.coins {
        avatar.coins = coins;
    }
    if let Some(level) = req.level {
        avatar.level = level;
    }
    if let Some(element) = req.element {
        avatar.element = element;
    }
    if let Some(super_power) = req.super_power {
        avatar.super_power = super_power;
    }
    if let Some(personality) = req.personality {
        avatar.personality = personality;
    }
    if let Some(weakness) = req.weakness {
        avatar.weakness = weakness;
    }
    if let Some(animal_ally) = req.animal_ally {
        avatar.animal_ally = animal_ally;
    }
    if let Some(mascot) = req.mascot {
        avatar.mascot = mascot;
    }

    Ok(Json(json!({ "success": true, "avatar": avatar.clone() })))
}

/// List an avatar's assets sorted by status then level descending, which
/// puts fallen warriors ("rip") ahead of live ones
pub async fn get_assets(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<AvatarId>,
) -> Result<Json<Value>, ApiError> {
    if !state.avatars.read().unwrap().contains_key(&id) {
        return Err(ApiError::not_found("avatar"));
    }
    let warriors = state.warriors.read().unwrap();
    let status_key = |w: &Warrior| match w.status {
        WarriorStatus::Rip => 0,
        _ => 1,
    };
    let mut assets: Vec<&Warrior> = warriors
        .values()
        .filter(|w| w.avatar_id == Some(id) && w.status != WarriorStatus::Store)
        .collect();
    assets.sort_by(|a, b| {
        status_key(a)
            .cmp(&status_key(b))
            .then_with(|| b.level.cmp(&a.level))
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(Json(json!({ "assets": assets })))
}

/// Get one warrior asset
pub async fn get_asset(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<WarriorId>,
) -> Result<Json<Value>, ApiError> {
    let warriors = state.warriors.read().unwrap();
    let warrior = warriors.get(&id).ok_or_else(|| ApiError::not_found("asset"))?;
    Ok(Json(json!({ "asset": warrior })))
}
