//! Store endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use quest_core::store::{complete_purchase, listings, select_unit};
use quest_core::AvatarId;

use super::ApiError;
use crate::state::ServerState;

/// List store stock grouped into one listing per warrior name
pub async fn get_listings(State(state): State<Arc<ServerState>>) -> Json<Value> {
    let warriors = state.warriors.read().unwrap();
    Json(json!({ "listings": listings(warriors.values()) }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub name: String,
    pub avatar_id: AvatarId,
}

/// Buy one unit of a listing.
///
/// Unit selection honors store locks: a unit reserved for the buyer wins,
/// a unit locked by someone else is never sold out from under them.
pub async fn purchase(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<PurchaseRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut avatars = state.avatars.write().unwrap();
    let avatar = avatars
        .get_mut(&req.avatar_id)
        .ok_or_else(|| ApiError::not_found("avatar"))?;

    let mut warriors = state.warriors.write().unwrap();
    let unit_id = select_unit(warriors.values(), &req.name, req.avatar_id)?;
    let unit = warriors
        .get_mut(&unit_id)
        .ok_or_else(|| ApiError::not_found("warrior"))?;

    let receipt = complete_purchase(avatar, unit)?;
    tracing::info!(
        avatar_id = req.avatar_id,
        warrior_id = receipt.warrior_id,
        "store purchase"
    );

    Ok(Json(json!({
        "success": true,
        "message": format!("You bought {}!", receipt.name),
        "coins": receipt.coins_left,
        "warriorId": receipt.warrior_id,
    })))
}
