//! Assignment endpoints, including the daily vocab quiz

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use quest_core::assignments::{daily_vocab_questions, streak, Assignment, DAILY_VOCAB_CODE};
use quest_core::{AssignmentId, AvatarId};

use super::ApiError;
use crate::state::ServerState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub avatar_id: Option<AvatarId>,
}

/// List assignments, optionally for one avatar, newest due date first
pub async fn list_assignments(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    let assignments = state.assignments.read().unwrap();
    let mut list: Vec<&Assignment> = assignments
        .values()
        .filter(|a| params.avatar_id.map_or(true, |id| a.avatar_id == id))
        .collect();
    list.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    Json(json!({ "assignments": list }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub name: String,
    #[serde(rename = "assignmentId")]
    pub assignment_code: String,
    #[serde(rename = "userId")]
    pub avatar_id: AvatarId,
    pub coins: i64,
    pub due_date: chrono::DateTime<Utc>,
    pub data: Option<Value>,
}

/// Create one assignment
pub async fn create_assignment(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<CreateAssignmentRequest>,
) -> Result<Json<Value>, ApiError> {
    if !state.avatars.read().unwrap().contains_key(&req.avatar_id) {
        return Err(ApiError::not_found("avatar"));
    }
    let id = state.assignment_ids.next();
    let assignment = Assignment {
        id,
        name: req.name,
        assignment_code: req.assignment_code,
        avatar_id: req.avatar_id,
        coins: req.coins,
        coins_received: 0,
        completed: false,
        due_date: req.due_date,
        retake_count: 0,
        data: req.data,
    };
    state.assignments.write().unwrap().insert(id, assignment);
    Ok(Json(json!({ "success": true, "assignmentId": id })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyVocabRequest {
    pub avatar_ids: Vec<AvatarId>,
    /// (english, spanish) word pairs for today's quiz
    pub words: Vec<(String, String)>,
    pub word_worth: i64,
    pub name: Option<String>,
}

/// Create today's vocab quiz for a set of avatars. Each avatar gets its own
/// copy with freshly generated question ids, due at 15:00 today.
pub async fn create_daily_vocab(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<DailyVocabRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.words.is_empty() {
        return Err(ApiError::bad_request("no words given"));
    }
    let due_time = NaiveTime::from_hms_opt(15, 0, 0).unwrap_or_default();
    let due_date = Utc::now()
        .date_naive()
        .and_time(due_time)
        .and_utc();
    let name = req.name.unwrap_or_else(|| "Daily Vocab".to_string());
    let total_coins = req.word_worth * req.words.len() as i64;

    let mut created = Vec::new();
    let mut rng = rand::thread_rng();
    let mut assignments = state.assignments.write().unwrap();
    for avatar_id in req.avatar_ids {
        if !state.avatars.read().unwrap().contains_key(&avatar_id) {
            return Err(ApiError::not_found("avatar"));
        }
        let questions = daily_vocab_questions(&req.words, req.word_worth, &mut rng);
        let id = state.assignment_ids.next();
        assignments.insert(
            id,
            Assignment {
                id,
                name: name.clone(),
                assignment_code: DAILY_VOCAB_CODE.to_string(),
                avatar_id,
                coins: total_coins,
                coins_received: 0,
                completed: false,
                due_date,
                retake_count: 0,
                data: Some(json!({ "questions": questions })),
            },
        );
        created.push(id);
    }
    tracing::info!(count = created.len(), "daily vocab assignments created");

    Ok(Json(json!({ "success": true, "assignmentIds": created })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    pub completed: Option<bool>,
    pub coins_received: Option<i64>,
    pub retake_count: Option<u32>,
    pub data: Option<Value>,
}

/// Update an assignment's completion state. Completing one pays the earned
/// coins out to the avatar.
pub async fn update_assignment(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<AssignmentId>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut assignments = state.assignments.write().unwrap();
    let assignment = assignments
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found("assignment"))?;

    if let Some(coins_received) = req.coins_received {
        assignment.coins_received = coins_received;
    }
    if let Some(retake_count) = req.retake_count {
        assignment.retake_count = retake_count;
    }
    if let Some(data) = req.data {
        assignment.data = Some(data);
    }
    if let Some(completed) = req.completed {
        let newly_completed = completed && !assignment.completed;
        assignment.completed = completed;
        if newly_completed {
            let mut avatars = state.avatars.write().unwrap();
            if let Some(avatar) = avatars.get_mut(&assignment.avatar_id) {
                avatar.coins += assignment.coins_received;
            }
        }
    }

    Ok(Json(json!({ "success": true })))
}

/// Delete an assignment
pub async fn delete_assignment(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<AssignmentId>,
) -> Result<Json<Value>, ApiError> {
    if state.assignments.write().unwrap().remove(&id).is_none() {
        return Err(ApiError::not_found("assignment"));
    }
    Ok(Json(json!({ "success": true })))
}

/// Daily vocab streak for one avatar
pub async fn get_streak(
    State(state): State<Arc<ServerState>>,
    Path(avatar_id): Path<AvatarId>,
) -> Result<Json<Value>, ApiError> {
    if !state.avatars.read().unwrap().contains_key(&avatar_id) {
        return Err(ApiError::not_found("avatar"));
    }
    let assignments = state.assignments.read().unwrap();
    let own: Vec<Assignment> = assignments
        .values()
        .filter(|a| a.avatar_id == avatar_id)
        .cloned()
        .collect();
    let days = streak(&own);
    Ok(Json(json!({ "streak": format!("{} days", days) })))
}
