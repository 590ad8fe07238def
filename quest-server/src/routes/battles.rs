//! Battle endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use quest_core::battle::{resolve, Battle, BattleStatus, Question};
use quest_core::roster::WarriorStatus;
use quest_core::{AvatarId, BattleId, GameId, QuestionId, WarriorId};

use super::ApiError;
use crate::state::ServerState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    /// Present when updating an existing question
    pub id: Option<QuestionId>,
    pub prompt: String,
    pub answer: String,
    pub avatar_id: AvatarId,
    pub possible_points: i64,
    #[serde(default = "default_time_limit")]
    pub time_limit: i64,
}

fn default_time_limit() -> i64 {
    20
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBattleRequest {
    pub name: String,
    pub reward: i64,
    pub status: Option<BattleStatus>,
    pub attacker: WarriorId,
    pub defender: WarriorId,
    pub attacker_avatar_id: AvatarId,
    pub defender_avatar_id: AvatarId,
    pub game_id: Option<GameId>,
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

/// Create a battle and its question set. Linking a game pins the battle to
/// that board until it completes.
pub async fn create_battle(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<CreateBattleRequest>,
) -> Result<Json<Value>, ApiError> {
    {
        let warriors = state.warriors.read().unwrap();
        for id in [req.attacker, req.defender] {
            if !warriors.contains_key(&id) {
                return Err(ApiError::not_found("warrior"));
            }
        }
    }

    let id = state.battle_ids.next();
    let battle = Battle {
        id,
        name: req.name,
        reward: req.reward,
        status: req.status.unwrap_or(BattleStatus::Pending),
        attacker: req.attacker,
        defender: req.defender,
        attacker_avatar_id: req.attacker_avatar_id,
        defender_avatar_id: req.defender_avatar_id,
        game_id: req.game_id,
        winner: None,
        created_at: Utc::now(),
    };

    {
        let mut questions = state.questions.write().unwrap();
        for input in req.questions {
            let question_id = state.question_ids.next();
            questions.insert(
                question_id,
                Question {
                    id: question_id,
                    battle_id: id,
                    prompt: input.prompt,
                    answer: input.answer,
                    avatar_id: input.avatar_id,
                    possible_points: input.possible_points,
                    received_score: 0,
                    time_limit: input.time_limit,
                    response: None,
                    submitted_at: None,
                },
            );
        }
    }

    if let Some(game_id) = req.game_id {
        let mut games = state.games.write().unwrap();
        let game = games
            .get_mut(&game_id)
            .ok_or_else(|| ApiError::not_found("game"))?;
        game.battle_id = Some(id);
        drop(games);
        state.broadcast_game_update(game_id);
    }

    state.battles.write().unwrap().insert(id, battle);
    tracing::info!(battle_id = id, "battle created");

    Ok(Json(json!({ "success": true, "battleId": id })))
}

/// List battles, newest first
pub async fn list_battles(State(state): State<Arc<ServerState>>) -> Json<Value> {
    let battles = state.battles.read().unwrap();
    let mut list: Vec<&Battle> = battles.values().collect();
    list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(json!({ "battles": list }))
}

fn next_unanswered(state: &ServerState, battle_id: BattleId, avatar: AvatarId) -> Option<Question> {
    let questions = state.questions.read().unwrap();
    let mut pending: Vec<&Question> = questions
        .values()
        .filter(|q| q.battle_id == battle_id && q.avatar_id == avatar && !q.is_answered())
        .collect();
    pending.sort_by_key(|q| q.id);
    pending.first().map(|q| (*q).clone())
}

/// Get a battle with both warriors, both sides' next questions and the full
/// question list
pub async fn get_battle(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<BattleId>,
) -> Result<Json<Value>, ApiError> {
    let battle = state
        .battles
        .read()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("battle"))?;

    let warriors = state.warriors.read().unwrap();
    let attacker_asset = warriors.get(&battle.attacker).cloned();
    let defender_asset = warriors.get(&battle.defender).cloned();
    drop(warriors);

    let mut all: Vec<Question> = state
        .questions
        .read()
        .unwrap()
        .values()
        .filter(|q| q.battle_id == id)
        .cloned()
        .collect();
    all.sort_by_key(|q| q.id);

    Ok(Json(json!({
        "battle": battle,
        "attackerAsset": attacker_asset,
        "defenderAsset": defender_asset,
        "attackerQuestion": next_unanswered(&state, id, battle.attacker_avatar_id),
        "defenderQuestion": next_unanswered(&state, id, battle.defender_avatar_id),
        "questions": all,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBattleRequest {
    pub name: Option<String>,
    pub reward: Option<i64>,
    pub status: Option<BattleStatus>,
    /// Replaces the battle's question set: entries with an id update that
    /// question, entries without one are new, questions left out are removed
    pub questions: Option<Vec<QuestionInput>>,
}

/// Update a battle and optionally rewrite its question set
pub async fn update_battle(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<BattleId>,
    Json(req): Json<UpdateBattleRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut battles = state.battles.write().unwrap();
    let battle = battles.get_mut(&id).ok_or_else(|| ApiError::not_found("battle"))?;

    if let Some(name) = req.name {
        battle.name = name;
    }
    if let Some(reward) = req.reward {
        battle.reward = reward;
    }
    if let Some(status) = req.status {
        battle.status = status;
    }

    if let Some(inputs) = req.questions {
        let mut questions = state.questions.write().unwrap();
        let keep: Vec<QuestionId> = inputs.iter().filter_map(|q| q.id).collect();
        questions.retain(|_, q| q.battle_id != id || keep.contains(&q.id));
        for input in inputs {
            match input.id {
                Some(question_id) => {
                    if let Some(question) = questions.get_mut(&question_id) {
                        question.prompt = input.prompt;
                        question.answer = input.answer;
                        question.avatar_id = input.avatar_id;
                        question.possible_points = input.possible_points;
                        question.time_limit = input.time_limit;
                    }
                }
                None => {
                    let question_id = state.question_ids.next();
                    questions.insert(
                        question_id,
                        Question {
                            id: question_id,
                            battle_id: id,
                            prompt: input.prompt,
                            answer: input.answer,
                            avatar_id: input.avatar_id,
                            possible_points: input.possible_points,
                            received_score: 0,
                            time_limit: input.time_limit,
                            response: None,
                            submitted_at: None,
                        },
                    );
                }
            }
        }
    }

    Ok(Json(json!({ "success": true })))
}

fn set_status(
    state: &ServerState,
    id: BattleId,
    status: BattleStatus,
) -> Result<Option<GameId>, ApiError> {
    let mut battles = state.battles.write().unwrap();
    let battle = battles.get_mut(&id).ok_or_else(|| ApiError::not_found("battle"))?;
    battle.status = status;
    Ok(battle.game_id)
}

/// Start a battle: both sides begin answering their questions
pub async fn start_battle(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<BattleId>,
) -> Result<Json<Value>, ApiError> {
    let game_id = set_status(&state, id, BattleStatus::InProgress)?;
    if let Some(game_id) = game_id {
        state.broadcast_game_update(game_id);
    }
    Ok(Json(json!({ "success": true })))
}

/// Pause a battle back to pending
pub async fn stop_battle(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<BattleId>,
) -> Result<Json<Value>, ApiError> {
    let game_id = set_status(&state, id, BattleStatus::Pending)?;
    if let Some(game_id) = game_id {
        state.broadcast_game_update(game_id);
    }
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub question_id: QuestionId,
    pub answer: String,
    pub avatar_id: AvatarId,
}

/// Submit an answer to a battle question
pub async fn submit_answer(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<BattleId>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<Value>, ApiError> {
    let game_id = {
        let battles = state.battles.read().unwrap();
        let battle = battles.get(&id).ok_or_else(|| ApiError::not_found("battle"))?;
        battle.game_id
    };

    let correct = {
        let mut questions = state.questions.write().unwrap();
        let question = questions
            .get_mut(&req.question_id)
            .filter(|q| q.battle_id == id)
            .ok_or_else(|| ApiError::not_found("question"))?;
        if question.avatar_id != req.avatar_id {
            return Err(ApiError::forbidden("This question is not yours to answer"));
        }
        question.submit(&req.answer, Utc::now());
        if question.answered_correctly() {
            question.received_score = question.possible_points;
        }
        question.answered_correctly()
    };

    if let Some(game_id) = game_id {
        state.broadcast_game_update(game_id);
    }
    Ok(Json(json!({ "success": true, "correct": correct })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeEntry {
    pub question_id: QuestionId,
    pub received_score: i64,
}

#[derive(Deserialize)]
pub struct GradeRequest {
    pub grades: Vec<GradeEntry>,
}

/// Override scores on answered questions, for teacher review of free-text
/// answers the automatic check got wrong
pub async fn grade(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<BattleId>,
    Json(req): Json<GradeRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut questions = state.questions.write().unwrap();
    let mut graded = 0;
    for entry in req.grades {
        if let Some(question) = questions
            .get_mut(&entry.question_id)
            .filter(|q| q.battle_id == id)
        {
            question.received_score = entry.received_score;
            graded += 1;
        }
    }
    Ok(Json(json!({ "success": true, "graded": graded })))
}

/// Next unanswered question for an avatar, null when they are done
pub async fn unanswered_question(
    State(state): State<Arc<ServerState>>,
    Path((id, avatar_id)): Path<(BattleId, AvatarId)>,
) -> Result<Json<Value>, ApiError> {
    if !state.battles.read().unwrap().contains_key(&id) {
        return Err(ApiError::not_found("battle"));
    }
    Ok(Json(json!({ "question": next_unanswered(&state, id, avatar_id) })))
}

fn side_correct(questions: &[&Question], avatar: AvatarId) -> bool {
    let own: Vec<_> = questions.iter().filter(|q| q.avatar_id == avatar).collect();
    !own.is_empty() && own.iter().all(|q| q.received_score > 0)
}

/// Resolve the battle and apply the outcome.
///
/// Each side counts as correct when every one of its questions earned
/// points. Damage lands on the defender's health and the attacker's
/// stamina; a warrior dropping to zero health is marked rip and removed
/// from the linked board. The winner's avatar collects the reward.
pub async fn complete_battle(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<BattleId>,
) -> Result<Json<Value>, ApiError> {
    let battle = state
        .battles
        .read()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("battle"))?;

    let (attacker_correct, defender_correct) = {
        let questions = state.questions.read().unwrap();
        let battle_questions: Vec<&Question> =
            questions.values().filter(|q| q.battle_id == id).collect();
        (
            side_correct(&battle_questions, battle.attacker_avatar_id),
            side_correct(&battle_questions, battle.defender_avatar_id),
        )
    };

    let report = {
        let mut warriors = state.warriors.write().unwrap();
        let attacker = warriors
            .get(&battle.attacker)
            .cloned()
            .ok_or_else(|| ApiError::not_found("warrior"))?;
        let defender = warriors
            .get(&battle.defender)
            .cloned()
            .ok_or_else(|| ApiError::not_found("warrior"))?;

        let report = resolve(&attacker, &defender, attacker_correct, defender_correct);

        if let Some(defender) = warriors.get_mut(&battle.defender) {
            defender.health = report.defender_health;
            if report.defender_defeated {
                defender.status = WarriorStatus::Rip;
            }
        }
        if let Some(attacker) = warriors.get_mut(&battle.attacker) {
            attacker.stamina = report.attacker_stamina;
            if report.attacker_defeated {
                attacker.status = WarriorStatus::Rip;
            }
        }
        report
    };

    // winner takes the reward
    let winner = if report.defender_defeated {
        Some(battle.attacker_avatar_id)
    } else if report.attacker_defeated {
        Some(battle.defender_avatar_id)
    } else {
        None
    };
    if let Some(winner) = winner {
        let mut avatars = state.avatars.write().unwrap();
        if let Some(avatar) = avatars.get_mut(&winner) {
            avatar.coins += battle.reward;
        }
    }

    if let Some(game_id) = battle.game_id {
        let mut games = state.games.write().unwrap();
        if let Some(game) = games.get_mut(&game_id) {
            if report.defender_defeated {
                game.evict_warrior(battle.defender);
            }
            if report.attacker_defeated {
                game.evict_warrior(battle.attacker);
            }
            game.battle_id = None;
        }
        drop(games);
        state.broadcast_game_update(game_id);
    }

    {
        let mut battles = state.battles.write().unwrap();
        if let Some(battle) = battles.get_mut(&id) {
            battle.status = BattleStatus::Completed;
            battle.winner = winner;
        }
    }
    tracing::info!(battle_id = id, "battle completed");

    Ok(Json(json!({
        "success": true,
        "defenderHealth": report.defender_health,
        "attackerStamina": report.attacker_stamina,
        "defenderDefeated": report.defender_defeated,
        "attackerDefeated": report.attacker_defeated,
    })))
}
