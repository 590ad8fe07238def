//! Battles between two warrior assets, fought with quiz questions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roster::Warrior;
use crate::{AvatarId, BattleId, GameId, QuestionId, WarriorId};

/// Penalty applied when a side answers incorrectly while the other side
/// also fails, and the stamina cost of a blocked attack
pub const FLAT_PENALTY: i32 = 25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    Pending,
    InProgress,
    Completed,
}

/// A scheduled or running battle
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battle {
    pub id: BattleId,
    pub name: String,
    pub reward: i64,
    pub status: BattleStatus,
    /// Attacking warrior asset
    pub attacker: WarriorId,
    /// Defending warrior asset
    pub defender: WarriorId,
    pub attacker_avatar_id: AvatarId,
    pub defender_avatar_id: AvatarId,
    pub game_id: Option<GameId>,
    /// Avatar that won, set when the battle completes
    pub winner: Option<AvatarId>,
    pub created_at: DateTime<Utc>,
}

/// A quiz question attached to a battle, answered by one side
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub battle_id: BattleId,
    pub prompt: String,
    pub answer: String,
    /// Which avatar must answer this question
    pub avatar_id: AvatarId,
    pub possible_points: i64,
    pub received_score: i64,
    /// Answer time limit in seconds
    pub time_limit: i64,
    pub response: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Question {
    pub fn is_answered(&self) -> bool {
        self.response.is_some()
    }

    /// Record a submitted answer
    pub fn submit(&mut self, response: &str, now: DateTime<Utc>) {
        self.response = Some(response.to_string());
        self.submitted_at = Some(now);
    }

    /// Case-insensitive comparison against the expected answer
    pub fn answered_correctly(&self) -> bool {
        match &self.response {
            Some(response) => response.trim().eq_ignore_ascii_case(self.answer.trim()),
            None => false,
        }
    }
}

/// Outcome of resolving a battle round
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BattleReport {
    pub defender_health: i32,
    pub attacker_stamina: i32,
    pub defender_defeated: bool,
    pub attacker_defeated: bool,
}

/// Resolve a battle from the two sides' answers.
///
/// Base damage scales the attacker's attack against the defender's defense:
/// `attack / defense * 100`. Both answer correctly: the defender blocks half.
/// Only the attacker: full damage. Only the defender: the attack is blocked
/// and costs the attacker stamina. Neither: both sides pay a flat penalty.
/// Health and stamina never go below zero. Defeat is keyed to health only;
/// running out of stamina is a penalty, not a defeat.
pub fn resolve(
    attacker: &Warrior,
    defender: &Warrior,
    attacker_correct: bool,
    defender_correct: bool,
) -> BattleReport {
    let base = attacker.attack as f64 / defender.defense.max(1) as f64 * 100.0;

    let mut defender_health = defender.health;
    let mut attacker_stamina = attacker.stamina;

    match (attacker_correct, defender_correct) {
        (true, true) => defender_health -= (base / 2.0) as i32,
        (true, false) => defender_health -= base as i32,
        (false, true) => attacker_stamina -= FLAT_PENALTY,
        (false, false) => {
            defender_health -= FLAT_PENALTY;
            attacker_stamina -= FLAT_PENALTY;
        }
    }

    defender_health = defender_health.max(0);
    attacker_stamina = attacker_stamina.max(0);

    BattleReport {
        defender_health,
        attacker_stamina,
        defender_defeated: defender_health == 0,
        attacker_defeated: attacker.health <= 0,
    }
}
