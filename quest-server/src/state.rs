//! Server state management
//!
//! In-memory stores for games, avatars, warriors, battles and assignments,
//! plus the broadcast channel that fans realtime updates out to websocket
//! clients.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;

use serde::Serialize;
use tokio::sync::broadcast;

use quest_core::assignments::Assignment;
use quest_core::battle::{Battle, Question};
use quest_core::game::GameBoard;
use quest_core::roster::{Avatar, Warrior};
use quest_core::{AssignmentId, AvatarId, BattleId, GameId, QuestionId, WarriorId};

/// Realtime event pushed to websocket clients
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateEvent {
    GameUpdate {
        #[serde(rename = "gameId")]
        game_id: GameId,
    },
}

/// Monotonic id source, one per record kind
#[derive(Debug)]
pub struct IdGen(AtomicU32);

impl IdGen {
    fn new() -> Self {
        Self(AtomicU32::new(1))
    }

    pub fn next(&self) -> u32 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Server-wide shared state
pub struct ServerState {
    pub games: RwLock<HashMap<GameId, GameBoard>>,
    pub avatars: RwLock<HashMap<AvatarId, Avatar>>,
    pub warriors: RwLock<HashMap<WarriorId, Warrior>>,
    pub battles: RwLock<HashMap<BattleId, Battle>>,
    pub questions: RwLock<HashMap<QuestionId, Question>>,
    pub assignments: RwLock<HashMap<AssignmentId, Assignment>>,
    pub game_ids: IdGen,
    pub avatar_ids: IdGen,
    pub warrior_ids: IdGen,
    pub battle_ids: IdGen,
    pub question_ids: IdGen,
    pub assignment_ids: IdGen,
    pub updates: broadcast::Sender<UpdateEvent>,
}

impl ServerState {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(64);
        Self {
            games: RwLock::new(HashMap::new()),
            avatars: RwLock::new(HashMap::new()),
            warriors: RwLock::new(HashMap::new()),
            battles: RwLock::new(HashMap::new()),
            questions: RwLock::new(HashMap::new()),
            assignments: RwLock::new(HashMap::new()),
            game_ids: IdGen::new(),
            avatar_ids: IdGen::new(),
            warrior_ids: IdGen::new(),
            battle_ids: IdGen::new(),
            question_ids: IdGen::new(),
            assignment_ids: IdGen::new(),
            updates,
        }
    }

    /// Notify websocket clients that a game's board changed. Nobody
    /// listening is fine.
    pub fn broadcast_game_update(&self, game_id: GameId) {
        let _ = self.updates.send(UpdateEvent::GameUpdate { game_id });
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_gen_starts_at_one() {
        let ids = IdGen::new();
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);
    }

    #[test]
    fn test_game_update_event_shape() {
        let event = UpdateEvent::GameUpdate { game_id: 7 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "game_update");
        assert_eq!(json["gameId"], 7);
    }
}
