//! Demo class generation for local development

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use quest_core::game::GameBoard;
use quest_core::roster::{random_avatar, random_warrior, WarriorStatus};
use quest_server::ServerState;

const STUDENT_NAMES: &[&str] = &[
    "Ana", "Luis", "Sofia", "Diego", "Carmen", "Mateo", "Lucia", "Pablo", "Elena", "Javier",
    "Marta", "Hugo", "Paula", "Adrian", "Clara", "Ivan",
];

/// Build a server state holding a demo class: avatars with a few owned
/// warriors, store stock and one open game everyone participates in.
pub fn build_demo_state(students: usize, seed: u64) -> ServerState {
    let state = ServerState::new();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut avatar_ids = Vec::new();
    {
        let mut avatars = state.avatars.write().unwrap();
        let mut warriors = state.warriors.write().unwrap();

        for i in 0..students {
            let name = STUDENT_NAMES[i % STUDENT_NAMES.len()];
            let id = state.avatar_ids.next();
            avatars.insert(id, random_avatar(&mut rng, id, name));
            avatar_ids.push(id);

            for _ in 0..rng.gen_range(1..=2) {
                let warrior_id = state.warrior_ids.next();
                let mut warrior = random_warrior(&mut rng, warrior_id, WarriorStatus::Warrior);
                warrior.avatar_id = Some(id);
                warriors.insert(warrior_id, warrior);
            }
        }

        // store stock shared by the class
        for _ in 0..8 {
            let warrior_id = state.warrior_ids.next();
            warriors.insert(
                warrior_id,
                random_warrior(&mut rng, warrior_id, WarriorStatus::Store),
            );
        }
    }

    {
        let game_id = state.game_ids.next();
        // dimensions are in range, the board always builds
        if let Ok(mut game) = GameBoard::new(game_id, "Demo Class", 8, 8, Utc::now()) {
            game.turn_order = avatar_ids;
            state.games.write().unwrap().insert(game_id, game);
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_state_counts() {
        let state = build_demo_state(5, 7);
        assert_eq!(state.avatars.read().unwrap().len(), 5);
        let warriors = state.warriors.read().unwrap();
        let stock = warriors
            .values()
            .filter(|w| w.status == WarriorStatus::Store)
            .count();
        assert_eq!(stock, 8);
        let owned = warriors
            .values()
            .filter(|w| w.status == WarriorStatus::Warrior)
            .count();
        assert!(owned >= 5);

        let games = state.games.read().unwrap();
        assert_eq!(games.len(), 1);
        let game = games.values().next().unwrap();
        assert_eq!(game.turn_order.len(), 5);
        assert_eq!(game.cell_count(), 64);
    }

    #[test]
    fn test_demo_state_deterministic() {
        let a = build_demo_state(3, 9);
        let b = build_demo_state(3, 9);
        let names = |s: &ServerState| {
            let mut list: Vec<String> = s
                .avatars
                .read()
                .unwrap()
                .values()
                .map(|a| a.avatar_name.clone())
                .collect();
            list.sort();
            list
        };
        assert_eq!(names(&a), names(&b));
    }
}
