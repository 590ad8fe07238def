//! Board interaction model.
//!
//! Tracks what the player has selected (a reserve warrior to place, or a
//! placed warrior to move) and turns cell clicks into requests the server
//! should receive. Range is checked here for instant feedback; the server
//! checks it again.

use crate::game::GameBoard;
use crate::grid::{chebyshev, Coord};
use crate::WarriorId;

/// Current selection state
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Selection {
    #[default]
    Idle,
    /// A reserve warrior is selected for placement
    Placing(WarriorId),
    /// A placed warrior is selected for a move
    Moving { warrior: WarriorId, from: Coord },
}

/// What a click resolved to
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClickOutcome {
    /// Selection changed, nothing to send
    Selected,
    /// Selection cleared, nothing to send
    Cancelled,
    /// Ask the server to place the warrior on the cell
    RequestPlace { cell: Coord, warrior: WarriorId },
    /// Ask the server to move the warrior
    RequestMove {
        from: Coord,
        to: Coord,
        warrior: WarriorId,
    },
    /// Clicked another player's warrior: show its details
    Inspect(WarriorId),
    /// Move refused locally for being out of range; selection kept
    Rejected { distance: u32, limit: u32 },
    /// Click had no meaning in the current state
    Ignored,
}

/// Drives selection state from clicks on the board and the reserve list
#[derive(Debug, Default)]
pub struct BoardController {
    selection: Selection,
}

impl BoardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Click a warrior in the reserve list. Clicking the selected warrior
    /// again deselects it.
    pub fn select_reserve(&mut self, warrior: WarriorId) -> ClickOutcome {
        if self.selection == Selection::Placing(warrior) {
            self.selection = Selection::Idle;
            ClickOutcome::Cancelled
        } else {
            self.selection = Selection::Placing(warrior);
            ClickOutcome::Selected
        }
    }

    /// Click a board cell. `owned` lists the player's warriors with their
    /// levels, which bound how far each can move.
    pub fn click_cell(
        &mut self,
        game: &GameBoard,
        coord: Coord,
        owned: &[(WarriorId, u32)],
    ) -> ClickOutcome {
        let Some(cell) = game.cell(coord) else {
            return ClickOutcome::Ignored;
        };

        if let Some(occupant) = cell.occupied_by {
            let ours = owned.iter().find(|(id, _)| *id == occupant);
            return match ours {
                Some(&(warrior, _)) => {
                    // toggle move selection on our own warrior
                    if self.selection == (Selection::Moving { warrior, from: coord }) {
                        self.selection = Selection::Idle;
                        ClickOutcome::Cancelled
                    } else {
                        self.selection = Selection::Moving { warrior, from: coord };
                        ClickOutcome::Selected
                    }
                }
                None => ClickOutcome::Inspect(occupant),
            };
        }

        if !cell.active {
            return ClickOutcome::Ignored;
        }

        match self.selection {
            Selection::Placing(warrior) => {
                self.selection = Selection::Idle;
                ClickOutcome::RequestPlace { cell: coord, warrior }
            }
            Selection::Moving { warrior, from } => {
                let limit = owned
                    .iter()
                    .find(|(id, _)| *id == warrior)
                    .map(|&(_, level)| level)
                    .unwrap_or(0);
                let distance = chebyshev(from, coord);
                if distance > limit {
                    // keep the selection so the player can pick a closer cell
                    return ClickOutcome::Rejected { distance, limit };
                }
                self.selection = Selection::Idle;
                ClickOutcome::RequestMove { from, to: coord, warrior }
            }
            Selection::Idle => ClickOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn board() -> GameBoard {
        GameBoard::new(1, "test", 5, 5, Utc::now()).unwrap()
    }

    fn at(label: &str) -> Coord {
        Coord::parse(label).unwrap()
    }

    #[test]
    fn test_reserve_toggle() {
        let mut ctl = BoardController::new();
        assert_eq!(ctl.select_reserve(7), ClickOutcome::Selected);
        assert_eq!(ctl.selection(), Selection::Placing(7));
        assert_eq!(ctl.select_reserve(7), ClickOutcome::Cancelled);
        assert_eq!(ctl.selection(), Selection::Idle);
    }

    #[test]
    fn test_place_flow() {
        let b = board();
        let mut ctl = BoardController::new();
        ctl.select_reserve(7);
        let outcome = ctl.click_cell(&b, at("B2"), &[(7, 2)]);
        assert_eq!(outcome, ClickOutcome::RequestPlace { cell: at("B2"), warrior: 7 });
        assert_eq!(ctl.selection(), Selection::Idle);
    }

    #[test]
    fn test_level_two_move_from_a1() {
        // a level-2 warrior on A1 may reach C3 but not D4
        let mut b = board();
        b.place_warrior(at("A1"), 7).unwrap();
        let owned = [(7, 2)];

        let mut ctl = BoardController::new();
        assert_eq!(ctl.click_cell(&b, at("A1"), &owned), ClickOutcome::Selected);

        let rejected = ctl.click_cell(&b, at("D4"), &owned);
        assert_eq!(rejected, ClickOutcome::Rejected { distance: 3, limit: 2 });
        // selection survives the rejection
        assert_eq!(ctl.selection(), Selection::Moving { warrior: 7, from: at("A1") });

        let accepted = ctl.click_cell(&b, at("C3"), &owned);
        assert_eq!(
            accepted,
            ClickOutcome::RequestMove { from: at("A1"), to: at("C3"), warrior: 7 }
        );
        assert_eq!(ctl.selection(), Selection::Idle);
    }

    #[test]
    fn test_click_own_warrior_twice_cancels() {
        let mut b = board();
        b.place_warrior(at("B2"), 7).unwrap();
        let mut ctl = BoardController::new();
        ctl.click_cell(&b, at("B2"), &[(7, 3)]);
        assert_eq!(ctl.click_cell(&b, at("B2"), &[(7, 3)]), ClickOutcome::Cancelled);
    }

    #[test]
    fn test_click_enemy_warrior_inspects() {
        let mut b = board();
        b.place_warrior(at("C3"), 99).unwrap();
        let mut ctl = BoardController::new();
        assert_eq!(ctl.click_cell(&b, at("C3"), &[(7, 3)]), ClickOutcome::Inspect(99));
        assert_eq!(ctl.selection(), Selection::Idle);
    }

    #[test]
    fn test_idle_click_ignored() {
        let b = board();
        let mut ctl = BoardController::new();
        assert_eq!(ctl.click_cell(&b, at("A1"), &[]), ClickOutcome::Ignored);
    }
}
