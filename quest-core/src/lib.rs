//! Spanish Quest Core - Classroom game engine
//!
//! This crate provides the core logic for Spanish Quest:
//! - Grid geometry (letter-row / number-column cell labels)
//! - The turn-based placement game (board, turn clock, movement rules)
//! - Client-side interaction models (turn clock poller, board controller)
//! - Avatars, warrior assets, store purchases and battles
//! - Assignment records and vocabulary content authoring

pub mod assignments;
pub mod battle;
pub mod clock;
pub mod controller;
pub mod game;
pub mod grid;
pub mod roster;
pub mod store;
pub mod vocab;

/// Avatar identifier
pub type AvatarId = u32;
/// Warrior asset identifier
pub type WarriorId = u32;
/// Game identifier
pub type GameId = u32;
/// Battle identifier
pub type BattleId = u32;
/// Battle question identifier
pub type QuestionId = u32;
/// Assignment identifier
pub type AssignmentId = u32;

// Re-exports for convenient access
pub use clock::{ClockSignal, TurnClock};
pub use controller::{BoardController, ClickOutcome, Selection};
pub use game::{Cell, GameBoard, GameError, TurnAdvance};
pub use grid::{chebyshev, Coord, MAX_DIM};
pub use roster::{Avatar, Warrior, WarriorStatus};
