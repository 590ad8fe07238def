//! Game boards: cells, warrior placement and the shared turn clock

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{chebyshev, coords, Coord, MAX_DIM};
use crate::{AvatarId, BattleId, GameId, WarriorId};

/// Default length of a turn in seconds
pub const DEFAULT_TURN_SECS: i64 = 20;
/// Default cell background color
pub const DEFAULT_BACKGROUND: &str = "#3a3a3a";
/// Fraction of the turn that must elapse before the turn may advance.
/// Keeps concurrent clients from double-advancing the same turn.
pub const ADVANCE_THRESHOLD: f64 = 0.90;

/// Maximum length of a cell status string
pub const MAX_STATUS_LEN: usize = 20;

#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("board dimensions must be between 1 and {MAX_DIM}")]
    BadDimensions,
    #[error("unknown cell {0}")]
    UnknownCell(String),
    #[error("cell is not active")]
    InactiveCell,
    #[error("cell is already occupied")]
    Occupied,
    #[error("warrior is not on that cell")]
    NotOnCell,
    #[error("move of distance {distance} exceeds warrior range {limit}")]
    OutOfRange { distance: u32, limit: u32 },
    #[error("game has no participants")]
    NoParticipants,
    #[error("avatar {0} is not a participant of this game")]
    NotAParticipant(AvatarId),
}

/// One grid cell. Cells carry display state and at most one warrior.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub cell_id: String,
    pub name: String,
    pub description: String,
    pub background: String,
    pub active: bool,
    pub element: String,
    pub occupied_by: Option<WarriorId>,
    pub status: String,
}

impl Cell {
    fn new(coord: Coord) -> Self {
        Self {
            cell_id: coord.label(),
            name: String::new(),
            description: String::new(),
            background: DEFAULT_BACKGROUND.to_string(),
            active: true,
            element: String::new(),
            occupied_by: None,
            status: String::new(),
        }
    }
}

/// Fields of a cell a client may edit
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub background: Option<String>,
    pub active: Option<bool>,
    pub element: Option<String>,
    pub status: Option<String>,
}

/// Result of asking the board to advance its turn
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurnAdvance {
    /// The turn moved to a new participant
    Advanced {
        new_index: usize,
        started: DateTime<Utc>,
    },
    /// Less than the threshold fraction of the turn has elapsed; the request
    /// is treated as a duplicate and ignored
    NotReady { elapsed: i64, required: i64 },
}

/// A turn-based game board shared by a class
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameBoard {
    pub id: GameId,
    pub name: String,
    pub thumbnail: String,
    pub rows: u16,
    pub columns: u16,
    pub current_turn_index: usize,
    pub turn_start_time: Option<DateTime<Utc>>,
    /// Turn length in seconds
    pub turn_duration: i64,
    pub battle_id: Option<BattleId>,
    pub created_at: DateTime<Utc>,
    /// Participating avatars in turn order
    #[serde(rename = "avatars")]
    pub turn_order: Vec<AvatarId>,
    #[serde(skip)]
    cells: FxHashMap<Coord, Cell>,
}

impl GameBoard {
    /// Create a board with every cell active on the default background
    pub fn new(
        id: GameId,
        name: &str,
        rows: u16,
        columns: u16,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GameError> {
        if rows == 0 || columns == 0 || rows > MAX_DIM || columns > MAX_DIM {
            return Err(GameError::BadDimensions);
        }
        let cells = coords(rows, columns)
            .map(|coord| (coord, Cell::new(coord)))
            .collect();
        Ok(Self {
            id,
            name: name.to_string(),
            thumbnail: String::new(),
            rows,
            columns,
            current_turn_index: 0,
            turn_start_time: None,
            turn_duration: DEFAULT_TURN_SECS,
            battle_id: None,
            created_at,
            turn_order: Vec::new(),
            cells,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Look up a cell by its label, erroring on unknown labels
    pub fn resolve(&self, label: &str) -> Result<Coord, GameError> {
        Coord::parse(label)
            .filter(|c| self.cells.contains_key(c))
            .ok_or_else(|| GameError::UnknownCell(label.to_string()))
    }

    /// All cells sorted by label, the order clients render them in
    pub fn cells_sorted(&self) -> Vec<&Cell> {
        let mut cells: Vec<&Cell> = self.cells.values().collect();
        cells.sort_by(|a, b| a.cell_id.cmp(&b.cell_id));
        cells
    }

    /// Apply a client edit to a cell. Status strings are truncated to
    /// [`MAX_STATUS_LEN`] characters.
    pub fn update_cell(&mut self, coord: Coord, patch: CellPatch) -> Result<&Cell, GameError> {
        let cell = self
            .cells
            .get_mut(&coord)
            .ok_or_else(|| GameError::UnknownCell(coord.label()))?;
        if let Some(name) = patch.name {
            cell.name = name;
        }
        if let Some(description) = patch.description {
            cell.description = description;
        }
        if let Some(background) = patch.background {
            cell.background = background;
        }
        if let Some(active) = patch.active {
            cell.active = active;
        }
        if let Some(element) = patch.element {
            cell.element = element;
        }
        if let Some(status) = patch.status {
            // truncate on a char boundary
            cell.status = status.chars().take(MAX_STATUS_LEN).collect();
        }
        Ok(cell)
    }

    /// Place a warrior on an empty active cell
    pub fn place_warrior(&mut self, coord: Coord, warrior: WarriorId) -> Result<(), GameError> {
        let cell = self
            .cells
            .get_mut(&coord)
            .ok_or_else(|| GameError::UnknownCell(coord.label()))?;
        if !cell.active {
            return Err(GameError::InactiveCell);
        }
        if cell.occupied_by.is_some() {
            return Err(GameError::Occupied);
        }
        cell.occupied_by = Some(warrior);
        cell.status = "warrior".to_string();
        Ok(())
    }

    /// Move a warrior between cells. The Chebyshev distance of the move must
    /// not exceed the warrior's level.
    pub fn move_warrior(
        &mut self,
        from: Coord,
        to: Coord,
        warrior: WarriorId,
        level: u32,
    ) -> Result<(), GameError> {
        let source = self
            .cells
            .get(&from)
            .ok_or_else(|| GameError::UnknownCell(from.label()))?;
        if source.occupied_by != Some(warrior) {
            return Err(GameError::NotOnCell);
        }
        let distance = chebyshev(from, to);
        if distance > level {
            return Err(GameError::OutOfRange {
                distance,
                limit: level,
            });
        }
        {
            let dest = self
                .cells
                .get(&to)
                .ok_or_else(|| GameError::UnknownCell(to.label()))?;
            if !dest.active {
                return Err(GameError::InactiveCell);
            }
            if dest.occupied_by.is_some() {
                return Err(GameError::Occupied);
            }
        }
        if let Some(source) = self.cells.get_mut(&from) {
            source.occupied_by = None;
            source.status.clear();
        }
        if let Some(dest) = self.cells.get_mut(&to) {
            dest.occupied_by = Some(warrior);
            dest.status = "warrior".to_string();
        }
        Ok(())
    }

    /// Remove a warrior from whichever cell it occupies, resetting that
    /// cell's status. Used when a warrior falls in battle.
    pub fn evict_warrior(&mut self, warrior: WarriorId) {
        for cell in self.cells.values_mut() {
            if cell.occupied_by == Some(warrior) {
                cell.occupied_by = None;
                cell.status = "active".to_string();
            }
        }
    }

    /// The avatar whose turn it currently is
    pub fn current_avatar(&self) -> Option<AvatarId> {
        self.turn_order.get(self.current_turn_index).copied()
    }

    /// Seconds remaining in the current turn, clamped at zero
    pub fn remaining(&self, now: DateTime<Utc>) -> i64 {
        match self.turn_start_time {
            Some(started) => (self.turn_duration - (now - started).num_seconds()).max(0),
            None => self.turn_duration,
        }
    }

    /// Advance to the next participant's turn.
    ///
    /// The advance only happens once at least [`ADVANCE_THRESHOLD`] of the
    /// turn has elapsed, so several clients polling the same clock cannot
    /// skip a participant. A not-ready request is not an error.
    pub fn advance_turn(&mut self, now: DateTime<Utc>) -> Result<TurnAdvance, GameError> {
        if self.turn_order.is_empty() {
            return Err(GameError::NoParticipants);
        }
        if let Some(started) = self.turn_start_time {
            let elapsed = (now - started).num_seconds();
            let required = (self.turn_duration as f64 * ADVANCE_THRESHOLD) as i64;
            if elapsed < required {
                return Ok(TurnAdvance::NotReady { elapsed, required });
            }
        }
        self.current_turn_index = (self.current_turn_index + 1) % self.turn_order.len();
        self.turn_start_time = Some(now);
        Ok(TurnAdvance::Advanced {
            new_index: self.current_turn_index,
            started: now,
        })
    }

    /// Hand the turn directly to a specific participant
    pub fn set_turn(&mut self, avatar: AvatarId, now: DateTime<Utc>) -> Result<usize, GameError> {
        let index = self
            .turn_order
            .iter()
            .position(|&a| a == avatar)
            .ok_or(GameError::NotAParticipant(avatar))?;
        self.current_turn_index = index;
        self.turn_start_time = Some(now);
        Ok(index)
    }
}
