use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Spatial edge length of every slice. The grid is always 3x3x3.
pub const GRID_SIZE: usize = 3;
/// Number of time slices in time mode (past, present, future).
pub const TIME_SLICES: usize = 3;

pub const PAST: usize = 0;
pub const PRESENT: usize = 1;
pub const FUTURE: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Normal,
    Time,
}

impl GameMode {
    pub fn time_slices(self) -> usize {
        match self {
            GameMode::Normal => 1,
            GameMode::Time => TIME_SLICES,
        }
    }
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::Normal
    }
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" | "3d" => Ok(GameMode::Normal),
            "time" | "4d" => Ok(GameMode::Time),
            _ => Err(()),
        }
    }
}

/// A player's symbol on the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// Terminal outcome of a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Winner {
    X,
    O,
    #[serde(rename = "draw")]
    Draw,
}

impl From<Mark> for Winner {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Winner::X,
            Mark::O => Winner::O,
        }
    }
}

pub type Cell = Option<Mark>;

/// One 3x3x3 spatial sub-board at a fixed time index, indexed [z][y][x].
pub type Slice = [[[Cell; GRID_SIZE]; GRID_SIZE]; GRID_SIZE];

/// One lattice position (x, y, z, time slice).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    pub t: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize, z: usize, t: usize) -> Self {
        Self { x, y, z, t }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    SliceCountMismatch { expected: usize, actual: usize },
    CurrentTimeOutOfRange { value: usize },
    TerminalFlagMismatch,
}

/// Full game state. Serializing and deserializing this struct is the
/// snapshot contract used by the embedding application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub mode: GameMode,
    pub board: Vec<Slice>,
    pub current_player: Mark,
    pub current_time: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub game_over: bool,
}

impl GameState {
    pub fn new(mode: GameMode) -> Self {
        let empty_slice: Slice = [[[None; GRID_SIZE]; GRID_SIZE]; GRID_SIZE];
        Self {
            mode,
            board: vec![empty_slice; mode.time_slices()],
            current_player: Mark::X,
            current_time: match mode {
                GameMode::Normal => 0,
                GameMode::Time => PRESENT,
            },
            winner: None,
            game_over: false,
        }
    }

    pub fn time_slices(&self) -> usize {
        self.board.len()
    }

    pub fn is_valid_position(&self, x: usize, y: usize, z: usize) -> bool {
        x < GRID_SIZE && y < GRID_SIZE && z < GRID_SIZE
    }

    pub fn is_valid_slice(&self, t: usize) -> bool {
        t < self.time_slices()
    }

    pub fn cell(&self, coord: Coord) -> Cell {
        self.board[coord.t][coord.z][coord.y][coord.x]
    }

    pub fn place(&mut self, coord: Coord, mark: Mark) {
        self.board[coord.t][coord.z][coord.y][coord.x] = Some(mark);
    }

    /// Removes a mark again. Only trial search boards ever call this;
    /// accepted moves are permanent.
    pub fn clear(&mut self, coord: Coord) {
        self.board[coord.t][coord.z][coord.y][coord.x] = None;
    }

    /// Every empty cell across every time slice, in the fixed
    /// (t, z, y, x) enumeration order shared by all AI tiers.
    pub fn empty_cells(&self) -> Vec<Coord> {
        let mut cells = Vec::new();
        for (t, slice) in self.board.iter().enumerate() {
            for (z, layer) in slice.iter().enumerate() {
                for (y, row) in layer.iter().enumerate() {
                    for (x, cell) in row.iter().enumerate() {
                        if cell.is_none() {
                            cells.push(Coord::new(x, y, z, t));
                        }
                    }
                }
            }
        }
        cells
    }

    pub fn is_full(&self) -> bool {
        self.board
            .iter()
            .flatten()
            .flatten()
            .flatten()
            .all(|cell| cell.is_some())
    }

    pub fn is_finished(&self) -> bool {
        self.game_over
    }

    /// Structural validation for deserialized snapshots.
    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        let expected = self.mode.time_slices();
        if self.board.len() != expected {
            return Err(IntegrityError::SliceCountMismatch {
                expected,
                actual: self.board.len(),
            });
        }
        if self.current_time >= self.board.len() {
            return Err(IntegrityError::CurrentTimeOutOfRange {
                value: self.current_time,
            });
        }
        if self.game_over != self.winner.is_some() {
            return Err(IntegrityError::TerminalFlagMismatch);
        }
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameMode::Normal)
    }
}
