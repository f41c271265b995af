//! Board and rules engine for the 4D grid (state, line catalogue, move legality).

pub mod lines;
pub mod rules;
pub mod state;

pub use lines::{catalogue, LineSpec, LINE_LENGTH};
pub use rules::{MoveOutcome, RuleEngine, RuleError, WinCheck, WinLine};
pub use state::{
    Cell, Coord, GameMode, GameState, IntegrityError, Mark, Slice, Winner, FUTURE, GRID_SIZE, PAST,
    PRESENT, TIME_SLICES,
};
