use serde::{Deserialize, Serialize};

use super::lines::{catalogue, LineSpec, LINE_LENGTH};
use super::state::{Coord, GameMode, GameState, IntegrityError, Mark, Winner};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    GameFinished,
    InvalidTimeSlice { slice: usize },
    InvalidPosition { x: usize, y: usize, z: usize },
    CellOccupied { occupant: Mark },
    IntegrityViolation { error: IntegrityError },
}

/// The three cells of a completed line, in walk order.
pub type WinLine = [Coord; LINE_LENGTH];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinCheck {
    pub winner: Mark,
    pub line: WinLine,
}

/// Result of an accepted move. `winner` is set only when this move ended
/// the game; `winning_line` only when it did so by completing a line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_line: Option<WinLine>,
}

impl MoveOutcome {
    fn ongoing() -> Self {
        Self {
            winner: None,
            winning_line: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Applies the current player's mark at (x, y, z) in `time_slice`
    /// (defaulting to the state's current slice). Validation precedes
    /// mutation: on any error the board is untouched.
    pub fn make_move(
        &mut self,
        state: &mut GameState,
        x: usize,
        y: usize,
        z: usize,
        time_slice: Option<usize>,
    ) -> Result<MoveOutcome, RuleError> {
        if state.is_finished() {
            return Err(RuleError::GameFinished);
        }
        Self::ensure_integrity(state)?;

        let t = time_slice.unwrap_or(state.current_time);
        if !state.is_valid_slice(t) {
            return Err(RuleError::InvalidTimeSlice { slice: t });
        }
        if !state.is_valid_position(x, y, z) {
            return Err(RuleError::InvalidPosition { x, y, z });
        }
        let coord = Coord::new(x, y, z, t);
        if let Some(occupant) = state.cell(coord) {
            return Err(RuleError::CellOccupied { occupant });
        }

        let mover = state.current_player;
        state.place(coord, mover);

        if state.mode == GameMode::Time && t < state.current_time {
            self.resolve_time_paradox(state, t);
        }

        if let Some(win) = Self::check_win(state) {
            state.winner = Some(win.winner.into());
            state.game_over = true;
            return Ok(MoveOutcome {
                winner: state.winner,
                winning_line: Some(win.line),
            });
        }

        if Self::check_draw(state) {
            state.winner = Some(Winner::Draw);
            state.game_over = true;
            return Ok(MoveOutcome {
                winner: Some(Winner::Draw),
                winning_line: None,
            });
        }

        state.current_player = mover.opponent();
        Ok(MoveOutcome::ongoing())
    }

    /// Scans the mode's line catalogue and returns the first completed
    /// line. The catalogue order is fixed, so repeated calls on an
    /// unmutated state always agree.
    pub fn check_win(state: &GameState) -> Option<WinCheck> {
        catalogue(state.mode)
            .iter()
            .find_map(|spec| Self::check_line(state, spec))
    }

    pub fn check_draw(state: &GameState) -> bool {
        state.is_full()
    }

    fn ensure_integrity(state: &GameState) -> Result<(), RuleError> {
        state
            .integrity_check()
            .map_err(|error| RuleError::IntegrityViolation { error })
    }

    /// Hook for recomputing later slices after a move into the past.
    /// Deliberately a no-op: editing history registers the mark but does
    /// not ripple into symbols already placed in later slices.
    fn resolve_time_paradox(&mut self, _state: &mut GameState, _changed_slice: usize) {}

    fn check_line(state: &GameState, spec: &LineSpec) -> Option<WinCheck> {
        let mut owner: Option<Mark> = None;
        let mut line: WinLine = [Coord::default(); LINE_LENGTH];

        for (i, slot) in line.iter_mut().enumerate() {
            let [x, y, z, t] = spec.cell(i);
            if t < 0 || !state.is_valid_slice(t as usize) {
                return None;
            }
            if x < 0 || y < 0 || z < 0 {
                return None;
            }
            let (x, y, z) = (x as usize, y as usize, z as usize);
            if !state.is_valid_position(x, y, z) {
                return None;
            }

            let coord = Coord::new(x, y, z, t as usize);
            let mark = state.cell(coord)?;
            match owner {
                None => owner = Some(mark),
                Some(first) if first != mark => return None,
                Some(_) => {}
            }
            *slot = coord;
        }

        owner.map(|winner| WinCheck { winner, line })
    }
}
