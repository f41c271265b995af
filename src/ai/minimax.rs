use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{Coord, GameMode, GameState, Mark, RuleEngine, GRID_SIZE};

const WIN_SCORE: i32 = 10;

/// Search depth for the exhaustive tier. The time-mode branching factor is
/// three times larger, so its depth is capped lower.
fn search_depth(mode: GameMode) -> u8 {
    match mode {
        GameMode::Time => 3,
        GameMode::Normal => 5,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Easy,
    Medium,
    Hard,
    Impossible,
}

impl Default for AiDifficulty {
    fn default() -> Self {
        AiDifficulty::Medium
    }
}

impl FromStr for AiDifficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(AiDifficulty::Easy),
            "medium" | "normal" => Ok(AiDifficulty::Medium),
            "hard" => Ok(AiDifficulty::Hard),
            "impossible" | "perfect" => Ok(AiDifficulty::Impossible),
            _ => Err(()),
        }
    }
}

/// Outcome of one `select_move` call. `position` is `None` only when the
/// board has no empty cell left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiDecision {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Coord>,
    pub difficulty: AiDifficulty,
    pub nodes: u64,
}

struct SearchStats {
    nodes: u64,
}

impl SearchStats {
    fn new() -> Self {
        Self { nodes: 0 }
    }
}

pub struct AiAgent {
    difficulty: AiDifficulty,
    symbol: Mark,
    rng: SmallRng,
}

impl AiAgent {
    pub fn new(difficulty: AiDifficulty) -> Self {
        Self {
            difficulty,
            symbol: Mark::O,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(difficulty: AiDifficulty, seed: u64) -> Self {
        Self {
            difficulty,
            symbol: Mark::O,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn with_symbol(mut self, symbol: Mark) -> Self {
        self.symbol = symbol;
        self
    }

    pub fn symbol(&self) -> Mark {
        self.symbol
    }

    pub fn select_move(&mut self, state: &GameState) -> AiDecision {
        let mut stats = SearchStats::new();
        let position = match self.difficulty {
            AiDifficulty::Easy => self.random_move(state),
            AiDifficulty::Medium => {
                if self.rng.gen_bool(0.5) {
                    self.random_move(state)
                } else {
                    self.priority_move(state)
                }
            }
            AiDifficulty::Hard => self.priority_move(state),
            AiDifficulty::Impossible => self.minimax_move(state, &mut stats),
        };
        AiDecision {
            position,
            difficulty: self.difficulty,
            nodes: stats.nodes,
        }
    }

    /// Uniform choice among all empty cells across every time slice.
    fn random_move(&mut self, state: &GameState) -> Option<Coord> {
        state.empty_cells().choose(&mut self.rng).copied()
    }

    /// Heuristic ladder: win now, block the opponent, take the centre of
    /// the current slice, take a corner of the current slice, else random.
    fn priority_move(&mut self, state: &GameState) -> Option<Coord> {
        if let Some(coord) = Self::winning_move(state, self.symbol) {
            return Some(coord);
        }
        if let Some(coord) = Self::winning_move(state, self.symbol.opponent()) {
            return Some(coord);
        }
        if let Some(coord) = Self::center_move(state) {
            return Some(coord);
        }
        if let Some(coord) = Self::corner_move(state) {
            return Some(coord);
        }
        self.random_move(state)
    }

    /// First empty cell, in enumeration order, where placing `mark` wins
    /// immediately. Trials run on a scratch board and every trial mark is
    /// removed again before the next one.
    fn winning_move(state: &GameState, mark: Mark) -> Option<Coord> {
        let mut scratch = state.clone();
        for coord in state.empty_cells() {
            scratch.place(coord, mark);
            let wins = RuleEngine::check_win(&scratch).is_some_and(|win| win.winner == mark);
            scratch.clear(coord);
            if wins {
                return Some(coord);
            }
        }
        None
    }

    fn center_move(state: &GameState) -> Option<Coord> {
        let mid = GRID_SIZE / 2;
        let coord = Coord::new(mid, mid, mid, state.current_time);
        state.cell(coord).is_none().then_some(coord)
    }

    fn corner_move(state: &GameState) -> Option<Coord> {
        const CORNERS: [[usize; 3]; 8] = [
            [0, 0, 0],
            [0, 0, 2],
            [0, 2, 0],
            [0, 2, 2],
            [2, 0, 0],
            [2, 0, 2],
            [2, 2, 0],
            [2, 2, 2],
        ];
        CORNERS.into_iter().find_map(|[x, y, z]| {
            let coord = Coord::new(x, y, z, state.current_time);
            state.cell(coord).is_none().then_some(coord)
        })
    }

    fn minimax_move(&mut self, state: &GameState, stats: &mut SearchStats) -> Option<Coord> {
        let depth = search_depth(state.mode);
        let mut scratch = state.clone();
        let mut best: Option<Coord> = None;
        let mut best_score = i32::MIN;

        for coord in state.empty_cells() {
            scratch.place(coord, self.symbol);
            let score = self.minimax(&mut scratch, depth - 1, i32::MIN, i32::MAX, false, stats);
            scratch.clear(coord);

            if score > best_score {
                best_score = score;
                best = Some(coord);
            }
        }

        best.or_else(|| self.random_move(state))
    }

    fn minimax(
        &self,
        scratch: &mut GameState,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        stats: &mut SearchStats,
    ) -> i32 {
        stats.nodes += 1;

        if let Some(win) = RuleEngine::check_win(scratch) {
            // Prefer faster wins and slower losses.
            let magnitude = WIN_SCORE + depth as i32;
            return if win.winner == self.symbol {
                magnitude
            } else {
                -magnitude
            };
        }

        let moves = scratch.empty_cells();
        if depth == 0 || moves.is_empty() {
            return 0;
        }

        if maximizing {
            let mut value = i32::MIN;
            for coord in moves {
                scratch.place(coord, self.symbol);
                let score = self.minimax(scratch, depth - 1, alpha, beta, false, stats);
                scratch.clear(coord);

                value = value.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            value
        } else {
            let mut value = i32::MAX;
            for coord in moves {
                scratch.place(coord, self.symbol.opponent());
                let score = self.minimax(scratch, depth - 1, alpha, beta, true, stats);
                scratch.clear(coord);

                value = value.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameMode;

    fn state_with(marks: &[(usize, usize, usize, usize, Mark)], mode: GameMode) -> GameState {
        let mut state = GameState::new(mode);
        for &(x, y, z, t, mark) in marks {
            state.place(Coord::new(x, y, z, t), mark);
        }
        state
    }

    #[test]
    fn easy_returns_the_only_empty_cell() {
        let mut state = GameState::new(GameMode::Normal);
        let last = Coord::new(1, 2, 0, 0);
        for coord in state.empty_cells() {
            if coord != last {
                state.place(coord, Mark::X);
            }
        }

        let mut agent = AiAgent::with_seed(AiDifficulty::Easy, 7);
        let decision = agent.select_move(&state);
        assert_eq!(decision.position, Some(last));
    }

    #[test]
    fn no_move_is_reported_on_a_full_board() {
        let mut state = GameState::new(GameMode::Normal);
        for coord in state.empty_cells() {
            state.place(coord, Mark::X);
        }

        for difficulty in [
            AiDifficulty::Easy,
            AiDifficulty::Medium,
            AiDifficulty::Hard,
            AiDifficulty::Impossible,
        ] {
            let mut agent = AiAgent::with_seed(difficulty, 1);
            assert!(agent.select_move(&state).position.is_none(), "{difficulty:?}");
        }
    }

    #[test]
    fn hard_takes_an_immediate_win() {
        // O can complete the x = 0 column at (0, 2, 0).
        let state = state_with(
            &[
                (0, 0, 0, 0, Mark::O),
                (0, 1, 0, 0, Mark::O),
                (1, 0, 0, 0, Mark::X),
                (1, 1, 0, 0, Mark::X),
            ],
            GameMode::Normal,
        );
        let mut agent = AiAgent::with_seed(AiDifficulty::Hard, 3);
        let decision = agent.select_move(&state);
        assert_eq!(decision.position, Some(Coord::new(0, 2, 0, 0)));
    }

    #[test]
    fn hard_blocks_the_opponents_win() {
        let state = state_with(
            &[
                (0, 0, 0, 0, Mark::X),
                (1, 0, 0, 0, Mark::X),
                (2, 2, 2, 0, Mark::O),
            ],
            GameMode::Normal,
        );
        let mut agent = AiAgent::with_seed(AiDifficulty::Hard, 3);
        let decision = agent.select_move(&state);
        assert_eq!(decision.position, Some(Coord::new(2, 0, 0, 0)));
    }

    #[test]
    fn hard_prefers_the_centre_of_the_current_slice() {
        let state = GameState::new(GameMode::Time);
        let mut agent = AiAgent::with_seed(AiDifficulty::Hard, 3);
        let decision = agent.select_move(&state);
        assert_eq!(decision.position, Some(Coord::new(1, 1, 1, state.current_time)));
    }

    #[test]
    fn hard_falls_back_to_corners_once_the_centre_is_taken() {
        let state = state_with(&[(1, 1, 1, 0, Mark::X)], GameMode::Normal);
        let mut agent = AiAgent::with_seed(AiDifficulty::Hard, 3);
        let decision = agent.select_move(&state);
        assert_eq!(decision.position, Some(Coord::new(0, 0, 0, 0)));
    }

    #[test]
    fn impossible_takes_an_immediate_win() {
        let state = state_with(
            &[
                (0, 0, 0, 0, Mark::O),
                (1, 1, 1, 0, Mark::O),
                (0, 1, 0, 0, Mark::X),
                (0, 2, 0, 0, Mark::X),
            ],
            GameMode::Normal,
        );
        let mut agent = AiAgent::with_seed(AiDifficulty::Impossible, 11);
        let decision = agent.select_move(&state);
        assert_eq!(decision.position, Some(Coord::new(2, 2, 2, 0)));
        assert!(decision.nodes > 0);
    }

    #[test]
    fn impossible_searches_every_slice_in_time_mode() {
        // O can win on the temporal line through (0, 0, 0).
        let state = state_with(
            &[
                (0, 0, 0, 0, Mark::O),
                (0, 0, 0, 1, Mark::O),
                (2, 0, 0, 1, Mark::X),
                (2, 1, 0, 1, Mark::X),
            ],
            GameMode::Time,
        );
        let mut agent = AiAgent::with_seed(AiDifficulty::Impossible, 11);
        let decision = agent.select_move(&state);
        assert_eq!(decision.position, Some(Coord::new(0, 0, 0, 2)));
    }

    #[test]
    fn trial_moves_never_leak_into_the_caller_state() {
        let state = state_with(
            &[(0, 0, 0, 0, Mark::X), (1, 0, 0, 0, Mark::X)],
            GameMode::Normal,
        );
        let before = state.clone();
        let mut agent = AiAgent::with_seed(AiDifficulty::Impossible, 5);
        agent.select_move(&state);
        assert_eq!(state, before);
    }

    #[test]
    fn medium_always_returns_a_legal_cell() {
        let state = state_with(&[(1, 1, 1, 1, Mark::X)], GameMode::Time);
        for seed in 0..8 {
            let mut agent = AiAgent::with_seed(AiDifficulty::Medium, seed);
            let coord = agent
                .select_move(&state)
                .position
                .expect("moves are available");
            assert!(state.cell(coord).is_none());
        }
    }

    #[test]
    fn seeded_agents_are_deterministic() {
        let state = GameState::new(GameMode::Time);
        let a = AiAgent::with_seed(AiDifficulty::Easy, 42).select_move(&state);
        let b = AiAgent::with_seed(AiDifficulty::Easy, 42).select_move(&state);
        assert_eq!(a.position, b.position);
    }

    #[test]
    fn difficulty_parses_from_ui_strings() {
        assert_eq!("easy".parse(), Ok(AiDifficulty::Easy));
        assert_eq!("Medium".parse(), Ok(AiDifficulty::Medium));
        assert_eq!("IMPOSSIBLE".parse(), Ok(AiDifficulty::Impossible));
        assert!("brutal".parse::<AiDifficulty>().is_err());
    }
}
