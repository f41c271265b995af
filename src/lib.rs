pub mod ai;
pub mod game;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{AiAgent, AiDecision, AiDifficulty};
pub use game::{
    catalogue, Cell, Coord, GameMode, GameState, IntegrityError, LineSpec, Mark, MoveOutcome,
    RuleEngine, RuleError, Slice, WinCheck, WinLine, Winner, FUTURE, GRID_SIZE, LINE_LENGTH, PAST,
    PRESENT, TIME_SLICES,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
}

#[wasm_bindgen]
pub fn version() -> String {
    let message = format!("tictactime-core {}", env!("CARGO_PKG_VERSION"));
    web_sys::console::log_1(&message.clone().into());
    message
}

fn to_js_error(error: RuleError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_mode(mode: Option<String>) -> Result<GameMode, JsValue> {
    match mode {
        None => Ok(GameMode::default()),
        Some(value) => GameMode::from_str(&value)
            .map_err(|_| JsValue::from_str(&format!("unknown game mode: {value}"))),
    }
}

fn parse_difficulty(difficulty: Option<String>) -> Result<AiDifficulty, JsValue> {
    match difficulty {
        None => Ok(AiDifficulty::default()),
        Some(value) => AiDifficulty::from_str(&value)
            .map_err(|_| JsValue::from_str(&format!("unknown difficulty: {value}"))),
    }
}

/// A state transition as seen by the frontend: the updated snapshot plus
/// what the move produced.
#[derive(Serialize)]
struct MoveResolution {
    state: GameState,
    outcome: MoveOutcome,
}

#[derive(Serialize)]
struct AiMoveResponse {
    decision: AiDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<MoveOutcome>,
}

/// Stateful handle owning one match, for frontends that prefer not to
/// shuttle the whole snapshot across the boundary on every call.
#[wasm_bindgen]
pub struct GameEngine {
    state: GameState,
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(mode: Option<String>) -> Result<GameEngine, JsValue> {
        let mode = parse_mode(mode)?;
        Ok(GameEngine {
            state: GameState::new(mode),
        })
    }

    #[wasm_bindgen(js_name = fromSnapshot)]
    pub fn from_snapshot(json: &str) -> Result<GameEngine, JsValue> {
        let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        state
            .integrity_check()
            .map_err(|error| to_js_error(RuleError::IntegrityViolation { error }))?;
        Ok(GameEngine { state })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        self.state = state;
        Ok(())
    }

    pub fn make_move(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        time_slice: Option<usize>,
    ) -> Result<String, JsValue> {
        let mut engine = RuleEngine::new();
        let outcome = engine
            .make_move(&mut self.state, x, y, z, time_slice)
            .map_err(to_js_error)?;
        serde_json::to_string(&outcome).map_err(serde_to_js_error)
    }

    pub fn check_win(&self) -> Result<JsValue, JsValue> {
        to_value(&RuleEngine::check_win(&self.state)).map_err(JsValue::from)
    }

    pub fn check_draw(&self) -> bool {
        RuleEngine::check_draw(&self.state)
    }

    /// Selects a move for the player whose turn it is and applies it.
    /// Applies nothing when the board is full.
    pub fn apply_ai_move(&mut self, difficulty: Option<String>) -> Result<String, JsValue> {
        let difficulty = parse_difficulty(difficulty)?;
        let mut agent = AiAgent::new(difficulty).with_symbol(self.state.current_player);
        let decision = agent.select_move(&self.state);

        let applied = match decision.position {
            Some(coord) => {
                let mut engine = RuleEngine::new();
                let outcome = engine
                    .make_move(&mut self.state, coord.x, coord.y, coord.z, Some(coord.t))
                    .map_err(to_js_error)?;
                Some(outcome)
            }
            None => None,
        };

        let response = AiMoveResponse { decision, applied };
        serde_json::to_string(&response).map_err(serde_to_js_error)
    }

    /// Computes a move without applying it, resolving after an optional
    /// delay so the frontend can animate the opponent "thinking".
    pub fn think_ai(&self, difficulty: Option<String>, delay_ms: Option<u32>) -> Promise {
        let state = self.state.clone();
        let difficulty = difficulty.and_then(|value| AiDifficulty::from_str(&value).ok());
        let delay = delay_ms.unwrap_or(0);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let difficulty = difficulty.unwrap_or_default();
            let mut agent = AiAgent::new(difficulty).with_symbol(state.current_player);
            let decision = agent.select_move(&state);
            let json = serde_json::to_string(&decision).map_err(serde_to_js_error)?;
            Ok(JsValue::from_str(&json))
        })
    }
}

/// Returns a fresh game snapshot for the requested mode.
#[wasm_bindgen(js_name = "createGame")]
pub fn create_game(mode: Option<String>) -> Result<JsValue, JsValue> {
    let mode = parse_mode(mode)?;
    to_value(&GameState::new(mode)).map_err(JsValue::from)
}

/// Deep-copies a snapshot (used by the frontend for optimistic updates).
#[wasm_bindgen(js_name = "cloneGameState")]
pub fn clone_game_state(state: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    to_value(&state.clone()).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "makeMove")]
pub fn make_move(
    state: JsValue,
    x: usize,
    y: usize,
    z: usize,
    time_slice: Option<usize>,
) -> Result<JsValue, JsValue> {
    let mut state: GameState = from_value(state).map_err(JsValue::from)?;
    let mut engine = RuleEngine::new();
    match engine.make_move(&mut state, x, y, z, time_slice) {
        Ok(outcome) => to_value(&MoveResolution { state, outcome }).map_err(JsValue::from),
        Err(error) => Err(to_js_error(error)),
    }
}

#[wasm_bindgen(js_name = "checkWin")]
pub fn check_win(state: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    to_value(&RuleEngine::check_win(&state)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "checkDraw")]
pub fn check_draw(state: JsValue) -> Result<bool, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    Ok(RuleEngine::check_draw(&state))
}

#[wasm_bindgen(js_name = "validateState")]
pub fn validate_state(state: JsValue) -> Result<(), JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    state
        .integrity_check()
        .map_err(|error| to_js_error(RuleError::IntegrityViolation { error }))?;
    Ok(())
}

/// Selects a move for the current player without mutating the snapshot.
/// An optional seed makes the randomized tiers reproducible.
#[wasm_bindgen(js_name = "computeAiMove")]
pub fn compute_ai_move(
    state: JsValue,
    difficulty: Option<String>,
    seed: Option<u64>,
) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    let difficulty = parse_difficulty(difficulty)?;
    let agent = match seed {
        Some(seed) => AiAgent::with_seed(difficulty, seed),
        None => AiAgent::new(difficulty),
    };
    let mut agent = agent.with_symbol(state.current_player);
    let decision = agent.select_move(&state);
    to_value(&decision).map_err(JsValue::from)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
