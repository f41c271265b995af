//! Computer opponent (difficulty tiers and the alpha-beta search).

pub mod minimax;

pub use minimax::{AiAgent, AiDecision, AiDifficulty};
