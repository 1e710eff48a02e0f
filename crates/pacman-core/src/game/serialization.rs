use super::layout::{LayoutError, parse_terrain, render_terrain};
use super::maze::{MazeState, Outcome};
use super::state::GameState;
use crate::model::position::Position;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MazeSnapshot {
    /// Walls and food, top row first.
    pub terrain: Vec<String>,
    pub pacman: Position,
    pub ghosts: Vec<Position>,
    pub score: f64,
    #[serde(default)]
    pub outcome: Outcome,
}

impl MazeSnapshot {
    pub fn capture(state: &MazeState) -> Self {
        MazeSnapshot {
            terrain: render_terrain(state.walls(), state.food()),
            pacman: state.pacman_position(),
            ghosts: state.ghost_positions().to_vec(),
            score: state.score(),
            outcome: state.outcome(),
        }
    }

    pub fn restore(self) -> Result<MazeState, LayoutError> {
        let terrain = parse_terrain(&self.terrain)?;
        Ok(MazeState::from_parts(
            Arc::new(terrain.walls),
            terrain.food,
            self.pacman,
            self.ghosts,
            self.score,
            self.outcome,
        ))
    }

    pub fn to_json(state: &MazeState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
