pub mod direction;
pub mod grid;
pub mod position;

pub use direction::{Direction, MoveSet};
pub use grid::Grid;
pub use position::Position;
