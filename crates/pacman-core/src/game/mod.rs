pub mod layout;
pub mod maze;
pub mod serialization;
pub mod state;

pub use layout::{Layout, LayoutError};
pub use maze::{MazeState, Outcome};
pub use serialization::MazeSnapshot;
pub use state::{GameState, StateSignature};
