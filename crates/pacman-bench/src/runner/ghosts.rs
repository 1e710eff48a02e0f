use pacman_core::belief::TransitionMatrix;
use pacman_core::game::{GameState, MazeState};
use rand::Rng;

use crate::config::GhostPolicy;

/// Moves every ghost once, in index order, after Pacman's move.
pub(super) fn advance_ghosts<R: Rng + ?Sized>(
    policy: GhostPolicy,
    state: MazeState,
    motion: &TransitionMatrix,
    rng: &mut R,
) -> MazeState {
    let mut state = state;
    for ghost in 0..state.ghost_count() {
        if state.is_terminal() {
            break;
        }
        state = match policy {
            GhostPolicy::Random => {
                let mut successors = state.ghost_successors(ghost);
                if successors.is_empty() {
                    continue;
                }
                let pick = rng.gen_range(0..successors.len());
                successors.swap_remove(pick).0
            }
            GhostPolicy::EastBiased => {
                let from = state.ghost_positions()[ghost];
                let to = motion.sample_next(from, rng);
                state.place_ghost(ghost, to)
            }
        };
    }
    state
}
