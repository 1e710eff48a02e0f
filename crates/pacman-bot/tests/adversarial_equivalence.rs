use pacman_bot::search::{
    AdversarialSearch, EvalFrame, Evaluator, FoodPathEvaluator, ReachHistory, ScoreEvaluator,
    SearchOutcome, SearchVariant,
};
use pacman_bot::{AdversarialAgent, Agent};
use pacman_core::game::{GameState, Layout, MazeState, StateSignature};
use pacman_core::model::{Direction, Position};
use std::cell::RefCell;
use std::rc::Rc;

const RING: &str = "
%%%%%
%P .%
% % %
%. G%
%%%%%
";

const TWIN_GHOSTS: &str = "
%%%%%%%
%P. .G%
%%%%G%%
%%%%%%%
";

const HALLWAY: &str = "
%%%%%%%
%P. . %
%%%%%G%
%%%%%%%
";

fn maze(text: &str) -> MazeState {
    let layout: Layout = text.parse().unwrap();
    MazeState::from_layout(&layout)
}

fn score_search(variant: SearchVariant, state: &MazeState) -> SearchOutcome {
    AdversarialSearch::new(variant, ScoreEvaluator).run(state, &ReachHistory::new())
}

#[test]
fn pruning_does_not_change_the_decision() {
    for text in [RING, HALLWAY, TWIN_GHOSTS, "%%%%%%%\n%.P .G%\n%%%%%%%"] {
        let state = maze(text);
        let minimax = score_search(SearchVariant::Minimax, &state);
        let pruned = score_search(SearchVariant::AlphaBeta, &state);
        assert_eq!(pruned.action, minimax.action, "layout:{text}");
        assert_eq!(pruned.value, minimax.value, "layout:{text}");
        assert!(pruned.stats.nodes_visited <= minimax.stats.nodes_visited);
        assert!(pruned.stats.nodes_expanded <= minimax.stats.nodes_expanded);
    }
}

#[test]
fn alpha_beta_visits_strictly_fewer_nodes_in_a_ring() {
    let state = maze(RING);
    let minimax = score_search(SearchVariant::Minimax, &state);
    let pruned = score_search(SearchVariant::AlphaBeta, &state);
    assert!(pruned.stats.prunes > 0);
    assert!(pruned.stats.nodes_visited < minimax.stats.nodes_visited);
    assert!(minimax.stats.cycle_skips > 0);
}

#[test]
fn every_ghost_replies_before_pacman_moves_again() {
    let state = maze(TWIN_GHOSTS);
    assert_eq!(state.ghost_count(), 2);
    let minimax = score_search(SearchVariant::Minimax, &state);
    let pruned = score_search(SearchVariant::AlphaBeta, &state);

    // Both ghosts close in on the pellet at (4,2); the best Pacman can do is
    // eat once and get caught.
    assert_eq!(minimax.action, Direction::East);
    assert_eq!(minimax.value, Some(-492.0));
    assert_eq!(minimax.stats.nodes_visited, 56);
    assert_eq!(minimax.stats.cycle_skips, 13);

    assert_eq!(pruned.action, Direction::East);
    assert_eq!(pruned.value, Some(-492.0));
    assert_eq!(pruned.stats.nodes_visited, 30);
    assert_eq!(pruned.stats.prunes, 7);
}

#[test]
fn first_round_is_taken_after_the_last_ghost_replies() {
    let start = maze(TWIN_GHOSTS);
    let after_first_ghost = start
        .apply_pacman(Direction::East)
        .apply_ghost(0, Direction::West);
    let full_round = after_first_ghost.apply_ghost(1, Direction::North);
    assert_eq!(full_round.ghost_positions(), &[Position::new(4, 2), Position::new(4, 2)]);

    let search = AdversarialSearch::new(SearchVariant::depth_limited(4).unwrap(), FoodPathEvaluator);

    // Leaves sit one Pacman move past the round: East scores 8 - 1, West 8 - 3.
    let fresh = search.run(&start, &ReachHistory::new());
    assert_eq!(fresh.action, Direction::East);
    assert_eq!(fresh.value, Some(7.0));

    let mut partial = ReachHistory::new();
    partial.record(StateSignature::of(&after_first_ghost));
    assert_eq!(search.run(&start, &partial).value, Some(7.0));

    let mut revisited = ReachHistory::new();
    revisited.record(StateSignature::of(&full_round));
    let penalized = search.run(&start, &revisited);
    assert_eq!(penalized.action, Direction::East);
    assert_eq!(penalized.value, Some(6.0));
}

type RecordedFrame = (StateSignature, StateSignature, bool);

#[derive(Default)]
struct RoundRecorder {
    frames: Rc<RefCell<Vec<RecordedFrame>>>,
}

impl RoundRecorder {
    fn search(depth: u32, state: &MazeState) -> Vec<RecordedFrame> {
        let recorder = RoundRecorder::default();
        let frames = Rc::clone(&recorder.frames);
        AdversarialSearch::new(SearchVariant::depth_limited(depth).unwrap(), recorder)
            .run(state, &ReachHistory::new());
        frames.take()
    }
}

impl Evaluator for RoundRecorder {
    fn evaluate<S: GameState>(&self, frame: &EvalFrame<'_, S>) -> f64 {
        self.frames.borrow_mut().push((
            StateSignature::of(frame.state),
            StateSignature::of(frame.first_round),
            frame.state.is_terminal(),
        ));
        frame.state.score()
    }
}

#[test]
fn cutoff_leaves_see_the_state_after_both_ghosts() {
    let state = maze(TWIN_GHOSTS);

    // Depth 3 stops exactly when Pacman is to move again: the leaf is the round.
    let frames = RoundRecorder::search(3, &state);
    assert!(frames.iter().any(|(_, _, terminal)| !terminal));
    for (leaf, first_round, _) in &frames {
        assert_eq!(leaf, first_round);
    }

    // Depth 4 goes one Pacman move further; no ghost has moved since the round.
    let frames = RoundRecorder::search(4, &state);
    let open: Vec<_> = frames.iter().filter(|(_, _, terminal)| !terminal).collect();
    assert!(!open.is_empty());
    for (leaf, first_round, _) in open {
        assert_eq!(leaf.ghosts, first_round.ghosts);
        assert_eq!(leaf.pacman.manhattan(first_round.pacman), 1);
    }
}

#[test]
fn immediate_win_is_taken() {
    let state = maze("%%%%%%\n%P. G%\n%%%%%%");
    for variant in [SearchVariant::Minimax, SearchVariant::AlphaBeta] {
        let outcome = score_search(variant, &state);
        assert_eq!(outcome.action, Direction::East);
        assert_eq!(outcome.value, Some(509.0));
    }
}

#[test]
fn hallway_race_reaches_both_pellets() {
    let outcome = score_search(SearchVariant::AlphaBeta, &maze(HALLWAY));
    assert_eq!(outcome.action, Direction::East);
    assert_eq!(outcome.value, Some(517.0));
}

#[test]
fn terminal_root_stops() {
    let won = maze("%%%%\n%P.%\n%%%%").apply_pacman(Direction::East);
    assert!(won.is_win());
    let outcome = score_search(SearchVariant::Minimax, &won);
    assert_eq!(outcome.action, Direction::Stop);
    assert_eq!(outcome.value, Some(won.score()));
}

#[test]
fn depth_limited_search_respects_cutoff() {
    let state = maze(RING);
    let variant = SearchVariant::depth_limited(3).unwrap();
    let outcome = AdversarialSearch::new(variant, FoodPathEvaluator).run(&state, &ReachHistory::new());
    assert_ne!(outcome.action, Direction::Stop);
    assert!(outcome.stats.max_depth <= 3);
    assert!(outcome.stats.evaluations > 0);
}

#[test]
fn h_minimax_agent_clears_an_empty_corridor() {
    let mut state = maze("%%%%%%%\n%P. ..%\n%%%%%%%");
    let mut agent = AdversarialAgent::new(SearchVariant::depth_limited(6).unwrap());
    for _ in 0..20 {
        if state.is_terminal() {
            break;
        }
        let action = agent.choose_action(&state);
        state = state.apply_pacman(action);
    }
    assert!(state.is_win());
    assert!(agent.history().decisions() <= 20);
}
