mod adversarial;
mod evaluate;
mod frontier;
mod path;

pub use adversarial::{
    AdversarialSearch, DEFAULT_DEPTH, NodeKey, SearchOutcome, SearchStats, SearchVariant,
};
pub use evaluate::{EvalFrame, Evaluator, FoodPathEvaluator, ReachHistory, ScoreEvaluator};
pub use frontier::{Frontier, PathNode};
pub use path::{
    EMPTY_STEP_COST, FOOD_STEP_COST, PathAlgorithm, Plan, PlanStats, farthest_food_distance,
    plan, step_cost,
};
