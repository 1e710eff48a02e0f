pub mod agent;
pub mod search;

pub use agent::{AdversarialAgent, Agent, BeliefView, PlannerAgent};
pub use search::{
    AdversarialSearch, PathAlgorithm, Plan, PlanStats, SearchOutcome, SearchStats, SearchVariant,
};
