mod ghosts;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use pacman_bot::{AdversarialAgent, Agent, BeliefView, PlannerAgent};
use pacman_core::BeliefConfig;
use pacman_core::belief::{BeliefError, BeliefSession};
use pacman_core::game::{GameState, Layout, MazeState, Outcome};
use pacman_core::model::Position;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{
    AgentKind, AgentPlan, BenchmarkConfig, LayoutLoadError, ResolvedOutputs, ValidationError,
};

use ghosts::advance_ghosts;

/// Plays every configured agent on every layout and streams one JSONL row per
/// episode.
pub struct EpisodeRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    layouts: Vec<(String, Layout)>,
    agents: Vec<AgentBlueprint>,
    belief: BeliefConfig,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub episodes: usize,
    pub rows_written: usize,
    pub wins: usize,
    pub jsonl_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl EpisodeRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let layouts = config
            .layouts
            .iter()
            .map(|layout| Ok((layout.name.clone(), layout.load()?)))
            .collect::<Result<Vec<_>, RunnerError>>()?;
        let agents = config
            .agents
            .iter()
            .map(|agent| {
                Ok(AgentBlueprint {
                    name: agent.name.clone(),
                    kind: agent.kind,
                    plan: agent.plan()?,
                })
            })
            .collect::<Result<Vec<_>, RunnerError>>()?;
        let belief = config.belief_config()?;

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            layouts,
            agents,
            belief,
        })
    }

    /// Execute all episodes, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.episodes.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut wins = 0usize;

        for (layout_name, layout) in &self.layouts {
            for episode_index in 0..self.config.episodes.count {
                // Every agent sees the same ghost and sensor randomness.
                let episode_seed = rng.next_u64();
                for blueprint in &self.agents {
                    let result = self.play_episode(layout, blueprint, episode_seed)?;
                    if result.outcome == Outcome::Won {
                        wins += 1;
                    }
                    let row = EpisodeLogRow {
                        run_id: self.config.run_id.clone(),
                        episode_id: format!("{layout_name}_E{episode_index:04}"),
                        layout: layout_name.clone(),
                        episode_index,
                        episode_seed,
                        agent: blueprint.name.clone(),
                        kind: blueprint.kind,
                        outcome: result.outcome,
                        score: result.score,
                        steps: result.steps,
                        food_left: result.food_left,
                        decisions: result.metrics.decisions,
                        speed_ms_turn: result.metrics.avg_ms_per_decision,
                        tracking_error: result.tracking_error,
                    };
                    serde_json::to_writer(&mut writer, &row)?;
                    writer.write_all(b"\n")?;
                    rows_written += 1;
                }
            }
        }

        writer.flush()?;

        let telemetry_path = if self.logging_enabled {
            Some(self.outputs.telemetry_path())
        } else {
            None
        };

        Ok(RunSummary {
            episodes: self.config.episodes.count * self.layouts.len(),
            rows_written,
            wins,
            jsonl_path: self.outputs.jsonl.clone(),
            telemetry_path,
        })
    }

    fn play_episode(
        &self,
        layout: &Layout,
        blueprint: &AgentBlueprint,
        episode_seed: u64,
    ) -> Result<EpisodeResult, RunnerError> {
        let mut rng = StdRng::seed_from_u64(episode_seed);
        let mut agent = blueprint.spawn_agent();
        agent.reset();

        let mut state = MazeState::from_layout(layout);
        let mut session = BeliefSession::new(layout.walls().clone(), self.belief);
        let tracking = self.config.belief.enabled && state.ghost_count() > 0;
        if tracking {
            session.start_episode(state.ghost_belief_states())?;
        }

        let mut metrics = DecisionMetrics::default();
        let mut tracking_errors: Vec<f64> = Vec::new();
        let mut steps = 0usize;

        while steps < self.config.episodes.max_steps && !state.is_terminal() {
            let start = Instant::now();
            let action = agent.choose_action(&state);
            let elapsed_ms = metrics.record(start.elapsed());

            state = state.apply_pacman(action);
            state = advance_ghosts(
                self.config.ghosts.policy,
                state,
                session.tracker().transition(),
                &mut rng,
            );
            steps += 1;

            if tracking && !state.is_terminal() {
                let sensor = session.tracker().sensor();
                let observations: Vec<Position> = state
                    .ghost_positions()
                    .iter()
                    .map(|truth| sensor.sample_observation(*truth, &mut rng))
                    .collect();
                let beliefs = session.update_beliefs(&observations)?;
                if let Some(error) = BeliefView::new(beliefs).tracking_error(state.ghost_positions())
                {
                    tracking_errors.push(error);
                }
            }

            if tracing::enabled!(Level::TRACE) {
                event!(
                    target: "pacman_bench::episode",
                    Level::TRACE,
                    agent = %blueprint.name,
                    step = steps,
                    action = %action,
                    score = state.score(),
                    elapsed_ms,
                );
            }
        }

        let outcome = state.outcome();
        let metrics = metrics.finalize();
        event!(
            target: "pacman_bench::episode",
            Level::INFO,
            agent = %blueprint.name,
            outcome = outcome.as_str(),
            score = state.score(),
            steps,
            food_left = state.food_remaining(),
            avg_ms = metrics.avg_ms_per_decision,
        );

        let tracking_error = if tracking_errors.is_empty() {
            None
        } else {
            Some(tracking_errors.iter().sum::<f64>() / tracking_errors.len() as f64)
        };

        Ok(EpisodeResult {
            outcome,
            score: state.score(),
            steps,
            food_left: state.food_remaining(),
            metrics,
            tracking_error,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

struct AgentBlueprint {
    name: String,
    kind: AgentKind,
    plan: AgentPlan,
}

impl AgentBlueprint {
    fn spawn_agent(&self) -> Box<dyn Agent<MazeState>> {
        match self.plan {
            AgentPlan::Adversarial(variant) => {
                Box::new(AdversarialAgent::named(self.name.clone(), variant))
            }
            AgentPlan::Path(algorithm) => Box::new(PlannerAgent::named(self.name.clone(), algorithm)),
        }
    }
}

struct EpisodeResult {
    outcome: Outcome,
    score: f64,
    steps: usize,
    food_left: usize,
    metrics: DecisionSummary,
    tracking_error: Option<f64>,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
        }
    }
}

#[derive(Clone, Copy)]
struct DecisionSummary {
    decisions: u32,
    avg_ms_per_decision: f64,
}

#[derive(Serialize)]
struct EpisodeLogRow {
    run_id: String,
    episode_id: String,
    layout: String,
    episode_index: usize,
    episode_seed: u64,
    agent: String,
    kind: AgentKind,
    outcome: Outcome,
    score: f64,
    steps: usize,
    food_left: usize,
    decisions: u32,
    speed_ms_turn: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracking_error: Option<f64>,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Layout(#[from] LayoutLoadError),
    #[error("{0}")]
    Config(#[from] ValidationError),
    #[error("belief tracking failed: {0}")]
    Belief(#[from] BeliefError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
