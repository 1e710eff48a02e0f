use pacman_bot::search::{DEFAULT_DEPTH, PathAlgorithm, SearchVariant};
use pacman_core::BeliefConfig;
use pacman_core::game::Layout;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_MAX_STEPS: usize = 200;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub episodes: EpisodeConfig,
    pub layouts: Vec<LayoutConfig>,
    pub agents: Vec<AgentConfig>,
    #[serde(default)]
    pub ghosts: GhostConfig,
    #[serde(default)]
    pub belief: BeliefSettings,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.episodes.validate()?;
        validate_layouts(&self.layouts)?;
        validate_agents(&mut self.agents)?;
        self.ghosts.validate()?;
        self.belief.validate()?;
        self.belief_config()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
        }
    }

    /// Ghost motion and sensor parameters shared by simulation and tracking.
    pub fn belief_config(&self) -> Result<BeliefConfig, ValidationError> {
        BeliefConfig::new(self.belief.half_width, self.ghosts.east_bias).map_err(|err| {
            ValidationError::InvalidField {
                field: "belief".to_string(),
                message: err.to_string(),
            }
        })
    }
}

/// Episode scheduling block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EpisodeConfig {
    pub seed: Option<u64>,
    pub count: usize,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl EpisodeConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "episodes.count".to_string(),
                message: "number of episodes must be greater than zero".to_string(),
            });
        }

        if self.max_steps == 0 {
            return Err(ValidationError::InvalidField {
                field: "episodes.max_steps".to_string(),
                message: "max_steps must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

/// A maze, given inline or as a path to a layout file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LayoutConfig {
    pub name: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl LayoutConfig {
    pub fn load(&self) -> Result<Layout, LayoutLoadError> {
        let text = match (&self.text, &self.path) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => {
                fs::read_to_string(path).map_err(|source| LayoutLoadError::Read {
                    name: self.name.clone(),
                    path: path.clone(),
                    source,
                })?
            }
            (None, None) => {
                return Err(LayoutLoadError::Missing {
                    name: self.name.clone(),
                });
            }
        };
        Layout::parse(&text).map_err(|source| LayoutLoadError::Parse {
            name: self.name.clone(),
            source,
        })
    }
}

/// Definition of a benchmarked Pacman agent.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub kind: AgentKind,
    #[serde(default)]
    pub depth: Option<u32>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Minimax,
    AlphaBeta,
    HMinimax,
    Bfs,
    Ucs,
    Astar,
}

/// What an agent config resolves to once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentPlan {
    Adversarial(SearchVariant),
    Path(PathAlgorithm),
}

impl AgentConfig {
    pub fn plan(&self) -> Result<AgentPlan, ValidationError> {
        let plan = match self.kind {
            AgentKind::Minimax => AgentPlan::Adversarial(SearchVariant::Minimax),
            AgentKind::AlphaBeta => AgentPlan::Adversarial(SearchVariant::AlphaBeta),
            AgentKind::HMinimax => {
                let depth = self.depth.unwrap_or(DEFAULT_DEPTH);
                let variant = SearchVariant::depth_limited(depth).map_err(|err| {
                    ValidationError::InvalidField {
                        field: format!("agents[{}].depth", self.name),
                        message: err.to_string(),
                    }
                })?;
                AgentPlan::Adversarial(variant)
            }
            AgentKind::Bfs => AgentPlan::Path(PathAlgorithm::Bfs),
            AgentKind::Ucs => AgentPlan::Path(PathAlgorithm::Ucs),
            AgentKind::Astar => AgentPlan::Path(PathAlgorithm::AStar),
        };
        if self.depth.is_some() && self.kind != AgentKind::HMinimax {
            return Err(ValidationError::InvalidField {
                field: format!("agents[{}].depth", self.name),
                message: "depth only applies to h_minimax agents".to_string(),
            });
        }
        Ok(plan)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GhostPolicy {
    /// Uniform over legal moves.
    Random,
    /// Follows the same east-biased motion model the tracker assumes.
    #[default]
    EastBiased,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GhostConfig {
    #[serde(default)]
    pub policy: GhostPolicy,
    #[serde(default = "default_east_bias", alias = "p")]
    pub east_bias: f64,
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            policy: GhostPolicy::default(),
            east_bias: default_east_bias(),
        }
    }
}

impl GhostConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.east_bias.is_finite() || !(0.0..=1.0).contains(&self.east_bias) {
            return Err(ValidationError::InvalidField {
                field: "ghosts.east_bias".to_string(),
                message: format!("east bias must lie in [0, 1] (got {})", self.east_bias),
            });
        }
        Ok(())
    }
}

fn default_east_bias() -> f64 {
    BeliefConfig::DEFAULT_EAST_BIAS
}

/// Ghost tracking from noisy readings, off by default.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BeliefSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_half_width", alias = "w")]
    pub half_width: i64,
}

impl Default for BeliefSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            half_width: default_half_width(),
        }
    }
}

impl BeliefSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.half_width < 0 {
            return Err(ValidationError::InvalidField {
                field: "belief.half_width".to_string(),
                message: "sensor half-width must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

fn default_half_width() -> i64 {
    i64::from(BeliefConfig::DEFAULT_HALF_WIDTH)
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        if self.jsonl.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "outputs.jsonl".to_string(),
                message: "path must not be empty".to_string(),
            });
        }

        let resolved = resolve_template(run_id, &self.jsonl);
        if resolved.components().count() == 0 {
            return Err(ValidationError::InvalidField {
                field: "outputs.jsonl".to_string(),
                message: "resolved path is invalid".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_name(section: &str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: format!("{section}.name"),
            message: "name must not be empty".to_string(),
        });
    }

    if !name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: format!("{section}[{name}].name"),
            message: "name contains invalid characters".to_string(),
        });
    }

    Ok(())
}

fn validate_layouts(layouts: &[LayoutConfig]) -> Result<(), ValidationError> {
    if layouts.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "layouts".to_string(),
            message: "at least one layout must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for layout in layouts {
        validate_name("layouts", &layout.name)?;
        if !seen.insert(layout.name.as_str()) {
            return Err(ValidationError::InvalidField {
                field: "layouts".to_string(),
                message: format!("layout name '{}' defined more than once", layout.name),
            });
        }

        if layout.text.is_some() == layout.path.is_some() {
            return Err(ValidationError::InvalidField {
                field: format!("layouts[{}]", layout.name),
                message: "exactly one of 'text' or 'path' must be given".to_string(),
            });
        }
    }

    Ok(())
}

fn validate_agents(agents: &mut [AgentConfig]) -> Result<(), ValidationError> {
    if agents.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "agents".to_string(),
            message: "at least one agent must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for agent in agents.iter_mut() {
        validate_name("agents", &agent.name)?;

        if !seen.insert(agent.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "agents".to_string(),
                message: format!("agent name '{}' defined more than once", agent.name),
            });
        }

        agent.plan()?;
        if agent.kind == AgentKind::HMinimax && agent.depth.is_none() {
            agent.depth = Some(DEFAULT_DEPTH);
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
}

impl ResolvedOutputs {
    /// Structured log file written next to the episode rows.
    pub fn telemetry_path(&self) -> PathBuf {
        self.jsonl
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("telemetry.jsonl")
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[derive(Debug, Error)]
pub enum LayoutLoadError {
    #[error("layout '{name}' has neither text nor path")]
    Missing { name: String },
    #[error("failed to read layout '{name}' from {path:?}: {source}")]
    Read {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("layout '{name}' is malformed: {source}")]
    Parse {
        name: String,
        #[source]
        source: pacman_core::game::LayoutError,
    },
}
