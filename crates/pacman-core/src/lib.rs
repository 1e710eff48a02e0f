pub mod belief;
pub mod config;
pub mod game;
pub mod model;

pub use config::{BeliefConfig, ConfigError};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "pacman-agents"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "pacman-agents");
        assert!(!AppInfo::version().is_empty());
    }
}
