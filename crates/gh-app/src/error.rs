//! Error types for the gh-app service layer.

use std::path::PathBuf;

use gh_components::ComponentError;
use gh_network::NetworkError;
use gh_sim::SimError;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse scenario YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Invalid port reference '{0}', expected 'component.port'")]
    InvalidPortRef(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A previous step failed; the simulation cannot continue.
    #[error("Simulation halted at t = {t} s: {reason}")]
    Halted { t: f64, reason: String },

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gh-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Whether this error came from a hard protection limit.
    pub fn is_safety_trip(&self) -> bool {
        matches!(self, AppError::Component(ComponentError::SafetyTrip { .. }))
    }
}
