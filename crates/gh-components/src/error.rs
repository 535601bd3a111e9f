//! Error types for component operations.

use gh_core::error::GhError;
use gh_network::NetworkError;
use gh_sim::SimError;
use thiserror::Error;

/// Errors that can occur during component construction or updates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: &'static str },

    /// Hard protection limit reached; the run must stop.
    #[error("Safety trip: {what} = {value} reached limit {limit}")]
    SafetyTrip {
        what: &'static str,
        value: f64,
        limit: f64,
    },

    #[error("Component {component} has no port named {port}")]
    MissingPort { component: String, port: String },

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Sim(#[from] SimError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<GhError> for ComponentError {
    fn from(e: GhError) -> Self {
        ComponentError::Sim(SimError::Core(e))
    }
}
