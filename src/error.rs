//! Error taxonomy for the simulator

/// Errors raised while building a registry, loading a build, or resolving combat.
///
/// None of these are transient: they point at a bad build file or a caller
/// passing arguments that can never produce a valid run.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Unknown or duplicate attack type, or an attacker with nothing to attack with.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Encounter starts in a state the resolver cannot work from.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Run count, turn cap or enemy count out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to read build file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML build: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON build: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
