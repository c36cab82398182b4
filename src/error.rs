//! Error type for configuration and loading.
//!
//! Only setup can fail: validating a [`SimConfig`](crate::resources::simconfig::SimConfig),
//! adding a malformed spawn rule, or reading an INI/JSON file. Once a
//! [`Simulation`](crate::simulation::Simulation) is running, stale entity ids
//! and capacity limits are reported as `None`/`false`, never as errors.

/// Errors surfaced to the host application.
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    /// Invalid configuration, rejected before the simulation starts.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error while reading or writing a config or scene file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed config or scene file.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Parse(e.to_string())
    }
}
