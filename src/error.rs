//! Error types for the qbandit library.

use thiserror::Error;

/// Result type alias for agent, table and environment operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while selecting actions or learning values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The action index is outside `[0, n_actions)`.
    #[error("invalid action {action}: expected an index below {n_actions}")]
    InvalidAction { action: usize, n_actions: usize },

    /// A parameter was rejected when building a policy, table, agent or environment.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Fails with `InvalidAction` unless `action < n_actions`.
    pub(crate) fn check_action(action: usize, n_actions: usize) -> Result<()> {
        if action < n_actions {
            Ok(())
        } else {
            Err(Error::InvalidAction { action, n_actions })
        }
    }
}
