//! Deploy provider error types

use crate::deploy::Phase;
use thiserror::Error;

/// Deploy provider errors
///
/// Every variant is terminal: the run stops at the first one raised.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0}")]
    Setup(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Deploy(String),

    #[error("{0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ProviderError {
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn deploy(message: impl Into<String>) -> Self {
        Self::Deploy(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The lifecycle phase this error halts
    pub fn phase(&self) -> Phase {
        match self {
            Self::Auth(_) => Phase::Auth,
            Self::Deploy(_) => Phase::Deploy,
            Self::Setup(_) | Self::Config(_) | Self::Yaml(_) => Phase::Install,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
