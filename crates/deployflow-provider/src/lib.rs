//! DeployFlow Provider Abstraction
//!
//! This crate provides the deploy provider abstraction for DeployFlow.
//! A provider takes an application to one hosting platform by driving
//! that platform's vendor CLI through an injected shell executor.
//!
//! # Lifecycle
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 deployflow CLI                   │
//! └─────────────────┬───────────────────────────────┘
//!                   │  deploy(&provider, &ctx)
//! ┌─────────────────▼───────────────────────────────┐
//! │              deployflow-provider                 │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  install_deploy_dependencies  (Install)  │   │
//! │  │  check_auth                   (Auth)     │   │
//! │  │  push_app                     (Deploy)   │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ ShellCommand │  │   Layered    │            │
//! │  │   + Shell    │  │   options    │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │  app-engine   │
//! │   provider    │
//! └───────────────┘
//! ```

pub mod command;
pub mod deploy;
pub mod error;
pub mod options;
pub mod provider;
pub mod shell;

// Re-exports
pub use command::ShellCommand;
pub use deploy::{Phase, deploy};
pub use error::{ProviderError, Result};
pub use options::{Env, Layered, ProviderOptions};
pub use provider::{Context, DeployProvider};
pub use shell::{DryRunShell, ProcessShell, Shell};

#[cfg(feature = "testing")]
pub use shell::ScriptedShell;
