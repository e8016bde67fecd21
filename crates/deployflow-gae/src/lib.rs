//! Google App Engine provider for DeployFlow
//!
//! This crate implements the DeployProvider trait for Google App Engine,
//! deploying an application with the Google Cloud SDK.
//!
//! # Phases
//!
//! - Install: fetch and bootstrap the Cloud SDK (skipped when already present),
//!   generate the SSH key remote Docker builds need, and install `aedeploy`
//!   for Go apps on Managed VMs
//! - Auth: activate a service account from a key file
//! - Deploy: run `gcloud preview app deploy`
//!
//! # Requirements
//!
//! - `curl`, `gzip`, `tar` and `python` on the build machine
//! - `go` when deploying a Go app to a Managed VM
//!
//! # Example
//!
//! ```ignore
//! use deployflow_gae::GaeProvider;
//! use deployflow_provider::{deploy, Context, Env, ProcessShell, ProviderOptions};
//! use std::sync::Arc;
//!
//! let options = ProviderOptions::new().with("project", "my-project");
//! let provider = GaeProvider::new(options)?;
//! let ctx = Context::new(Arc::new(ProcessShell::new()), Env::from_process());
//!
//! deploy(&provider, &ctx).await?;
//! ```

pub mod app_config;
pub mod gcloud;
pub mod provider;
pub mod settings;

pub use app_config::AppConfig;
pub use gcloud::{Gcloud, SdkLayout};
pub use provider::{GaeProvider, GaeState};
pub use settings::GaeSettings;
