//! Deployment orchestration

use crate::error::{ProviderError, Result};
use crate::provider::{Context, DeployProvider};

/// Lifecycle phase of a deployment run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Install,
    Auth,
    Deploy,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Install => write!(f, "install"),
            Phase::Auth => write!(f, "auth"),
            Phase::Deploy => write!(f, "deploy"),
        }
    }
}

/// Run all phases of `provider` in order, stopping at the first failure
///
/// Returns the provider state as left by the run.
pub async fn deploy<P: DeployProvider>(provider: &P, ctx: &Context) -> Result<P::State> {
    if provider.is_experimental() {
        tracing::warn!(
            "{} support is experimental and may change",
            provider.display_name()
        );
    }

    if provider.needs_key() {
        return Err(ProviderError::config(format!(
            "{} requires a deploy key, which this runner does not provision",
            provider.display_name()
        )));
    }

    let mut state = P::State::default();

    tracing::info!(
        provider = provider.name(),
        phase = %Phase::Install,
        "Installing deploy dependencies"
    );
    provider.install_deploy_dependencies(ctx, &mut state).await?;

    tracing::info!(
        provider = provider.name(),
        phase = %Phase::Auth,
        "Authenticating"
    );
    provider.check_auth(ctx).await?;

    tracing::info!(
        provider = provider.name(),
        phase = %Phase::Deploy,
        "Deploying application"
    );
    provider.push_app(ctx, &state).await?;

    tracing::info!(provider = provider.name(), "Deployment finished");
    Ok(state)
}
