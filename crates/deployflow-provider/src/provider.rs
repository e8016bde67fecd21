//! Deploy provider trait definition

use crate::error::Result;
use crate::options::Env;
use crate::shell::Shell;
use async_trait::async_trait;
use std::sync::Arc;

/// Deploy provider abstraction trait
///
/// A provider is driven through three phases in fixed order:
/// [`install_deploy_dependencies`](Self::install_deploy_dependencies),
/// [`check_auth`](Self::check_auth) and [`push_app`](Self::push_app).
/// Anything the install phase learns for the deploy phase lives in
/// [`State`](Self::State), which the caller threads between the calls.
#[async_trait]
pub trait DeployProvider: Send + Sync {
    /// Per-run state written by the install phase and read by the deploy phase
    type State: Default + Send + Sync;

    /// Returns the provider name (e.g., "gae")
    fn name(&self) -> &str;

    /// Returns the provider display name for UI
    fn display_name(&self) -> &str;

    /// Whether the provider is still experimental
    fn is_experimental(&self) -> bool {
        false
    }

    /// Whether the provider needs a deploy key provisioned by the host
    fn needs_key(&self) -> bool {
        true
    }

    /// Make sure the vendor tooling is installed and ready
    async fn install_deploy_dependencies(
        &self,
        ctx: &Context,
        state: &mut Self::State,
    ) -> Result<()>;

    /// Authenticate the vendor tooling
    async fn check_auth(&self, ctx: &Context) -> Result<()>;

    /// Deploy the application
    async fn push_app(&self, ctx: &Context, state: &Self::State) -> Result<()>;
}

/// Services the host supplies to a deployment run
#[derive(Clone)]
pub struct Context {
    pub shell: Arc<dyn Shell>,
    pub env: Env,
}

impl Context {
    pub fn new(shell: Arc<dyn Shell>, env: Env) -> Self {
        Self { shell, env }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").field("env", &self.env).finish_non_exhaustive()
    }
}
