//! Google App Engine provider implementation

use crate::app_config::AppConfig;
use crate::gcloud::{Gcloud, SSH_KEY_NAME, SdkLayout};
use crate::settings::{self, GaeSettings};
use async_trait::async_trait;
use deployflow_provider::{
    Context, DeployProvider, ProviderError, ProviderOptions, Result, ShellCommand,
};
use std::path::{Path, PathBuf};

/// State carried from the install phase to the deploy phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GaeState {
    /// Deploy through `aedeploy` (Go runtime on a Managed VM)
    pub wrap_with_aedeploy: bool,
}

/// Google App Engine provider
pub struct GaeProvider {
    options: ProviderOptions,
    gcloud: Gcloud,
    ssh_dir: PathBuf,
}

impl GaeProvider {
    /// Create a provider rooted at the user's home directory
    pub fn new(options: ProviderOptions) -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| ProviderError::config("Home directory could not be determined"))?;
        let ssh_dir = home.join(".ssh");
        Ok(Self::with_paths(options, home, ssh_dir))
    }

    /// Create a provider with explicit SDK install root and SSH directory
    pub fn with_paths(
        options: ProviderOptions,
        install_root: impl Into<PathBuf>,
        ssh_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            options,
            gcloud: Gcloud::new(SdkLayout::new(install_root)),
            ssh_dir: ssh_dir.into(),
        }
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    pub fn layout(&self) -> &SdkLayout {
        self.gcloud.layout()
    }

    pub fn ssh_key_path(&self) -> PathBuf {
        self.ssh_dir.join(SSH_KEY_NAME)
    }

    pub fn settings(&self, ctx: &Context) -> GaeSettings {
        GaeSettings::resolve(&self.options, &ctx.env)
    }

    async fn ensure_ssh_key(&self, ctx: &Context) -> Result<()> {
        let key = self.ssh_key_path();
        if exists(&key).await {
            return Ok(());
        }
        run_or(ctx, &Gcloud::ssh_keygen(&key), || {
            ProviderError::setup("Failed to generate SSH key for remote Docker build.")
        })
        .await
    }

    async fn install_sdk(&self, ctx: &Context) -> Result<()> {
        tracing::info!("Downloading Google Cloud SDK ...");
        run_or(ctx, &self.gcloud.download(), || {
            ProviderError::setup("Could not download Google Cloud SDK.")
        })
        .await?;

        tracing::info!("Bootstrapping Google Cloud SDK ...");
        run_or(ctx, &self.gcloud.bootstrap(), || {
            ProviderError::setup("Could not bootstrap Google Cloud SDK.")
        })
        .await
    }
}

#[async_trait]
impl DeployProvider for GaeProvider {
    type State = GaeState;

    fn name(&self) -> &str {
        "gae"
    }

    fn display_name(&self) -> &str {
        "Google App Engine"
    }

    fn is_experimental(&self) -> bool {
        true
    }

    fn needs_key(&self) -> bool {
        false
    }

    async fn install_deploy_dependencies(
        &self,
        ctx: &Context,
        state: &mut GaeState,
    ) -> Result<()> {
        let settings = self.settings(ctx);
        if settings.is_remote_build() {
            self.ensure_ssh_key(ctx).await?;
        }

        // A cached SDK means a previous run already finished installing
        if exists(&self.layout().gcloud()).await {
            tracing::debug!("Google Cloud SDK found at {:?}", self.layout().sdk_home());
            return Ok(());
        }
        self.install_sdk(ctx).await?;

        let app = AppConfig::load(&settings.config)?;
        if app.needs_aedeploy() {
            state.wrap_with_aedeploy = true;
            run_or(ctx, &Gcloud::install_aedeploy(), || {
                ProviderError::setup("Could not go get aedeploy.")
            })
            .await?;
        }
        Ok(())
    }

    async fn check_auth(&self, ctx: &Context) -> Result<()> {
        let keyfile = settings::keyfile(&self.options, &ctx.env);
        run_or(ctx, &self.gcloud.activate_service_account(&keyfile), || {
            ProviderError::auth("Authentication failed.")
        })
        .await
    }

    async fn push_app(&self, ctx: &Context, state: &GaeState) -> Result<()> {
        let settings = self.settings(ctx);
        let command = self.gcloud.app_deploy(&settings, state.wrap_with_aedeploy);
        run_or(ctx, &command, || ProviderError::deploy("Deployment failed.")).await
    }
}

/// Run `command`, mapping a non-zero exit or spawn failure to `err()`
async fn run_or(
    ctx: &Context,
    command: &ShellCommand,
    err: impl FnOnce() -> ProviderError,
) -> Result<()> {
    match ctx.shell.run(command).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(err()),
        Err(e) => {
            tracing::warn!("Could not run {}: {}", command.program_name(), e);
            Err(err())
        }
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
