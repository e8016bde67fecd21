use clap::Args;
use colored::Colorize;
use deployflow_gae::GaeProvider;
use deployflow_provider::{
    Context, DeployProvider, DryRunShell, Env, ProcessShell, ProviderError, ProviderOptions,
    Shell, deploy,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct GaeArgs {
    /// Google Cloud project id (env: GOOGLECLOUDPROJECT, CLOUDSDK_CORE_PROJECT)
    #[arg(long)]
    pub project: Option<String>,

    /// App version to deploy
    #[arg(long = "version", id = "app_version", value_name = "VERSION")]
    pub app_version: Option<String>,

    /// Path to app.yaml
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Service account key file (env: GOOGLECLOUDKEYFILE)
    #[arg(long, value_name = "FILE")]
    pub keyfile: Option<String>,

    /// Make the deployed version the default one
    #[arg(long)]
    pub default: bool,

    /// gcloud verbosity
    #[arg(long)]
    pub verbosity: Option<String>,

    /// Docker build mode (remote, local)
    #[arg(long, value_name = "MODE")]
    pub docker_build: Option<String>,

    /// YAML file with provider options; flags take precedence
    #[arg(long, value_name = "FILE")]
    pub options_file: Option<PathBuf>,

    /// Directory the Cloud SDK is installed under (default: home directory)
    #[arg(long, value_name = "DIR")]
    pub install_root: Option<PathBuf>,

    /// Directory holding the SSH key for remote builds (default: ~/.ssh)
    #[arg(long, value_name = "DIR")]
    pub ssh_dir: Option<PathBuf>,

    /// Kill any external command running longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl GaeArgs {
    /// Provider options given as flags
    fn flag_options(&self) -> ProviderOptions {
        let mut options = ProviderOptions::new();
        let pairs = [
            ("project", &self.project),
            ("version", &self.app_version),
            ("config", &self.config),
            ("keyfile", &self.keyfile),
            ("verbosity", &self.verbosity),
            ("docker_build", &self.docker_build),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                options.set(key, value.as_str());
            }
        }
        if self.default {
            options.set("default", true);
        }
        options
    }

    fn options(&self) -> Result<ProviderOptions, ProviderError> {
        let base = match &self.options_file {
            Some(path) => ProviderOptions::from_yaml_file(path)?,
            None => ProviderOptions::new(),
        };
        Ok(base.merge(self.flag_options()))
    }

    fn provider(&self, options: ProviderOptions) -> Result<GaeProvider, ProviderError> {
        if self.install_root.is_none() && self.ssh_dir.is_none() {
            return GaeProvider::new(options);
        }

        let home = dirs::home_dir();
        let install_root = self
            .install_root
            .clone()
            .or_else(|| home.clone())
            .ok_or_else(|| missing_home("--install-root"))?;
        let ssh_dir = self
            .ssh_dir
            .clone()
            .or_else(|| home.map(|h| h.join(".ssh")))
            .ok_or_else(|| missing_home("--ssh-dir"))?;

        Ok(GaeProvider::with_paths(options, install_root, ssh_dir))
    }

    fn shell(&self, dry_run: bool) -> Arc<dyn Shell> {
        if dry_run {
            return Arc::new(DryRunShell::new());
        }
        match self.timeout {
            Some(secs) => Arc::new(ProcessShell::with_timeout(Duration::from_secs(secs))),
            None => Arc::new(ProcessShell::new()),
        }
    }
}

fn missing_home(flag: &str) -> ProviderError {
    ProviderError::config(format!(
        "Home directory could not be determined; pass {}",
        flag
    ))
}

pub async fn handle(args: GaeArgs, dry_run: bool) -> anyhow::Result<()> {
    let options = args.options()?;
    tracing::debug!(?options, "Resolved provider options");
    let provider = args.provider(options)?;

    println!(
        "{} {}",
        "Deploying to".blue().bold(),
        provider.display_name().cyan()
    );
    if dry_run {
        println!("{}", "(dry run: commands are printed, not executed)".yellow());
    }

    let ctx = Context::new(args.shell(dry_run), Env::from_process());
    deploy(&provider, &ctx).await?;
    Ok(())
}
