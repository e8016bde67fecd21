//! Google Cloud SDK layout and command construction
//!
//! Builds every external command the App Engine provider runs. Nothing
//! here executes anything; the provider hands the commands to a shell.

use crate::settings::GaeSettings;
use deployflow_provider::ShellCommand;
use std::path::{Path, PathBuf};

pub const SDK_BASE_URL: &str = "https://dl.google.com/dl/cloudsdk/channels/rapid/";
pub const SDK_NAME: &str = "google-cloud-sdk";
pub const SDK_EXT: &str = ".tar.gz";
pub const SSH_KEY_NAME: &str = "google_compute_engine";
pub const AEDEPLOY: &str = "aedeploy";
pub const AEDEPLOY_PACKAGE: &str = "google.golang.org/appengine/cmd/aedeploy";

/// Where the Cloud SDK lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLayout {
    install_root: PathBuf,
}

impl SdkLayout {
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
        }
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn sdk_home(&self) -> PathBuf {
        self.install_root.join(SDK_NAME)
    }

    pub fn gcloud(&self) -> PathBuf {
        self.sdk_home().join("bin").join("gcloud")
    }

    pub fn bootstrap(&self) -> PathBuf {
        self.sdk_home()
            .join("bin")
            .join("bootstrapping")
            .join("install.py")
    }

    pub fn archive_url() -> String {
        format!("{}{}{}", SDK_BASE_URL, SDK_NAME, SDK_EXT)
    }
}

/// Cloud SDK command builder
#[derive(Debug, Clone)]
pub struct Gcloud {
    layout: SdkLayout,
}

impl Gcloud {
    pub fn new(layout: SdkLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SdkLayout {
        &self.layout
    }

    /// `ssh-keygen` for the key remote Docker builds connect with
    pub fn ssh_keygen(key_path: &Path) -> ShellCommand {
        ShellCommand::new("ssh-keygen")
            .arg("-f")
            .path(key_path)
            .args(["-t", "rsa"])
            .option("-N", "")
    }

    /// `curl | gzip | tar` pipeline extracting the SDK into the install root
    pub fn download(&self) -> ShellCommand {
        ShellCommand::new("curl")
            .arg("-L")
            .arg(SdkLayout::archive_url())
            .pipe(ShellCommand::new("gzip").arg("-d"))
            .pipe(
                ShellCommand::new("tar")
                    .args(["-x", "-C"])
                    .path(self.layout.install_root()),
            )
    }

    /// Non-interactive SDK bootstrap with the preview component
    pub fn bootstrap(&self) -> ShellCommand {
        ShellCommand::program(self.layout.bootstrap()).args([
            "--usage-reporting=false",
            "--command-completion=false",
            "--path-update=false",
            "--additional-components=preview",
        ])
    }

    /// `go get` for the aedeploy wrapper
    pub fn install_aedeploy() -> ShellCommand {
        ShellCommand::new("go").arg("get").arg(AEDEPLOY_PACKAGE)
    }

    pub fn activate_service_account(&self, keyfile: &str) -> ShellCommand {
        ShellCommand::program(self.layout.gcloud())
            .args(["-q", "--verbosity", "debug"])
            .args(["auth", "activate-service-account"])
            .option("--key-file", keyfile)
    }

    /// `gcloud preview app deploy`, optionally wrapped in aedeploy
    pub fn app_deploy(&self, settings: &GaeSettings, wrap_with_aedeploy: bool) -> ShellCommand {
        let command = ShellCommand::program(self.layout.gcloud())
            .arg("--quiet")
            .option("--verbosity", settings.verbosity.as_str())
            .option("--project", settings.project.as_str())
            .args(["preview", "app", "deploy"])
            .value(settings.config.as_str())
            .option("--version", settings.version.as_str())
            .option("--docker-build", settings.docker_build.as_str())
            .flag_if("--set-default", settings.default);

        if wrap_with_aedeploy {
            command.prefixed(AEDEPLOY)
        } else {
            command
        }
    }
}
