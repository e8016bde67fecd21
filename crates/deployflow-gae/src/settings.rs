//! Option resolution for the App Engine provider

use deployflow_provider::{Env, Layered, ProviderOptions};

pub const DEFAULT_KEYFILE: &str = "service-account.json";
pub const DEFAULT_CONFIG: &str = "app.yaml";
pub const DEFAULT_VERBOSITY: &str = "warning";
pub const DEFAULT_DOCKER_BUILD: &str = "remote";

/// Fully resolved provider settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaeSettings {
    pub keyfile: String,
    pub project: String,
    pub version: String,
    pub config: String,
    pub default: bool,
    pub verbosity: String,
    pub docker_build: String,
}

impl GaeSettings {
    /// Resolve every setting from explicit options, then environment, then defaults
    pub fn resolve(options: &ProviderOptions, env: &Env) -> Self {
        Self {
            keyfile: keyfile(options, env),
            project: project(options, env),
            version: Layered::new().option(options, "version").or(""),
            config: config(options),
            default: options.is_truthy("default"),
            verbosity: Layered::new()
                .option(options, "verbosity")
                .or(DEFAULT_VERBOSITY),
            docker_build: docker_build(options),
        }
    }

    pub fn is_remote_build(&self) -> bool {
        self.docker_build == DEFAULT_DOCKER_BUILD
    }
}

pub fn keyfile(options: &ProviderOptions, env: &Env) -> String {
    Layered::new()
        .option(options, "keyfile")
        .env(env, "GOOGLECLOUDKEYFILE")
        .or(DEFAULT_KEYFILE)
}

/// Project id, falling back to the repository name of `TRAVIS_REPO_SLUG`
pub fn project(options: &ProviderOptions, env: &Env) -> String {
    Layered::new()
        .option(options, "project")
        .env(env, "GOOGLECLOUDPROJECT")
        .env(env, "CLOUDSDK_CORE_PROJECT")
        .lookup(move || {
            env.get("TRAVIS_REPO_SLUG")
                .and_then(|slug| slug.rsplit('/').next())
                .map(str::to_string)
        })
        .or("")
}

pub fn config(options: &ProviderOptions) -> String {
    Layered::new().option(options, "config").or(DEFAULT_CONFIG)
}

pub fn docker_build(options: &ProviderOptions) -> String {
    Layered::new()
        .option(options, "docker_build")
        .or(DEFAULT_DOCKER_BUILD)
}
