//! app.yaml parsing

use deployflow_provider::{ProviderError, Result};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;

/// YAML 1.1 spellings of boolean true that serde_yaml reads as strings
const YAML11_TRUE: &[&str] = &["yes", "Yes", "YES", "on", "On", "ON"];

/// The parts of an App Engine `app.yaml` this provider looks at.
///
/// Fields are kept untyped: a value of an unexpected shape means
/// "not a Go app on a Managed VM", never a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    pub runtime: Option<Value>,
    pub vm: Option<Value>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::config(format!("Could not read {}: {}", path.display(), e))
        })?;
        Self::parse(&content).map_err(|e| {
            ProviderError::config(format!("Could not parse {}: {}", path.display(), e))
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Go apps on Managed VMs must be deployed through `aedeploy`
    pub fn needs_aedeploy(&self) -> bool {
        let is_go = matches!(&self.runtime, Some(Value::String(s)) if s == "go");
        let on_vm = match &self.vm {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => YAML11_TRUE.contains(&s.as_str()),
            _ => false,
        };
        is_go && on_vm
    }
}
