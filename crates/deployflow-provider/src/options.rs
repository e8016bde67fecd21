//! Provider options, environment snapshot and layered resolution

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Options passed to a provider for one deployment run
///
/// Keys are option names (`project`, `docker_build`, ...). A key that is
/// present wins over every lower layer, even when its value is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderOptions {
    values: BTreeMap<String, serde_json::Value>,
}

impl ProviderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a YAML mapping file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::config(format!(
                "Could not read options file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse options from a YAML mapping; an empty document yields no options
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        let values: BTreeMap<String, serde_json::Value> = serde_yaml::from_str(content)?;
        Ok(Self {
            values: values.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        })
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Overlay `other` on top of these options
    pub fn merge(mut self, other: ProviderOptions) -> Self {
        self.values.extend(other.values);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Get an option as a string
    ///
    /// Numbers and booleans are stringified; `null`, arrays and maps are treated as absent.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Whether an option is set to a truthy value
    pub fn is_truthy(&self, key: &str) -> bool {
        match self.values.get(key) {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => !(s.is_empty() || s == "false"),
            Some(_) => true,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Snapshot of the environment a deployment runs in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Builder used mostly by tests
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

type Lookup<'a> = Box<dyn Fn() -> Option<String> + 'a>;

/// Ordered-fallback resolver
///
/// Sources are consulted in the order they were added; the first one that
/// yields a value wins.
///
/// ```
/// use deployflow_provider::{Env, Layered, ProviderOptions};
///
/// let options = ProviderOptions::new();
/// let env = Env::new().with("APP_VERBOSITY", "info");
///
/// let verbosity = Layered::new()
///     .option(&options, "verbosity")
///     .env(&env, "APP_VERBOSITY")
///     .or("warning");
/// assert_eq!(verbosity, "info");
/// ```
#[derive(Default)]
pub struct Layered<'a> {
    sources: Vec<Lookup<'a>>,
}

impl<'a> Layered<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult an explicit provider option
    pub fn option(self, options: &'a ProviderOptions, key: &'a str) -> Self {
        self.lookup(move || options.get_str(key))
    }

    /// Consult an environment variable
    pub fn env(self, env: &'a Env, name: &'a str) -> Self {
        self.lookup(move || env.get(name).map(str::to_string))
    }

    /// Consult an arbitrary source
    pub fn lookup(mut self, source: impl Fn() -> Option<String> + 'a) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// First value any source yields
    pub fn resolve(&self) -> Option<String> {
        self.sources.iter().find_map(|source| source())
    }

    /// First value any source yields, or `default`
    pub fn or(&self, default: impl Into<String>) -> String {
        self.resolve().unwrap_or_else(|| default.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_get_str_stringifies_scalars() {
        let options = ProviderOptions::new()
            .with("project", "acme")
            .with("version", 2)
            .with("default", true);

        assert_eq!(options.get_str("project").as_deref(), Some("acme"));
        assert_eq!(options.get_str("version").as_deref(), Some("2"));
        assert_eq!(options.get_str("default").as_deref(), Some("true"));
        assert_eq!(options.get_str("missing"), None);
    }

    #[test]
    fn test_truthiness() {
        let options = ProviderOptions::new()
            .with("yes", true)
            .with("no", false)
            .with("empty", "")
            .with("false_str", "false")
            .with("word", "yes")
            .with("null", serde_json::Value::Null);

        assert!(options.is_truthy("yes"));
        assert!(options.is_truthy("word"));
        assert!(!options.is_truthy("no"));
        assert!(!options.is_truthy("empty"));
        assert!(!options.is_truthy("false_str"));
        assert!(!options.is_truthy("null"));
        assert!(!options.is_truthy("missing"));
    }

    #[test]
    fn test_from_yaml_str() {
        let options = ProviderOptions::from_yaml_str(
            "project: acme\nversion: 3\ndefault: true\nkeyfile: ~\n",
        )
        .unwrap();

        assert_eq!(options.get_str("project").as_deref(), Some("acme"));
        assert_eq!(options.get_str("version").as_deref(), Some("3"));
        assert!(options.is_truthy("default"));
        assert!(!options.contains("keyfile"));

        assert!(ProviderOptions::from_yaml_str("").unwrap().is_empty());
        assert!(ProviderOptions::from_yaml_str("- a\n- b\n").is_err());
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProviderOptions::from_yaml_file(dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, ProviderError::Config(_)));
    }

    #[test]
    fn test_merge_overrides() {
        let file = ProviderOptions::new()
            .with("project", "from-file")
            .with("version", "v1");
        let flags = ProviderOptions::new().with("project", "from-flag");

        let merged = file.merge(flags);
        assert_eq!(merged.get_str("project").as_deref(), Some("from-flag"));
        assert_eq!(merged.get_str("version").as_deref(), Some("v1"));
    }

    #[test]
    fn test_env_from_process() {
        temp_env::with_var("DEPLOYFLOW_TEST_ENV_SNAPSHOT", Some("captured"), || {
            let env = Env::from_process();
            assert_eq!(env.get("DEPLOYFLOW_TEST_ENV_SNAPSHOT"), Some("captured"));
        });
    }

    #[test]
    fn test_layered_precedence() {
        let options = ProviderOptions::new().with("project", "explicit");
        let env = Env::new().with("PROJECT", "from-env");

        let both = Layered::new()
            .option(&options, "project")
            .env(&env, "PROJECT")
            .or("fallback");
        assert_eq!(both, "explicit");

        let empty = ProviderOptions::new();
        let env_only = Layered::new()
            .option(&empty, "project")
            .env(&env, "PROJECT")
            .or("fallback");
        assert_eq!(env_only, "from-env");

        let none = Layered::new()
            .option(&empty, "project")
            .env(&Env::new(), "PROJECT")
            .or("fallback");
        assert_eq!(none, "fallback");
    }

    #[test]
    fn test_layered_present_empty_value_wins() {
        let options = ProviderOptions::new().with("version", "");
        let env = Env::new().with("VERSION", "v9");

        let version = Layered::new()
            .option(&options, "version")
            .env(&env, "VERSION")
            .or("v1");
        assert_eq!(version, "");
    }

    #[test]
    fn test_layered_stops_at_first_hit() {
        let calls = Cell::new(0);
        let resolved = Layered::new()
            .lookup(|| Some("first".to_string()))
            .lookup(|| {
                calls.set(calls.get() + 1);
                Some("second".to_string())
            })
            .resolve();

        assert_eq!(resolved.as_deref(), Some("first"));
        assert_eq!(calls.get(), 0);
        assert_eq!(Layered::new().resolve(), None);
    }
}
