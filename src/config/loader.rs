// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::consts::{DEFAULT_PRIORITY, WILDCARD};
use crate::errors::{ConfigError, Phase};
use crate::traits::ModuleGraph;

/// Application configuration.
///
/// Everything is optional; an empty file yields an app with no modules that
/// starts everything registered in code.
///
/// # Example
/// ```yaml
/// logging:
///   filter: info
/// lifecycle:
///   required: ["*"]
///   sync_batch_limit: 1024
/// settings:
///   region: eu-west-1
/// modules:
///   - name: config
///     type: immediate
///   - name: database
///     type: deferred
///     delay_ms: 20
///     deps: [config]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub lifecycle: LifecycleOptions,
    /// Free-form values exposed to modules through the app
    #[serde(default)]
    pub settings: HashMap<String, serde_yaml::Value>,
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

impl Config {
    pub fn module(&self, name: &str) -> Option<&ModuleConfig> {
        self.modules.iter().find(|m| m.name == name)
    }
}

/// Logging options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive; `RUST_LOG` takes precedence
    pub filter: Option<String>,
}

/// Options for `start` and the drive loop.
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleOptions {
    /// Modules to start; `"*"` means every configured module
    #[serde(default = "default_required")]
    pub required: Vec<String>,
    /// Synchronous completions before the drive loop yields; `0` never yields
    pub sync_batch_limit: Option<usize>,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            required: default_required(),
            sync_batch_limit: None,
        }
    }
}

fn default_required() -> Vec<String> {
    vec![WILDCARD.to_string()]
}

/// One declaratively configured module.
///
/// # Example
/// ```yaml
/// name: worker
/// type: failing
/// fail_on: start
/// deps: [database]
/// priority: -1
/// stoppable: false
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleConfig {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ModuleKind,
    #[serde(default)]
    pub deps: Vec<String>,
    pub priority: Option<i32>,
    /// How long a `deferred` module waits before completing
    pub delay_ms: Option<u64>,
    /// Phase in which a `failing` module fails; defaults to `start`
    pub fail_on: Option<Phase>,
    /// Whether the module gets a stop hook at all
    #[serde(default = "default_stoppable")]
    pub stoppable: bool,
    #[serde(default)]
    pub options: HashMap<String, serde_yaml::Value>,
}

fn default_stoppable() -> bool {
    true
}

/// Built-in module behaviours available from config.
///
/// # Variants
/// * `Immediate` - completes inside the hook call
/// * `Deferred` - completes from a spawned task after `delay_ms`
/// * `Failing` - reports a failure in the `fail_on` phase
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    #[default]
    Immediate,
    Deferred,
    Failing,
}

impl ModuleGraph for Config {
    fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    fn dependencies(&self, name: &str) -> Option<&[String]> {
        self.module(name).map(|m| m.deps.as_slice())
    }

    fn priority(&self, name: &str) -> i32 {
        self.module(name)
            .and_then(|m| m.priority)
            .unwrap_or(DEFAULT_PRIORITY)
    }
}

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML, everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Parse config text in the given format.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
    let cfg = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(cfg)
}

/// Load a config from a YAML or TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, ConfigFormat::from_path(path))
}

/// Load a config and validate its module graph.
///
/// Every validation problem is reported at once.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_module_graph(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
modules:
  - name: config
  - name: database
    type: deferred
    delay_ms: 10
    deps: [config]
    priority: 2
"#;

        let cfg = parse_config(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(cfg.modules.len(), 2);
        assert_eq!(cfg.modules[0].kind, ModuleKind::Immediate);
        assert!(cfg.modules[0].stoppable);
        assert_eq!(cfg.modules[1].kind, ModuleKind::Deferred);
        assert_eq!(cfg.modules[1].deps, vec!["config"]);
        assert_eq!(cfg.modules[1].delay_ms, Some(10));
        assert_eq!(cfg.lifecycle.required, vec!["*"]);
        assert_eq!(cfg.lifecycle.sync_batch_limit, None);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("{}", ConfigFormat::Yaml).unwrap();
        assert!(cfg.modules.is_empty());
        assert!(cfg.logging.filter.is_none());
        assert_eq!(cfg.lifecycle.required, vec!["*"]);
    }

    #[test]
    fn test_failing_module_fields() {
        let yaml = r#"
modules:
  - name: worker
    type: failing
    fail_on: stop
    stoppable: false
    options:
      message: disk full
"#;
        let cfg = parse_config(yaml, ConfigFormat::Yaml).unwrap();
        let worker = &cfg.modules[0];
        assert_eq!(worker.kind, ModuleKind::Failing);
        assert_eq!(worker.fail_on, Some(Phase::Stop));
        assert!(!worker.stoppable);
        assert_eq!(
            worker.options.get("message").and_then(|v| v.as_str()),
            Some("disk full")
        );
    }

    #[test]
    fn test_unknown_module_type_is_rejected() {
        let yaml = r#"
modules:
  - name: x
    type: teleport
"#;
        assert!(matches!(
            parse_config(yaml, ConfigFormat::Yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_toml_config() {
        let toml = r#"
[logging]
filter = "debug"

[lifecycle]
required = ["api"]
sync_batch_limit = 0

[settings]
region = "eu-west-1"

[[modules]]
name = "db"

[[modules]]
name = "api"
deps = ["db"]
priority = -1
"#;
        let file = write_temp(".toml", toml);
        let cfg = load_config(file.path()).unwrap();

        assert_eq!(cfg.logging.filter.as_deref(), Some("debug"));
        assert_eq!(cfg.lifecycle.required, vec!["api"]);
        assert_eq!(cfg.lifecycle.sync_batch_limit, Some(0));
        assert_eq!(
            cfg.settings.get("region").and_then(|v| v.as_str()),
            Some("eu-west-1")
        );
        assert_eq!(cfg.priority("api"), -1);
    }

    #[test]
    fn test_graph_view_of_config() {
        let yaml = r#"
modules:
  - name: a
  - name: b
    deps: [a]
    priority: 3
"#;
        let cfg = parse_config(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(cfg.module_names(), vec!["a", "b"]);
        assert_eq!(cfg.dependencies("b"), Some(&["a".to_string()][..]));
        assert_eq!(cfg.dependencies("z"), None);
        assert_eq!(cfg.priority("a"), 0);
        assert_eq!(cfg.priority("b"), 3);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("app.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("app.TOML")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("app.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("app")), ConfigFormat::Yaml);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let file = write_temp(
            ".yaml",
            r#"
modules:
  - name: logger
  - name: auth
    deps: [logger]
  - name: api
    deps: [auth]
"#,
        );
        assert!(load_and_validate_config(file.path()).is_ok());
    }

    #[test]
    fn test_load_and_validate_cyclic_config() {
        let file = write_temp(
            ".yaml",
            r#"
modules:
  - name: a
    deps: [b]
  - name: b
    deps: [a]
"#,
        );
        let error_msg = load_and_validate_config(file.path()).unwrap_err().to_string();
        assert!(error_msg.contains("Cyclic dependency detected"));
    }

    #[test]
    fn test_load_and_validate_unresolved_dependency() {
        let file = write_temp(
            ".yml",
            r#"
modules:
  - name: api
    deps: [nonexistent]
"#,
        );
        let error_msg = load_and_validate_config(file.path()).unwrap_err().to_string();
        assert!(error_msg.contains("depends on 'nonexistent' which does not exist"));
    }
}
