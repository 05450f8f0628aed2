//! Layered run configuration.
//!
//! Precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (`SYMPREFIX_*`)
//! 3. Built-in defaults
//!
//! Every resolved value records where it came from so diagnostics can say
//! why a setting is in effect.

use crate::walk::{SourceExtensions, WalkOptions};

/// Comma separated list of source extensions.
pub const ENV_EXTENSIONS: &str = "SYMPREFIX_EXTENSIONS";
/// Enables debug logging when truthy.
pub const ENV_VERBOSE: &str = "SYMPREFIX_VERBOSE";
/// Enables dry-run mode when truthy.
pub const ENV_DRY_RUN: &str = "SYMPREFIX_DRY_RUN";

// ============================================================================
// Configuration Sources
// ============================================================================

/// Configuration value source (for precedence tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in default value.
    Default = 0,
    /// From environment variable.
    EnvVar = 1,
    /// From CLI flag (highest precedence).
    CliFlag = 2,
}

/// A configuration value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue<T> {
    /// The actual value.
    pub value: T,
    /// Where the value came from.
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    /// Create a new config value with the given source.
    pub fn new(value: T, source: ConfigSource) -> Self {
        ConfigValue { value, source }
    }

    /// Merge with another value, preferring higher precedence.
    pub fn merge(self, other: Self) -> Self {
        if other.source >= self.source {
            other
        } else {
            self
        }
    }
}

// ============================================================================
// CLI Overrides
// ============================================================================

/// Values supplied on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// `--ext` flags.
    pub extensions: Vec<String>,
    /// `-v/--verbose` flag.
    pub verbose: bool,
    /// `--dry-run` flag.
    pub dry_run: bool,
}

// ============================================================================
// Configuration Resolution
// ============================================================================

/// Resolved configuration with precedence information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub extensions: ConfigValue<SourceExtensions>,
    pub verbose: ConfigValue<bool>,
    pub dry_run: ConfigValue<bool>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ResolvedConfig {
            extensions: ConfigValue::new(SourceExtensions::default(), ConfigSource::Default),
            verbose: ConfigValue::new(false, ConfigSource::Default),
            dry_run: ConfigValue::new(false, ConfigSource::Default),
        }
    }
}

impl ResolvedConfig {
    /// Resolve configuration from the process environment and CLI flags.
    pub fn resolve(cli_overrides: &CliOverrides) -> Self {
        ResolvedConfig::resolve_with(cli_overrides, |key| std::env::var(key).ok())
    }

    /// Resolve configuration using `env` to look up environment variables.
    pub fn resolve_with<F>(cli_overrides: &CliOverrides, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        ResolvedConfig::default()
            .apply_env_vars(env)
            .apply_cli_overrides(cli_overrides)
    }

    fn apply_env_vars<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(list) = env(ENV_EXTENSIONS) {
            let extensions = SourceExtensions::parse_list(&list);
            if !extensions.is_empty() {
                self.extensions = self
                    .extensions
                    .merge(ConfigValue::new(extensions, ConfigSource::EnvVar));
            }
        }

        if let Some(verbose) = env(ENV_VERBOSE).as_deref().and_then(parse_flag) {
            self.verbose = self
                .verbose
                .merge(ConfigValue::new(verbose, ConfigSource::EnvVar));
        }

        if let Some(dry_run) = env(ENV_DRY_RUN).as_deref().and_then(parse_flag) {
            self.dry_run = self
                .dry_run
                .merge(ConfigValue::new(dry_run, ConfigSource::EnvVar));
        }

        self
    }

    fn apply_cli_overrides(mut self, overrides: &CliOverrides) -> Self {
        if !overrides.extensions.is_empty() {
            self.extensions = self.extensions.merge(ConfigValue::new(
                SourceExtensions::new(&overrides.extensions),
                ConfigSource::CliFlag,
            ));
        }

        if overrides.verbose {
            self.verbose = self
                .verbose
                .merge(ConfigValue::new(true, ConfigSource::CliFlag));
        }

        if overrides.dry_run {
            self.dry_run = self
                .dry_run
                .merge(ConfigValue::new(true, ConfigSource::CliFlag));
        }

        self
    }

    /// Walk options derived from this configuration.
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            extensions: self.extensions.value.clone(),
            dry_run: self.dry_run.value,
        }
    }
}

/// Parse a boolean environment flag. Unrecognized values are ignored.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    mod precedence {
        use super::*;

        #[test]
        fn defaults_when_nothing_set() {
            let config = ResolvedConfig::resolve_with(&CliOverrides::default(), env_of(&[]));
            assert_eq!(config.extensions.source, ConfigSource::Default);
            assert_eq!(config.extensions.value, SourceExtensions::default());
            assert!(!config.verbose.value);
            assert!(!config.dry_run.value);
        }

        #[test]
        fn env_overrides_defaults() {
            let config = ResolvedConfig::resolve_with(
                &CliOverrides::default(),
                env_of(&[
                    (ENV_EXTENSIONS, "c,m"),
                    (ENV_VERBOSE, "yes"),
                    (ENV_DRY_RUN, "1"),
                ]),
            );
            assert_eq!(config.extensions.source, ConfigSource::EnvVar);
            assert_eq!(
                config.extensions.value.iter().collect::<Vec<_>>(),
                vec!["c", "m"]
            );
            assert!(config.verbose.value);
            assert_eq!(config.verbose.source, ConfigSource::EnvVar);
            assert!(config.dry_run.value);
        }

        #[test]
        fn cli_overrides_env() {
            let overrides = CliOverrides {
                extensions: vec![".cpp".to_string()],
                verbose: true,
                dry_run: false,
            };
            let config = ResolvedConfig::resolve_with(
                &overrides,
                env_of(&[(ENV_EXTENSIONS, "c"), (ENV_VERBOSE, "0")]),
            );
            assert_eq!(config.extensions.source, ConfigSource::CliFlag);
            assert_eq!(
                config.extensions.value.iter().collect::<Vec<_>>(),
                vec!["cpp"]
            );
            assert_eq!(config.verbose.source, ConfigSource::CliFlag);
            assert!(config.verbose.value);
        }

        #[test]
        fn empty_env_extension_list_is_ignored() {
            let config = ResolvedConfig::resolve_with(
                &CliOverrides::default(),
                env_of(&[(ENV_EXTENSIONS, " , ")]),
            );
            assert_eq!(config.extensions.source, ConfigSource::Default);
        }

        #[test]
        fn unrecognized_flag_value_is_ignored() {
            let config = ResolvedConfig::resolve_with(
                &CliOverrides::default(),
                env_of(&[(ENV_VERBOSE, "maybe")]),
            );
            assert_eq!(config.verbose.source, ConfigSource::Default);
        }
    }

    mod config_value {
        use super::*;

        #[test]
        fn merge_prefers_higher_source() {
            let default = ConfigValue::new(1, ConfigSource::Default);
            let cli = ConfigValue::new(2, ConfigSource::CliFlag);
            assert_eq!(default.clone().merge(cli.clone()).value, 2);
            assert_eq!(cli.merge(default).value, 2);
        }
    }

    #[test]
    fn walk_options_follow_resolved_values() {
        let overrides = CliOverrides {
            dry_run: true,
            ..Default::default()
        };
        let options = ResolvedConfig::resolve_with(&overrides, env_of(&[])).walk_options();
        assert!(options.dry_run);
        assert_eq!(options.extensions, SourceExtensions::default());
    }
}
