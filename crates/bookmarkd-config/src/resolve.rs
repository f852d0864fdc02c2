//! Precedence resolution and typed assignment.
//!
//! For every declared parameter exactly one authoritative string value is
//! chosen (command-line over environment over default), then coerced to
//! the field's semantic type and written into the target struct through
//! the schema's setter.

use std::collections::HashMap;

use crate::args::parse_args;
use crate::error::ConfigError;
use crate::registry::{ParamSpec, Registry};
use crate::schema::{Schema, Setter};

impl Registry {
    /// Resolves every parameter against the raw arguments and assigns the
    /// coerced values into `target`.
    ///
    /// A command-line value wins only when present **and non-empty**; an
    /// explicit `-name=` falls through to the baseline captured at
    /// extraction. On error the target may be partially written and must
    /// not be used.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer errors (including the
    /// [`ConfigError::HelpRequested`] control signal) and
    /// [`ConfigError::InvalidNumericValue`] from coercion.
    pub fn apply<C>(
        &self,
        target: &mut C,
        schema: &Schema<C>,
        args: &[String],
    ) -> Result<(), ConfigError> {
        let cli = parse_args(args)?;
        self.assign(target, schema, &cli)
    }

    /// Assignment against an already-tokenized argument map.
    fn assign<C>(
        &self,
        target: &mut C,
        schema: &Schema<C>,
        cli: &HashMap<String, String>,
    ) -> Result<(), ConfigError> {
        for spec in self.iter() {
            // A registry only ever walks the schema it was extracted from;
            // a field index that no longer resolves is skipped.
            let Some(field) = schema.fields().get(spec.index) else {
                continue;
            };

            let resolved = resolve_value(spec, cli);
            tracing::debug!(param = %spec.display_name(), value = %resolved, "resolved parameter");

            match &field.setter {
                Setter::Str(set) => set(target, resolved.to_string()),
                Setter::Int(set) => set(target, parse_numeric(spec, resolved)?),
                Setter::DurationSecs(set) => set(target, parse_numeric(spec, resolved)?),
            }
        }
        Ok(())
    }
}

/// Picks the authoritative value for one parameter: the command-line value
/// when present and non-empty, the extraction-time baseline otherwise.
fn resolve_value<'a>(spec: &'a ParamSpec, cli: &'a HashMap<String, String>) -> &'a str {
    spec.cmd()
        .and_then(|cmd| cli.get(cmd))
        .filter(|value| !value.is_empty())
        .map_or(spec.baseline(), String::as_str)
}

fn parse_numeric<T: std::str::FromStr>(spec: &ParamSpec, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidNumericValue {
            param: spec.display_name().to_string(),
            value: value.to_string(),
        })
}

/// Resolves a configuration struct in one call.
///
/// Extracts the registry from the schema (reading the process
/// environment), tokenizes `args`, resolves precedence and assigns the
/// coerced values into `target`. The registry is returned by value so the
/// caller can render the usage table afterwards.
///
/// Callers that need to print usage on [`ConfigError::HelpRequested`]
/// should use the two-stage form instead: [`Registry::from_schema`]
/// followed by [`Registry::apply`], so the registry survives the error.
///
/// # Errors
///
/// Any [`ConfigError`] raised by extraction, tokenizing or coercion.
pub fn parse<C>(target: &mut C, schema: &Schema<C>, args: &[String]) -> Result<Registry, ConfigError> {
    let registry = Registry::from_schema(schema)?;
    registry.apply(target, schema, args)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Target {
        host: String,
        port: i64,
        timeout: u64,
    }

    fn schema() -> Schema<Target> {
        Schema::<Target>::new()
            .string(
                "host",
                "cmd=host,env=APP_HOST,default=127.0.0.1,usage=hostname or IP",
                |c, v| c.host = v,
            )
            .int("port", "cmd=port,env=APP_PORT,default=8080,usage=listen port", |c, v| {
                c.port = v
            })
            .duration_secs("timeout", "cmd=to,default=10,usage=read timeout", |c, v| {
                c.timeout = v
            })
    }

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_string()).collect()
    }

    fn registry_with_env(env: impl Fn(&str) -> Option<String>) -> (Schema<Target>, Registry) {
        let schema = schema();
        let registry = Registry::from_schema_with_env(&schema, env).unwrap();
        (schema, registry)
    }

    #[test]
    fn test_defaults_when_nothing_supplied() {
        let (schema, registry) = registry_with_env(|_| None);
        let mut cfg = Target::default();
        registry.apply(&mut cfg, &schema, &argv(&[""])).unwrap();
        assert_eq!(
            cfg,
            Target {
                host: "127.0.0.1".to_string(),
                port: 8080,
                timeout: 10,
            }
        );
    }

    #[test]
    fn test_command_line_overrides_env_overrides_default() {
        let (schema, registry) =
            registry_with_env(|name| (name == "APP_HOST").then(|| "env-host".to_string()));
        let mut cfg = Target::default();
        registry
            .apply(&mut cfg, &schema, &argv(&["", "-host=cli-host"]))
            .unwrap();
        // Command line beats the environment.
        assert_eq!(cfg.host, "cli-host");

        let mut cfg = Target::default();
        registry.apply(&mut cfg, &schema, &argv(&[""])).unwrap();
        // Environment beats the default.
        assert_eq!(cfg.host, "env-host");
    }

    #[test]
    fn test_empty_command_line_value_falls_back_to_baseline() {
        let (schema, registry) = registry_with_env(|_| None);
        let mut cfg = Target::default();
        registry
            .apply(&mut cfg, &schema, &argv(&["", "-host="]))
            .unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
    }

    #[test]
    fn test_integer_coercion() {
        let (schema, registry) = registry_with_env(|_| None);
        let mut cfg = Target::default();
        registry
            .apply(&mut cfg, &schema, &argv(&["", "-port=8081"]))
            .unwrap();
        assert_eq!(cfg.port, 8081);
    }

    #[test]
    fn test_non_numeric_value_fails_naming_the_value() {
        let (schema, registry) = registry_with_env(|_| None);
        let mut cfg = Target::default();
        let err = registry
            .apply(&mut cfg, &schema, &argv(&["", "-port=abc"]))
            .unwrap_err();
        match err {
            ConfigError::InvalidNumericValue { param, value } => {
                assert_eq!(param, "port");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duration_parsed_as_plain_seconds() {
        let (schema, registry) = registry_with_env(|_| None);
        let mut cfg = Target::default();
        registry
            .apply(&mut cfg, &schema, &argv(&["", "-to=30"]))
            .unwrap();
        assert_eq!(cfg.timeout, 30);
    }

    #[test]
    fn test_help_propagates_through_apply() {
        let (schema, registry) = registry_with_env(|_| None);
        let mut cfg = Target::default();
        let err = registry
            .apply(&mut cfg, &schema, &argv(&["", "-h"]))
            .unwrap_err();
        assert!(err.is_help());
    }

    #[test]
    fn test_unknown_command_line_names_are_ignored() {
        let (schema, registry) = registry_with_env(|_| None);
        let mut cfg = Target::default();
        registry
            .apply(&mut cfg, &schema, &argv(&["", "-nothere=1"]))
            .unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
    }
}
