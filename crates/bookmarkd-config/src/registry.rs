//! Descriptor registry extraction.
//!
//! Extraction walks the schema in declaration order, parses each field's
//! parameter declaration and captures the baseline value (environment
//! variable if set, declared default otherwise). The result is a
//! [`Registry`] value owned by the caller; nothing is cached or shared
//! between resolution calls, so concurrent resolutions are independent.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::error::ConfigError;
use crate::schema::{FieldKind, Schema};

/// Descriptor for one declared configuration parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub(crate) field: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) cmd: Option<String>,
    pub(crate) env: Option<String>,
    pub(crate) baseline: String,
    pub(crate) usage: String,
    /// Position of the originating field in the schema.
    pub(crate) index: usize,
}

impl ParamSpec {
    /// Name of the schema field this parameter writes to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Semantic type of the parameter.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Command-line name, if one was declared.
    #[must_use]
    pub fn cmd(&self) -> Option<&str> {
        self.cmd.as_deref()
    }

    /// Environment variable name, if one was declared.
    #[must_use]
    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    /// The env-or-default value captured at extraction time.
    #[must_use]
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    /// Help text for the usage table.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Name used in diagnostics and the usage table: the command-line name
    /// when declared, the environment variable name otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.cmd
            .as_deref()
            .or(self.env.as_deref())
            .unwrap_or(self.field)
    }
}

/// The descriptor registry for one schema.
///
/// Keyed by command-line name (environment variable name for env-only
/// parameters) with schema declaration order preserved, so lookup is by
/// key while usage rendering stays deterministic. A later duplicate key
/// overwrites an earlier one, keeping the earlier position.
#[derive(Debug)]
pub struct Registry {
    pub(crate) entries: IndexMap<String, ParamSpec>,
}

impl Registry {
    /// Extracts a registry from the schema, reading baselines from the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoCommandDefined`] if a field's declaration
    /// yields pairs but neither `cmd` nor `env`.
    pub fn from_schema<C>(schema: &Schema<C>) -> Result<Self, ConfigError> {
        Self::from_schema_with_env(schema, |name| std::env::var(name).ok())
    }

    /// Extracts a registry using the supplied environment lookup.
    ///
    /// The lookup must distinguish absence from emptiness: a variable set
    /// to the empty string is present, and its (empty) value wins over the
    /// declared default. Useful for hermetic tests and callers that
    /// snapshot the environment themselves.
    pub fn from_schema_with_env<C>(
        schema: &Schema<C>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut entries = IndexMap::new();

        for (index, field) in schema.fields().iter().enumerate() {
            let pairs = parse_declaration(field.decl);
            if pairs.is_empty() {
                // No effective declaration: the field is not part of the
                // configuration surface.
                continue;
            }

            let cmd = pairs.get("cmd").map(|v| (*v).to_string());
            let env_name = pairs.get("env").map(|v| (*v).to_string());
            if cmd.is_none() && env_name.is_none() {
                return Err(ConfigError::NoCommandDefined { field: field.name });
            }

            let baseline = env_name
                .as_deref()
                .and_then(|name| env(name))
                .or_else(|| pairs.get("default").map(|v| (*v).to_string()))
                .unwrap_or_default();

            let key = cmd
                .clone()
                .or_else(|| env_name.clone())
                .unwrap_or_default();

            let spec = ParamSpec {
                field: field.name,
                kind: field.kind(),
                cmd,
                env: env_name,
                baseline,
                usage: pairs.get("usage").map(|v| (*v).to_string()).unwrap_or_default(),
                index,
            };
            tracing::debug!(
                param = %spec.display_name(),
                kind = spec.kind.tag(),
                baseline = %spec.baseline,
                "extracted parameter descriptor"
            );
            entries.insert(key, spec);
        }

        Ok(Self { entries })
    }

    /// Looks up a descriptor by its registry key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamSpec> {
        self.entries.get(key)
    }

    /// Iterates descriptors in schema declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParamSpec> {
        self.entries.values()
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the schema declared no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses a declaration string into its `key=value` pairs.
///
/// Pairs missing `=` or with an empty value are dropped; the value is
/// everything after the first `=` in the pair. Duplicate keys last-win.
fn parse_declaration(decl: &str) -> HashMap<&str, &str> {
    let mut pairs = HashMap::new();
    for part in decl.trim_matches(',').split(',') {
        if let Some((key, value)) = split_pair(part) {
            pairs.insert(key, value);
        }
    }
    pairs
}

fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (key, value) = pair.trim_matches('=').split_once('=')?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}
