//! Declarative configuration schema.
//!
//! A [`Schema`] is an ordered, compile-time-checked table of field
//! descriptors: each entry names a field on the target configuration
//! struct, carries its parameter declaration string, and holds a typed
//! setter that writes the coerced value back. The setter table replaces
//! runtime struct introspection while keeping the declarative ergonomics
//! of per-field declarations.
//!
//! # Declaration grammar
//!
//! A declaration is a comma-separated list of `key=value` pairs:
//!
//! ```text
//! cmd=<name>,env=<ENV_NAME>,default=<literal>,usage=<free text>
//! ```
//!
//! Recognized keys are `cmd`, `env`, `default` and `usage`; unrecognized
//! keys are ignored, and a pair missing `=` or with an empty value is
//! dropped. Any subset containing at least `cmd` or `env` is valid.
//!
//! # Example
//!
//! ```
//! use bookmarkd_config::Schema;
//!
//! #[derive(Default)]
//! struct AppConfig {
//!     host: String,
//!     port: i64,
//! }
//!
//! let schema = Schema::<AppConfig>::new()
//!     .string("host", "cmd=host,env=APP_HOST,default=127.0.0.1,usage=hostname or IP", |c, v| {
//!         c.host = v;
//!     })
//!     .int("port", "cmd=port,env=APP_PORT,default=8080,usage=listen port", |c, v| {
//!         c.port = v;
//!     });
//!
//! assert_eq!(schema.len(), 2);
//! ```

/// Semantic type tag of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Assigned verbatim.
    Str,
    /// Parsed as a base-10 signed integer.
    Int,
    /// A seconds-denominated integer; parsed as an integer at this layer,
    /// unit interpretation is the caller's responsibility.
    DurationSecs,
}

impl FieldKind {
    /// Short tag used in the usage table's "Data type" column.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "int",
            Self::DurationSecs => "duration",
        }
    }
}

/// Typed write-back into the target configuration struct.
///
/// Function pointers keep the table free of captures, so a schema is a
/// plain value with no lifetime ties to the target.
pub(crate) enum Setter<C> {
    Str(fn(&mut C, String)),
    Int(fn(&mut C, i64)),
    DurationSecs(fn(&mut C, u64)),
}

impl<C> Setter<C> {
    pub(crate) fn kind(&self) -> FieldKind {
        match self {
            Self::Str(_) => FieldKind::Str,
            Self::Int(_) => FieldKind::Int,
            Self::DurationSecs(_) => FieldKind::DurationSecs,
        }
    }
}

/// One schema entry: field identity, declaration string, typed setter.
pub struct FieldSpec<C> {
    pub(crate) name: &'static str,
    pub(crate) decl: &'static str,
    pub(crate) setter: Setter<C>,
}

impl<C> FieldSpec<C> {
    /// Name of the target field, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The raw parameter declaration string.
    #[must_use]
    pub fn declaration(&self) -> &'static str {
        self.decl
    }

    /// Semantic type of the field.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.setter.kind()
    }
}

/// Ordered list of field descriptors for one configuration struct.
///
/// Built with the fluent methods below; declaration order is preserved
/// and determines usage-table row order.
pub struct Schema<C> {
    fields: Vec<FieldSpec<C>>,
}

impl<C> Schema<C> {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declares a string-typed field.
    #[must_use]
    pub fn string(mut self, name: &'static str, decl: &'static str, set: fn(&mut C, String)) -> Self {
        self.fields.push(FieldSpec {
            name,
            decl,
            setter: Setter::Str(set),
        });
        self
    }

    /// Declares an integer-typed field.
    #[must_use]
    pub fn int(mut self, name: &'static str, decl: &'static str, set: fn(&mut C, i64)) -> Self {
        self.fields.push(FieldSpec {
            name,
            decl,
            setter: Setter::Int(set),
        });
        self
    }

    /// Declares a duration-typed field, denominated in whole seconds.
    ///
    /// The setter receives the parsed second count; converting it to a
    /// `std::time::Duration` (or anything else) is up to the caller.
    #[must_use]
    pub fn duration_secs(
        mut self,
        name: &'static str,
        decl: &'static str,
        set: fn(&mut C, u64),
    ) -> Self {
        self.fields.push(FieldSpec {
            name,
            decl,
            setter: Setter::DurationSecs(set),
        });
        self
    }

    /// The field descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec<C>] {
        &self.fields
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields have been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<C> Default for Schema<C> {
    fn default() -> Self {
        Self::new()
    }
}
