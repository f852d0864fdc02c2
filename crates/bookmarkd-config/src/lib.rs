//! Declarative configuration engine for bookmarkd services.
//!
//! Turns a schema of named, typed fields, each carrying a parameter
//! declaration, into a fully-resolved configuration struct, merging
//! three sources under a fixed precedence:
//!
//! 1. command-line arguments (`-name=value`)
//! 2. environment variables
//! 3. compiled-in defaults
//!
//! # Declaration grammar
//!
//! ```text
//! cmd=<name>,env=<ENV_NAME>,default=<literal>,usage=<free text>
//! ```
//!
//! Any subset containing at least `cmd` or `env` is valid.
//!
//! # Example
//!
//! ```
//! use bookmarkd_config::{parse, Schema};
//!
//! #[derive(Default)]
//! struct AppConfig {
//!     host: String,
//!     port: i64,
//!     read_timeout_secs: u64,
//! }
//!
//! let schema = Schema::<AppConfig>::new()
//!     .string("host", "cmd=host,env=APP_HOST,default=127.0.0.1,usage=hostname or IP", |c, v| {
//!         c.host = v;
//!     })
//!     .int("port", "cmd=port,env=APP_PORT,default=8080,usage=listen port", |c, v| {
//!         c.port = v;
//!     })
//!     .duration_secs("read_timeout", "cmd=srto,default=10,usage=read timeout", |c, v| {
//!         c.read_timeout_secs = v;
//!     });
//!
//! let args = vec!["bm-api".to_string(), "-port=9000".to_string()];
//! let mut cfg = AppConfig::default();
//! let registry = parse(&mut cfg, &schema, &args).expect("resolution failed");
//!
//! assert_eq!(cfg.port, 9000);
//! println!("{}", registry.render_usage());
//! ```
//!
//! # Help flow
//!
//! `-h`/`--help` anywhere in the arguments surfaces as the
//! [`ConfigError::HelpRequested`] sentinel. Extract the registry first,
//! then apply, so the usage table is still at hand:
//!
//! ```
//! use bookmarkd_config::{ConfigError, Registry, Schema};
//!
//! #[derive(Default)]
//! struct AppConfig { host: String }
//!
//! let schema = Schema::<AppConfig>::new()
//!     .string("host", "cmd=host,default=127.0.0.1", |c, v| c.host = v);
//! let registry = Registry::from_schema(&schema)?;
//!
//! let args = vec!["bm-api".to_string(), "-h".to_string()];
//! let mut cfg = AppConfig::default();
//! if let Err(err) = registry.apply(&mut cfg, &schema, &args) {
//!     if err.is_help() {
//!         registry.print_usage();
//!     }
//! }
//! # Ok::<(), ConfigError>(())
//! ```
//!
//! The registry is rebuilt fresh on every resolution call and returned by
//! value, so concurrent resolutions never share mutable state. A failed
//! call leaves the target partially written; do not use it afterwards.

mod args;
mod error;
mod registry;
mod resolve;
mod schema;
mod usage;

pub use args::parse_args;
pub use error::ConfigError;
pub use registry::{ParamSpec, Registry};
pub use resolve::parse;
pub use schema::{FieldKind, FieldSpec, Schema};
