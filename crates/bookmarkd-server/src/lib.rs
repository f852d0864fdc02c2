//! HTTP transport and graceful shutdown for bookmarkd services.
//!
//! This crate owns the listener and the signal-driven shutdown timer. It
//! consumes a [`ServerConfig`] of fully-resolved scalars and a
//! [`bookmarkd_web::App`], and nothing else: configuration resolution is
//! `bookmarkd-config`'s job, request composition is `bookmarkd-web`'s.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookmarkd_server::{Server, ServerConfig};
//! use bookmarkd_web::App;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .host("0.0.0.0")
//!     .port(8081)
//!     .shutdown_timeout(Duration::from_secs(30))
//!     .build();
//! Server::new(config, App::new(vec![])).run().await?;
//! ```

mod config;
mod error;
mod server;
mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder, DEFAULT_HOST, DEFAULT_PORT};
pub use error::ServerError;
pub use server::Server;
pub use shutdown::ShutdownSignal;
