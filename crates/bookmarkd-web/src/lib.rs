//! Minimal handler/middleware composition layer for bookmarkd services.
//!
//! This crate is deliberately thin: it chains handler-wrapping functions,
//! stamps a trace identifier into a per-request context, and dispatches
//! requests by exact path. Everything transport-specific (listening,
//! connection lifecycle, shutdown) lives in `bookmarkd-server`.
//!
//! # Example
//!
//! ```
//! use bookmarkd_web::{respond_json, request_logger, App, Request, RequestContext};
//! use http::StatusCode;
//!
//! let mut app = App::new(vec![request_logger()]);
//! app.handle(
//!     "/hello",
//!     |ctx: RequestContext, _req: Request| async move {
//!         respond_json(StatusCode::OK, &serde_json::json!({
//!             "trace_id": ctx.trace_id().to_string(),
//!         }))
//!     },
//!     &[],
//! );
//! ```

mod app;
mod context;
mod error;
mod middleware;
mod response;

use bytes::Bytes;
use http_body_util::Full;

/// Request type flowing through the app: the body is already collected.
pub type Request = http::Request<Bytes>;

/// Response type produced by handlers: a fully-buffered body.
pub type Response = http::Response<Full<Bytes>>;

pub use app::App;
pub use context::RequestContext;
pub use error::WebError;
pub use middleware::{request_logger, wrap, BoxFuture, BoxHandler, Handler, Middleware};
pub use response::{respond_json, respond_text};
