//! Route table and request dispatch.
//!
//! [`App`] is a thin composition utility: it wraps each handler in its
//! route-specific middleware, then in the application-wide middleware,
//! stamps a fresh [`RequestContext`] per request and dispatches by exact
//! path. Handler errors are logged, not propagated; the client receives a
//! generic 500.

use std::collections::HashMap;

use http::StatusCode;

use crate::context::RequestContext;
use crate::middleware::{wrap, BoxHandler, Handler, Middleware};
use crate::response::respond_text;
use crate::{Request, Response};

/// The application: routes plus application-wide middleware.
pub struct App {
    routes: HashMap<String, BoxHandler>,
    middleware: Vec<Middleware>,
}

impl App {
    /// Creates an app whose middleware wraps every registered route.
    #[must_use]
    pub fn new(middleware: Vec<Middleware>) -> Self {
        Self {
            routes: HashMap::new(),
            middleware,
        }
    }

    /// Registers `handler` at `path`, wrapped first in `route_middleware`
    /// and then in the application-wide middleware (so the app middleware
    /// is outermost).
    pub fn handle<H: Handler>(&mut self, path: &str, handler: H, route_middleware: &[Middleware]) {
        let handler = wrap(route_middleware, std::sync::Arc::new(handler));
        let handler = wrap(&self.middleware, handler);
        self.routes.insert(path.to_string(), handler);
    }

    /// Dispatches one request: stamps a context, finds the route, runs the
    /// chain. Unknown paths get a 404; handler errors become a 500.
    pub async fn dispatch(&self, req: Request) -> Response {
        let ctx = RequestContext::new();
        let path = req.uri().path();

        let Some(handler) = self.routes.get(path) else {
            tracing::debug!(trace_id = %ctx.trace_id(), path, "no route");
            return respond_text(StatusCode::NOT_FOUND, "not found");
        };

        match handler.call(ctx.clone(), req).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(trace_id = %ctx.trace_id(), error = %err, "handler failed");
                respond_text(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}
