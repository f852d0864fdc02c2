//! Handler and middleware composition.
//!
//! A [`Handler`] is an async function from context + request to response;
//! a [`Middleware`] wraps one handler into another. [`wrap`] applies a
//! slice of middleware so the first element becomes the outermost layer,
//! matching the order in which an application lists them.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::error::WebError;
use crate::{Request, Response};

/// Boxed future returned by handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An async request handler.
pub trait Handler: Send + Sync + 'static {
    /// Processes one request.
    fn call(&self, ctx: RequestContext, req: Request) -> BoxFuture<'static, Result<Response, WebError>>;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, WebError>> + Send + 'static,
{
    fn call(&self, ctx: RequestContext, req: Request) -> BoxFuture<'static, Result<Response, WebError>> {
        Box::pin(self(ctx, req))
    }
}

/// A shareable, type-erased handler.
pub type BoxHandler = Arc<dyn Handler>;

/// A function that decorates a handler with additional behavior.
pub type Middleware = Arc<dyn Fn(BoxHandler) -> BoxHandler + Send + Sync>;

/// Wraps `handler` in `middleware`, first element outermost.
#[must_use]
pub fn wrap(middleware: &[Middleware], handler: BoxHandler) -> BoxHandler {
    middleware
        .iter()
        .rev()
        .fold(handler, |handler, mw| mw(handler))
}

/// Middleware that logs request start and completion with the trace id.
#[must_use]
pub fn request_logger() -> Middleware {
    Arc::new(|next: BoxHandler| {
        Arc::new(move |ctx: RequestContext, req: Request| {
            let next = Arc::clone(&next);
            async move {
                tracing::info!(
                    trace_id = %ctx.trace_id(),
                    method = %req.method(),
                    path = %req.uri().path(),
                    "request started"
                );
                let result = next.call(ctx.clone(), req).await;
                match &result {
                    Ok(response) => tracing::info!(
                        trace_id = %ctx.trace_id(),
                        status = response.status().as_u16(),
                        elapsed = ?ctx.elapsed(),
                        "request completed"
                    ),
                    Err(err) => tracing::error!(
                        trace_id = %ctx.trace_id(),
                        error = %err,
                        elapsed = ?ctx.elapsed(),
                        "request failed"
                    ),
                }
                result
            }
        }) as BoxHandler
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::Full;

    fn request() -> Request {
        http::Request::builder()
            .uri("/hello")
            .body(Bytes::new())
            .unwrap()
    }

    fn tagging(tag: &'static str) -> Middleware {
        Arc::new(move |next: BoxHandler| {
            Arc::new(move |ctx: RequestContext, mut req: Request| {
                let next = Arc::clone(&next);
                req.headers_mut()
                    .append("x-tags", http::HeaderValue::from_static(tag));
                async move { next.call(ctx, req).await }
            }) as BoxHandler
        })
    }

    #[tokio::test]
    async fn test_wrap_applies_first_middleware_outermost() {
        let handler: BoxHandler = Arc::new(|_ctx: RequestContext, req: Request| async move {
            let tags: Vec<_> = req
                .headers()
                .get_all("x-tags")
                .iter()
                .map(|v| v.to_str().unwrap().to_string())
                .collect();
            let body = Bytes::from(tags.join(","));
            Ok(http::Response::builder().body(Full::new(body)).unwrap())
        });

        let wrapped = wrap(&[tagging("outer"), tagging("inner")], handler);
        let response = wrapped
            .call(RequestContext::new(), request())
            .await
            .unwrap();
        assert_eq!(response.status(), http::StatusCode::OK);
        // The outer middleware runs first, so its tag lands first.
        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(body, Bytes::from("outer,inner"));
    }

    #[tokio::test]
    async fn test_request_logger_passes_through() {
        let handler: BoxHandler = Arc::new(|_ctx: RequestContext, _req: Request| async move {
            Ok(http::Response::builder()
                .status(http::StatusCode::NO_CONTENT)
                .body(Full::new(Bytes::new()))
                .unwrap())
        });
        let wrapped = wrap(&[request_logger()], handler);
        let response = wrapped
            .call(RequestContext::new(), request())
            .await
            .unwrap();
        assert_eq!(response.status(), http::StatusCode::NO_CONTENT);
    }
}
