//! HTTP server.
//!
//! A TCP accept loop feeding hyper's http1 connection driver. The server
//! owns a fully-built [`App`] and a [`ServerConfig`] of resolved scalars;
//! it never consults the environment itself. Shutdown is cooperative:
//! the accept loop stops on the signal, in-flight connections get a
//! graceful close, and the drain is bounded by the shutdown timeout.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;

use bookmarkd_web::{respond_text, App, Response};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::shutdown::ShutdownSignal;

/// The bookmarkd HTTP server.
///
/// # Example
///
/// ```rust,ignore
/// use bookmarkd_server::{Server, ServerConfig};
/// use bookmarkd_web::App;
///
/// let app = App::new(vec![]);
/// let server = Server::new(ServerConfig::default(), app);
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    app: Arc<App>,
}

impl Server {
    /// Creates a server over the given app.
    #[must_use]
    pub fn new(config: ServerConfig, app: App) -> Self {
        Self {
            config,
            app: Arc::new(app),
        }
    }

    /// Runs until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the configured address cannot be
    /// bound.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals())
            .await
    }

    /// Runs with a caller-controlled shutdown signal (useful in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the configured address cannot be
    /// bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr).await.map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
        tracing::info!(%addr, "server listening");

        let mut connections = JoinSet::new();
        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        connections.spawn(serve_connection(
                            stream,
                            remote,
                            self.config.clone(),
                            Arc::clone(&self.app),
                            shutdown.clone(),
                        ));
                    }
                    Err(err) => tracing::error!(error = %err, "failed to accept connection"),
                },
                _ = shutdown.recv() => {
                    tracing::info!("shutdown signal received, stopping listener");
                    break;
                }
            }
            // Reap connections that have already finished.
            while connections.try_join_next().is_some() {}
        }

        let timeout = self.config.shutdown_timeout();
        tracing::info!(active = connections.len(), ?timeout, "waiting for in-flight connections");
        let drained = tokio::time::timeout(timeout, async {
            while connections.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            tracing::warn!(
                active = connections.len(),
                "shutdown timeout reached, aborting remaining connections"
            );
            connections.abort_all();
        } else {
            tracing::info!("all connections closed");
        }

        tracing::info!("server stopped");
        Ok(())
    }
}

/// Drives one connection to completion, honoring graceful shutdown.
async fn serve_connection(
    stream: TcpStream,
    remote: SocketAddr,
    config: ServerConfig,
    app: Arc<App>,
    shutdown: ShutdownSignal,
) {
    let io = TokioIo::new(stream);
    let request_timeout = config.request_timeout();
    let service = service_fn(move |req: http::Request<Incoming>| {
        let app = Arc::clone(&app);
        async move { Ok::<_, Infallible>(handle_request(&app, req, request_timeout).await) }
    });

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .header_read_timeout(config.read_timeout());
    let conn = builder.serve_connection(io, service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => {
            if let Err(err) = result {
                tracing::debug!(%remote, error = %err, "connection closed with error");
            }
        }
        _ = shutdown.recv() => {
            conn.as_mut().graceful_shutdown();
            // The in-flight exchange gets the write budget to flush.
            if tokio::time::timeout(config.write_timeout(), conn.as_mut()).await.is_err() {
                tracing::debug!(%remote, "connection did not drain within the write timeout");
            }
        }
    }
}

/// Collects the body, dispatches through the app under the request
/// deadline, and maps failures to plain-text error responses.
async fn handle_request(
    app: &App,
    req: http::Request<Incoming>,
    request_timeout: Duration,
) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            tracing::error!(error = %err, "failed to read request body");
            return respond_text(StatusCode::BAD_REQUEST, "failed to read request body");
        }
    };
    let request = http::Request::from_parts(parts, bytes);

    match tokio::time::timeout(request_timeout, app.dispatch(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!("request handling timed out");
            respond_text(StatusCode::GATEWAY_TIMEOUT, "request timed out")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookmarkd_web::{respond_json, Request, RequestContext};
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new(vec![]);
        app.handle(
            "/hello",
            |_ctx: RequestContext, _req: Request| async move {
                respond_json(StatusCode::OK, &serde_json::json!({"hello": "there"}))
            },
            &[],
        );
        app
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        // Occupy a port first so the server's bind collides.
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let config = ServerConfig::builder().host("127.0.0.1").port(port).build();
        let server = Server::new(config, App::new(vec![]));
        let result = server.run_with_shutdown(ShutdownSignal::new()).await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_server_stops_on_shutdown_signal() {
        let config = ServerConfig::builder()
            .host("127.0.0.1")
            .port(0)
            .shutdown_timeout(Duration::from_millis(100))
            .build();
        let server = Server::new(config, test_app());
        let shutdown = ShutdownSignal::new();
        let trigger = shutdown.clone();
        let handle = tokio::spawn(server.run_with_shutdown(shutdown));

        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.trigger();

        let result = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("server did not stop after shutdown")
            .unwrap();
        assert!(result.is_ok());
    }
}
