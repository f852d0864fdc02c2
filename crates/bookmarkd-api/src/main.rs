//! bm-api: the bookmarkd API service.
//!
//! Declares the service configuration schema, resolves it from the
//! command line, environment variables and compiled-in defaults, then
//! serves HTTP with graceful shutdown. `-h`/`--help` prints the parameter
//! table and exits cleanly.

use std::time::Duration;

use anyhow::Context as _;
use http::StatusCode;
use tracing_subscriber::EnvFilter;

use bookmarkd_config::{Registry, Schema};
use bookmarkd_server::{Server, ServerConfig};
use bookmarkd_web::{request_logger, respond_json, App, Request, RequestContext};

/// Resolved service configuration.
///
/// Parameter declarations live in [`schema`]: each field maps to a
/// command-line name, an environment variable, a default and usage text.
/// Command-line parameters take precedence over environment variables,
/// which take precedence over defaults.
#[derive(Debug, Default)]
struct Config {
    api_host: String,
    api_port: i64,
    db_host: String,
    db_port: i64,
    db_user: String,
    db_password: String,
    read_timeout_secs: u64,
    write_timeout_secs: u64,
    request_timeout_secs: u64,
    shutdown_timeout_secs: u64,
}

fn schema() -> Schema<Config> {
    Schema::<Config>::new()
        .string(
            "api_host",
            "cmd=host,env=BM_API_HOST,default=127.0.0.1,usage=IP or DNS name",
            |c, v| c.api_host = v,
        )
        .int(
            "api_port",
            "cmd=port,env=BM_API_PORT,default=8081,usage=API server port",
            |c, v| c.api_port = v,
        )
        .string(
            "db_host",
            "cmd=dbhost,env=BM_API_DBHOST,default=127.0.0.1,usage=IP or DNS name",
            |c, v| c.db_host = v,
        )
        .int(
            "db_port",
            "cmd=dbport,env=BM_API_DBPORT,default=5432,usage=Port number a database server listens to",
            |c, v| c.db_port = v,
        )
        .string(
            "db_user",
            "cmd=dbuser,env=BM_API_DBUSER,default=postgres,usage=database user name",
            |c, v| c.db_user = v,
        )
        .string(
            "db_password",
            "cmd=dbpwd,env=BM_API_DBPWD,usage=database user password",
            |c, v| c.db_password = v,
        )
        .duration_secs(
            "read_timeout",
            "cmd=srto,env=BM_API_READ_TIMEOUT,default=10,usage=API server read timeout",
            |c, v| c.read_timeout_secs = v,
        )
        .duration_secs(
            "write_timeout",
            "cmd=swto,env=BM_API_WRITE_TIMEOUT,default=10,usage=API server write timeout",
            |c, v| c.write_timeout_secs = v,
        )
        .duration_secs(
            "request_timeout",
            "cmd=rto,env=BM_API_REQUEST_TIMEOUT,default=5,usage=API request timeout",
            |c, v| c.request_timeout_secs = v,
        )
        .duration_secs(
            "shutdown_timeout",
            "cmd=ssto,env=BM_API_SHUTDOWN_TIMEOUT,default=30,usage=Time the server is allowed to finish in-flight work after shutdown has been initiated",
            |c, v| c.shutdown_timeout_secs = v,
        )
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run(std::env::args().collect()).await {
        eprintln!("bm-api: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let schema = schema();
    let registry = Registry::from_schema(&schema)?;

    let mut cfg = Config::default();
    if let Err(err) = registry.apply(&mut cfg, &schema, &args) {
        if err.is_help() {
            registry.print_usage();
            return Ok(());
        }
        return Err(err.into());
    }
    tracing::debug!(
        host = %cfg.api_host,
        port = cfg.api_port,
        db_host = %cfg.db_host,
        db_port = cfg.db_port,
        "configuration resolved"
    );

    // The skeleton has no persistence-backed routes yet; the database is
    // opened only when credentials were supplied.
    if !cfg.db_password.is_empty() {
        let db_port = u16::try_from(cfg.db_port).context("dbport out of range")?;
        let _db = bookmarkd_db::open(
            &cfg.db_host,
            db_port,
            "bookmarks",
            &cfg.db_user,
            &cfg.db_password,
            false,
        )
        .await?;
    }

    let mut app = App::new(vec![request_logger()]);
    app.handle(
        "/",
        |ctx: RequestContext, _req: Request| async move {
            respond_json(
                StatusCode::OK,
                &serde_json::json!({
                    "message": "hello there",
                    "trace_id": ctx.trace_id().to_string(),
                }),
            )
        },
        &[],
    );

    let api_port = u16::try_from(cfg.api_port).context("port out of range")?;
    let server_config = ServerConfig::builder()
        .host(cfg.api_host.as_str())
        .port(api_port)
        .read_timeout(Duration::from_secs(cfg.read_timeout_secs))
        .write_timeout(Duration::from_secs(cfg.write_timeout_secs))
        .request_timeout(Duration::from_secs(cfg.request_timeout_secs))
        .shutdown_timeout(Duration::from_secs(cfg.shutdown_timeout_secs))
        .build();

    Server::new(server_config, app).run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_schema_defaults_resolve() {
        let schema = schema();
        let registry = Registry::from_schema_with_env(&schema, |_| None).unwrap();
        let mut cfg = Config::default();
        registry.apply(&mut cfg, &schema, &argv(&["bm-api"])).unwrap();

        assert_eq!(cfg.api_host, "127.0.0.1");
        assert_eq!(cfg.api_port, 8081);
        assert_eq!(cfg.db_port, 5432);
        assert_eq!(cfg.db_user, "postgres");
        assert_eq!(cfg.db_password, "");
        assert_eq!(cfg.read_timeout_secs, 10);
        assert_eq!(cfg.write_timeout_secs, 10);
        assert_eq!(cfg.request_timeout_secs, 5);
        assert_eq!(cfg.shutdown_timeout_secs, 30);
    }

    #[test]
    fn test_command_line_overrides() {
        let schema = schema();
        let registry = Registry::from_schema_with_env(&schema, |_| None).unwrap();
        let mut cfg = Config::default();
        registry
            .apply(&mut cfg, &schema, &argv(&["bm-api", "-port=9000", "-ssto=5"]))
            .unwrap();
        assert_eq!(cfg.api_port, 9000);
        assert_eq!(cfg.shutdown_timeout_secs, 5);
    }

    #[test]
    fn test_usage_lists_every_parameter() {
        let schema = schema();
        let registry = Registry::from_schema_with_env(&schema, |_| None).unwrap();
        let table = registry.render_usage();
        for name in [
            "-host", "-port", "-dbhost", "-dbport", "-dbuser", "-dbpwd", "-srto", "-swto",
            "-rto", "-ssto",
        ] {
            assert!(table.contains(name), "usage table missing {name}");
        }
    }
}
