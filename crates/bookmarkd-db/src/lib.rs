//! Database connection opener for bookmarkd services.
//!
//! A direct wrapper over the Postgres driver: it takes fully-resolved
//! scalars, opens a connection, spawns the driver task and verifies the
//! database actually answers before handing the client back.

use thiserror::Error;
use tokio_postgres::config::SslMode;
use tokio_postgres::{Client, NoTls};

/// Errors opening a database connection.
#[derive(Error, Debug)]
pub enum DbError {
    /// The connection could not be established.
    #[error("failed to connect to database at {host}:{port}")]
    Connect {
        /// Database host.
        host: String,
        /// Database port.
        port: u16,
        /// Underlying driver error.
        #[source]
        source: tokio_postgres::Error,
    },

    /// The connection opened but the liveness probe failed.
    #[error("database liveness check failed")]
    Ping(#[source] tokio_postgres::Error),
}

/// Opens a connection and verifies the database is actually available.
///
/// The driver's connection task is spawned onto the current runtime; it
/// logs and exits when the connection terminates. The `ssl` flag only
/// selects the requested mode (`Prefer` or `Disable`); the connector is
/// plaintext, so no TLS handshake is performed either way.
///
/// # Errors
///
/// [`DbError::Connect`] if the connection cannot be established,
/// [`DbError::Ping`] if the `SELECT 1` probe fails.
pub async fn open(
    host: &str,
    port: u16,
    dbname: &str,
    user: &str,
    password: &str,
    ssl: bool,
) -> Result<Client, DbError> {
    let mut config = tokio_postgres::Config::new();
    config
        .host(host)
        .port(port)
        .dbname(dbname)
        .user(user)
        .password(password)
        .ssl_mode(if ssl { SslMode::Prefer } else { SslMode::Disable });

    let (client, connection) = config.connect(NoTls).await.map_err(|source| DbError::Connect {
        host: host.to_string(),
        port,
        source,
    })?;

    tokio::spawn(async move {
        if let Err(err) = connection.await {
            tracing::error!(error = %err, "database connection terminated");
        }
    });

    // A trivial query confirms the database answers, not just that the
    // socket opened.
    client.simple_query("SELECT 1").await.map_err(DbError::Ping)?;

    tracing::info!(host, port, dbname, user, "database connection established");
    Ok(client)
}
