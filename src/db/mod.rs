//! Database layer
//!
//! This module handles the PostgreSQL side of both tools:
//! - Opening single, unpooled connections from [`DatabaseConfig`]
//! - The [`SqlExecutor`] capability handed to bootstrap and migration code
//! - The [`Connector`]/[`DbConnection`] seam both tools connect through
//! - DDL rendering helpers in [`schema`]

pub mod bootstrap;
pub mod migrations;
pub mod schema;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::utils::{DbError, DbResult};

/// Anything that can run a single SQL statement
#[async_trait]
pub trait SqlExecutor: Send {
    async fn execute_sql(&mut self, sql: &str) -> DbResult<()>;
}

#[async_trait]
impl SqlExecutor for PgConnection {
    async fn execute_sql(&mut self, sql: &str) -> DbResult<()> {
        debug!(statement = %sql, "Executing statement");
        let conn: &mut PgConnection = self;
        // Simple query protocol: DDL such as CREATE DATABASE cannot be prepared
        sqlx::Executor::execute(conn, sqlx::raw_sql(sql)).await?;
        Ok(())
    }
}

/// An open connection that must be closed explicitly
#[async_trait]
pub trait DbConnection: SqlExecutor {
    /// Close the connection, consuming it
    async fn close(self) -> DbResult<()>;
}

#[async_trait]
impl DbConnection for PgConnection {
    async fn close(self) -> DbResult<()> {
        Connection::close(self).await?;
        Ok(())
    }
}

/// Opens connections to a named database on the configured server
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: DbConnection;

    async fn connect(
        &self,
        config: &DatabaseConfig,
        database: &str,
    ) -> DbResult<Self::Connection>;
}

/// Connects over the PostgreSQL wire protocol
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    type Connection = PgConnection;

    async fn connect(&self, config: &DatabaseConfig, database: &str) -> DbResult<PgConnection> {
        connect(config, database).await
    }
}

/// Connection options for `database` on the configured server
pub fn connect_options(config: &DatabaseConfig, database: &str) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(database)
}

/// Open a single connection to `database`.
///
/// Every failure here, including rejected credentials, is reported as
/// [`DbError::Connection`].
pub async fn connect(config: &DatabaseConfig, database: &str) -> DbResult<PgConnection> {
    debug!(
        host = %config.host,
        port = config.port,
        database = %database,
        "Opening database connection"
    );
    PgConnection::connect_with(&connect_options(config, database))
        .await
        .map_err(DbError::from_connect)
}
