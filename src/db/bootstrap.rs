//! Database bootstrapper
//!
//! Ensures the application database exists before anything else touches it.
//! The routine is best-effort: it reports what happened and never returns an
//! error. Running it against an existing database is a successful no-op.

use tracing::{debug, error, info, warn};

use super::schema::quote_identifier;
use super::{Connector, DbConnection, PgConnector, SqlExecutor};
use crate::config::DatabaseConfig;
use crate::utils::DbError;

/// Result of a bootstrap run
#[derive(Debug)]
pub enum BootstrapOutcome {
    Created,
    AlreadyExists,
    /// The server rejected `CREATE DATABASE` for another reason
    Failed(DbError),
    /// No statement was issued
    ConnectionFailed(DbError),
}

impl BootstrapOutcome {
    /// Whether the database is known to exist afterwards
    pub fn is_success(&self) -> bool {
        matches!(self, BootstrapOutcome::Created | BootstrapOutcome::AlreadyExists)
    }

    /// Operator-facing status line for `database`
    pub fn describe(&self, database: &str) -> String {
        match self {
            BootstrapOutcome::Created => {
                format!("[OK] Database \"{}\" created successfully", database)
            }
            BootstrapOutcome::AlreadyExists => {
                format!("[OK] Database \"{}\" already exists", database)
            }
            BootstrapOutcome::Failed(err) => {
                format!("[FAIL] Error creating database \"{}\": {}", database, err)
            }
            BootstrapOutcome::ConnectionFailed(err) => {
                format!("[FAIL] Unable to connect to the database server: {}", err)
            }
        }
    }
}

/// `CREATE DATABASE` statement for `name`, quoted as an identifier
pub fn create_database_statement(name: &str) -> String {
    format!("CREATE DATABASE {}", quote_identifier(name))
}

/// Create `config.name` unless it already exists.
///
/// The connection is closed on every path that opened one; a failure to close
/// is logged and does not change the outcome.
pub async fn create_database<C: Connector>(
    connector: &C,
    config: &DatabaseConfig,
) -> BootstrapOutcome {
    info!(
        "Connecting to {}:{}/{} as {}",
        config.host, config.port, config.admin_database, config.user
    );

    let mut conn = match connector.connect(config, &config.admin_database).await {
        Ok(conn) => conn,
        Err(e) => {
            let outcome = BootstrapOutcome::ConnectionFailed(e);
            error!("{}", outcome.describe(&config.name));
            return outcome;
        }
    };

    let statement = create_database_statement(&config.name);
    debug!(statement = %statement, "Issuing CREATE DATABASE");

    let outcome = match conn.execute_sql(&statement).await {
        Ok(()) => BootstrapOutcome::Created,
        Err(e) if e.is_duplicate_database() => BootstrapOutcome::AlreadyExists,
        Err(e) => BootstrapOutcome::Failed(e),
    };

    if let Err(e) = conn.close().await {
        warn!("Failed to close admin connection cleanly: {}", e);
    }

    if outcome.is_success() {
        info!("{}", outcome.describe(&config.name));
    } else {
        error!("{}", outcome.describe(&config.name));
    }

    outcome
}

/// [`create_database`] against a real PostgreSQL server
pub async fn ensure_database(config: &DatabaseConfig) -> BootstrapOutcome {
    create_database(&PgConnector, config).await
}
