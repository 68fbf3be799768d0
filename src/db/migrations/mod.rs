//! Schema migrations
//!
//! Each step is a [`Migration`] with a forward and a backward operation. Steps
//! never handle their own errors: whatever the server reports is returned to
//! the host unchanged. The host here is [`run_step`], which wraps one step in
//! one transaction on a connection opened through a [`Connector`].

mod widen_membership_price;

pub use widen_membership_price::WidenMembershipPrice;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{Connector, DbConnection, PgConnector, SqlExecutor};
use crate::config::DatabaseConfig;
use crate::utils::DbResult;

/// A reversible schema change
#[async_trait]
pub trait Migration: Send + Sync {
    /// Stable identifier, also used on the command line
    fn name(&self) -> &'static str;

    async fn up(&self, executor: &mut dyn SqlExecutor) -> DbResult<()>;

    async fn down(&self, executor: &mut dyn SqlExecutor) -> DbResult<()>;
}

/// Which half of a migration to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("Unknown migration direction: {}", other)),
        }
    }
}

/// All known steps, oldest first
pub fn registered() -> Vec<Box<dyn Migration>> {
    vec![Box::new(WidenMembershipPrice)]
}

/// Look up a registered step by name
pub fn find(name: &str) -> Option<Box<dyn Migration>> {
    registered().into_iter().find(|m| m.name() == name)
}

/// Run one direction of `migration` on `executor`
pub async fn apply(
    migration: &dyn Migration,
    direction: Direction,
    executor: &mut dyn SqlExecutor,
) -> DbResult<()> {
    match direction {
        Direction::Up => migration.up(executor).await,
        Direction::Down => migration.down(executor).await,
    }
}

/// Connect to the target database and run one direction of `migration`
/// inside a single transaction.
///
/// The transaction is committed on success and rolled back on failure, and
/// the connection is closed either way. The step's error is returned as-is.
pub async fn run_step<C: Connector>(
    connector: &C,
    config: &DatabaseConfig,
    migration: &dyn Migration,
    direction: Direction,
) -> DbResult<()> {
    let mut conn = connector.connect(config, &config.name).await?;

    info!("Running migration {} ({})", migration.name(), direction);
    let result = run_in_transaction(&mut conn, migration, direction).await;

    if let Err(e) = conn.close().await {
        warn!("Failed to close connection: {}", e);
    }

    if result.is_ok() {
        info!("[OK] Migration {} ({}) applied", migration.name(), direction);
    }
    result
}

/// [`run_step`] against a real PostgreSQL server
pub async fn migrate(
    config: &DatabaseConfig,
    migration: &dyn Migration,
    direction: Direction,
) -> DbResult<()> {
    run_step(&PgConnector, config, migration, direction).await
}

async fn run_in_transaction<E: SqlExecutor>(
    conn: &mut E,
    migration: &dyn Migration,
    direction: Direction,
) -> DbResult<()> {
    conn.execute_sql("BEGIN").await?;

    match apply(migration, direction, &mut *conn).await {
        Ok(()) => conn.execute_sql("COMMIT").await,
        Err(e) => {
            if let Err(rollback_err) = conn.execute_sql("ROLLBACK").await {
                warn!("Rollback after failed migration also failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
