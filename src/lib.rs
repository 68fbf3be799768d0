//! Membership DB Library
//!
//! Database lifecycle tools for the membership web application: creating the
//! application database on a PostgreSQL server, and running its schema
//! migration steps.

pub mod config;
pub mod db;
pub mod logging;
pub mod utils;

pub use config::AppConfig;
pub use db::bootstrap::{create_database, ensure_database, BootstrapOutcome};
pub use db::migrations::{Direction, Migration};
pub use db::SqlExecutor;
pub use utils::{DbError, DbResult};
