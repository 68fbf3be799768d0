//! Test fixtures for configuration

use membership_db::config::DatabaseConfig;

/// Connection settings pointing at the `app_test` database
pub fn test_config() -> DatabaseConfig {
    test_config_named("app_test")
}

pub fn test_config_named(name: &str) -> DatabaseConfig {
    DatabaseConfig {
        host: "localhost".to_string(),
        port: 5432,
        user: "postgres".to_string(),
        password: "postgres".to_string(),
        name: name.to_string(),
        admin_database: "postgres".to_string(),
    }
}
