//! Database bootstrapper tests

use membership_db::{create_database, ensure_database, AppConfig, BootstrapOutcome};

use crate::common::{capture_logs, test_config, test_config_named, MockServer};

#[test]
fn test_creates_missing_database() {
    let server = MockServer::new();
    let config = test_config();

    let (outcome, logs) =
        capture_logs(|| tokio_test::block_on(create_database(&server, &config)));

    assert!(matches!(outcome, BootstrapOutcome::Created));
    assert!(logs.contains("created successfully"), "logs: {}", logs);
    assert!(server.has_database("app_test"));
    assert_eq!(server.connected_to(), vec!["postgres".to_string()]);
    assert_eq!(server.closes(), 1);
}

#[test]
fn test_existing_database_is_reported_not_raised() {
    let server = MockServer::with_database("app_test");
    let config = test_config();

    let (outcome, logs) =
        capture_logs(|| tokio_test::block_on(create_database(&server, &config)));

    assert!(matches!(outcome, BootstrapOutcome::AlreadyExists));
    assert!(outcome.is_success());
    assert!(logs.contains("already exists"), "logs: {}", logs);
    assert_eq!(server.closes(), 1);
}

#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let server = MockServer::new();
    let config = test_config();

    let first = create_database(&server, &config).await;
    let second = create_database(&server, &config).await;

    assert!(matches!(first, BootstrapOutcome::Created));
    assert!(matches!(second, BootstrapOutcome::AlreadyExists));
    assert_eq!(server.connects(), 2);
    assert_eq!(server.closes(), 2);
}

#[test]
fn test_other_failure_is_reported_and_connection_closed() {
    let server = MockServer::new();
    server.reject_statements("42501", "permission denied to create database");
    let config = test_config();

    let (outcome, logs) =
        capture_logs(|| tokio_test::block_on(create_database(&server, &config)));

    match outcome {
        BootstrapOutcome::Failed(ref err) => {
            assert_eq!(err.sqlstate(), Some("42501"));
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert!(logs.contains("permission denied to create database"), "logs: {}", logs);
    assert!(!server.has_database("app_test"));
    assert_eq!(server.closes(), 1);
}

#[test]
fn test_already_exists_wording_without_sqlstate_is_a_failure() {
    let server = MockServer::new();
    // Message text alone must not be mistaken for the duplicate condition
    server.reject_statements("XX000", "something already exists somewhere");
    let config = test_config();

    let outcome = tokio_test::block_on(create_database(&server, &config));

    assert!(matches!(outcome, BootstrapOutcome::Failed(_)));
    assert_eq!(server.closes(), 1);
}

#[test]
fn test_connection_failure_issues_no_statement() {
    let server = MockServer::new();
    server.refuse_connections("password authentication failed for user \"postgres\"");
    let config = test_config();

    let (outcome, logs) =
        capture_logs(|| tokio_test::block_on(create_database(&server, &config)));

    match outcome {
        BootstrapOutcome::ConnectionFailed(ref err) => assert!(err.is_connection()),
        other => panic!("expected ConnectionFailed, got {:?}", other),
    }
    assert!(logs.contains("password authentication failed"), "logs: {}", logs);
    assert_eq!(server.connects(), 1);
    assert!(server.executed().is_empty());
    assert_eq!(server.closes(), 0);
}

#[tokio::test]
async fn test_close_failure_does_not_change_outcome() {
    let server = MockServer::new();
    server.fail_close();
    let config = test_config();

    let outcome = create_database(&server, &config).await;

    assert!(matches!(outcome, BootstrapOutcome::Created));
    assert_eq!(server.closes(), 1);
}

#[tokio::test]
async fn test_hostile_name_is_created_verbatim_as_one_identifier() {
    let server = MockServer::new();
    let name = "app\"; DROP DATABASE production; --";
    let config = test_config_named(name);

    let outcome = create_database(&server, &config).await;

    assert!(matches!(outcome, BootstrapOutcome::Created));
    assert!(server.has_database(name));
    assert_eq!(
        server.executed(),
        vec![r#"CREATE DATABASE "app""; DROP DATABASE production; --""#.to_string()]
    );
}

#[tokio::test]
async fn test_absent_settings_reach_the_driver_as_connection_failure() {
    // No DB_* variables at all; nothing is rejected before connecting
    let mut config = AppConfig::load_from(None, |_| None).unwrap();
    assert!(config.database.name.is_empty());
    config.database.host = "127.0.0.1".to_string();
    config.database.port = 1;

    let outcome = ensure_database(&config.database).await;

    match outcome {
        BootstrapOutcome::ConnectionFailed(ref err) => assert!(err.is_connection()),
        other => panic!("expected ConnectionFailed, got {:?}", other),
    }
    assert!(!outcome.is_success());
}
