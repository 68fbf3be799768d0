//! Integration tests for the database tools
//!
//! These tests drive the public bootstrap and migration entry points against
//! in-memory stand-ins for the PostgreSQL server.

mod bootstrap_tests;
