// ABOUTME: PostgreSQL utilities module
// ABOUTME: Exports connection management for the target database

pub mod connection;

pub use connection::{connect, connect_with_retry};
