#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database connection bootstrap for the market data store.
//!
//! The store is populated and migrated by an external data platform; this
//! workspace only reads from it, so there is no migration runner here —
//! just the connection setup shared by the server and any CLI tooling.

pub mod db;

/// Errors that can occur while establishing a database connection.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Connection initialization error.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of what went wrong.
        message: String,
    },
}
