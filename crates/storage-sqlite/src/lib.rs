//! SQLite storage implementation for the Primevest ledger core.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `primevest-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. Everything else is database-agnostic and works with traits.
//!
//! All mutating work funnels through a single writer actor that owns one
//! connection and executes each job inside an immediate transaction. That
//! serializes every wallet read-modify-write with its ledger-entry insert,
//! which is what makes the balance invariants race-free.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod assets;
pub mod bonuses;
pub mod currencies;
pub mod investments;
pub mod wallets;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from primevest-core for convenience
pub use primevest_core::errors::{DatabaseError, Error, Result};
