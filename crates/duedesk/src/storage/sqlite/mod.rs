//! SQLite storage backend implementation.
//!
//! This module provides a SQLite-based implementation of the repository traits
//! using `rusqlite` for synchronous operations and `tokio-rusqlite` for async wrapping.
//! Filters are compiled to SQL in [`filter`]; embedded arrays live in JSON columns.

mod conversions;
mod error;
mod filter;
mod repository;
mod schema;

pub use repository::SqliteRepository;
