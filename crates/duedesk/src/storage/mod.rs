//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `duedesk_core::storage`. Backends are compiled in via feature
//! flags and the CLI picks one at runtime.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): `Vec`-backed repository behind a `tokio` lock
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! # Examples
//!
//! Build with SQLite only:
//! ```bash
//! cargo build -p duedesk --no-default-features --features sqlite
//! ```

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p duedesk --features sqlite"
);

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
