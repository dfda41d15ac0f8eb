//! In-memory storage backend.
//!
//! Used by the test suite and by `duedesk --memory`, which seeds demo data on
//! start-up.
//!
//! # Example
//!
//! ```rust,ignore
//! use duedesk::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
