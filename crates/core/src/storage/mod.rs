mod error;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use traits::{EventRepository, UserRepository};
pub use types::{
    DeadlinePart, EventFilter, EventSort, EventUpdate, SortDirection, SortField, SortKey,
    UserFilter, UserUpdate, WriteResult,
};
