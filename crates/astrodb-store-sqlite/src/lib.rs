//! SQLite backend for the astrodb observation store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every store operation runs its whole
//! statement sequence inside a single `call`, so sequences never interleave.

mod encode;
mod plan;
mod reads;
mod schema;
mod store;
mod writes;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
