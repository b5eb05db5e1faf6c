//! This module acts as a central hub for all database-related logic.
//! The flows only see the `Store` trait; `PgStore` and `MemoryStore` implement it,
//! and the per-table submodules hold the raw SQL used by `PgStore`.

pub mod init;
pub mod listings;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod reviews;
pub mod searches;
pub mod store;
pub mod users;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{Store, StoreError, StoreResult};
