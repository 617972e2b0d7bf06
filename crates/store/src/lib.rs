//! Repository implementations for the domain's store ports.
//!
//! Two backends are provided:
//! - [`MemoryStore`] — HashMaps behind async locks, for tests and the
//!   no-database run mode
//! - [`PostgresStore`] — sqlx-backed, with one SQL transaction per
//!   aggregate write

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
