pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;
#[cfg(test)]
pub(crate) mod unreachable;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::Store;
#[cfg(test)]
pub(crate) use unreachable::UnreachableStore;
