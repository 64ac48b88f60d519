pub mod db;
pub mod models;
pub mod pagination;
pub mod repos;
pub mod store;

pub use repos::PgStore;
pub use store::memory::MemStore;
