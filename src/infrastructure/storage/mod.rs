//! Storage infrastructure - backend selection, pooling and migrations

mod factory;
pub mod migrations;

pub use factory::{connect_pool, StorageType};
pub use migrations::{pending_migrations, run_migrations, Migration, PostgresMigrator};
