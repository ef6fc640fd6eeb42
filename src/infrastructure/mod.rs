pub mod auth_provider;
pub mod database;

pub use auth_provider::DbAuthProvider;
pub use database::{init_database, DatabaseConfig};
pub use database::repositories::SeaOrmRepositoryProvider;
