//! # Fund Disbursement Tracking Service
//!
//! Role-based REST service for tracking government fund disbursements.
//!
//! ## Architecture
//!
//! - **domain**: Core business entities, the access-control resolver
//!   (roles, capabilities, route guard, navigation filter) and
//!   repository traits
//! - **application**: Session store, disbursement and report services
//! - **infrastructure**: Database (SeaORM), credential verification
//! - **api**: REST API with Swagger documentation
//! - **auth**: JWT authentication and guard middleware

pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, DbAuthProvider, SeaOrmRepositoryProvider};

// Re-export API router
pub use api::create_api_router;

// Re-export the session store
pub use application::session::{SessionStore, SharedSessionStore};
