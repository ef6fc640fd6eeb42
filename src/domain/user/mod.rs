//! User aggregate

pub mod model;
pub mod repository;

pub use model::{NewUser, User, UserUpdate};
pub use repository::UserRepository;
