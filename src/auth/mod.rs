//! Authentication and Authorization module
//!
//! Provides JWT token-based authentication tied to the session store,
//! bcrypt password hashing, and the route-guard middleware layers.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{create_token, verify_token, Claims, JwtConfig};
pub use middleware::{
    auth_middleware, require_admin, require_can_edit, require_can_manage_users, require_can_view,
    AuthState, CurrentUser,
};
pub use password::{hash_password, verify_password};
