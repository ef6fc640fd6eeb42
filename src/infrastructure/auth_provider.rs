//! Database-backed credential verification
//!
//! The production implementation of the session store's auth
//! collaborator. Verification reads the user by email and checks the
//! bcrypt hash; there is no fallback to built-in credentials.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::application::session::{AuthError, AuthProvider};
use crate::auth::password::verify_password;
use crate::domain::user::User;
use crate::domain::RepositoryProvider;

pub struct DbAuthProvider {
    repos: Arc<dyn RepositoryProvider>,
}

impl DbAuthProvider {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl AuthProvider for DbAuthProvider {
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .repos
            .users()
            .find_by_email(email)
            .await
            .map_err(|e| {
                warn!(error = %e, "User lookup failed during sign-in");
                AuthError::ServiceUnavailable
            })?;

        let Some(user) = user else {
            return Err(AuthError::InvalidCredentials);
        };

        let password_valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !password_valid {
            return Err(AuthError::InvalidCredentials);
        }

        // Credentials are valid but the account is deactivated: a
        // distinct failure, same unauthenticated outcome.
        if !user.is_active {
            return Err(AuthError::InactiveAccount);
        }

        Ok(user)
    }
}
