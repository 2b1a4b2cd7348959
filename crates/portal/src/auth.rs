use async_trait::async_trait;
use shared::domain::{Language, User, UserId, UserRole};
use thiserror::Error;
use tracing::{info, warn};

use crate::translations::PortalText;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    /// Message shown on the sign-in form.
    pub fn user_message(&self, language: Language) -> &'static str {
        PortalText::for_language(language).invalid_credentials
    }
}

/// Resolves a username/password pair to a known user.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> Result<User, AuthError>;
}

struct DemoIdentity {
    username: &'static str,
    password: &'static str,
    id: &'static str,
    name: &'static str,
    role: UserRole,
}

const DEMO_IDENTITIES: &[DemoIdentity] = &[
    DemoIdentity {
        username: "doctor",
        password: "doctor",
        id: "doc-1",
        name: "Dr. Martin",
        role: UserRole::Doctor,
    },
    DemoIdentity {
        username: "personnel",
        password: "personnel",
        id: "staff-1",
        name: "Sarah Staff",
        role: UserRole::Personnel,
    },
    DemoIdentity {
        username: "sophie",
        password: "sophie",
        id: "pat-1",
        name: "Sophie Dubois",
        role: UserRole::Patient,
    },
];

/// Fixed demo accounts. Not a security boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoDirectory;

#[async_trait]
impl CredentialVerifier for DemoDirectory {
    async fn verify(&self, username: &str, password: &str) -> Result<User, AuthError> {
        DEMO_IDENTITIES
            .iter()
            .find(|identity| identity.username == username && identity.password == password)
            .map(|identity| User {
                id: UserId::new(identity.id),
                username: identity.username.to_string(),
                name: identity.name.to_string(),
                role: identity.role,
            })
            .ok_or(AuthError::InvalidCredentials)
    }
}

/// Holds the signed-in user, if any.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    user: Option<User>,
}

impl AuthSession {
    /// A failed attempt leaves any current user signed in.
    pub async fn login(
        &mut self,
        verifier: &dyn CredentialVerifier,
        username: &str,
        password: &str,
    ) -> Result<&User, AuthError> {
        match verifier.verify(username, password).await {
            Ok(user) => {
                info!(user_id = %user.id, role = ?user.role, "signed in");
                Ok(self.user.insert(user))
            }
            Err(error) => {
                warn!(username, %error, "sign-in rejected");
                Err(error)
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "signed out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
