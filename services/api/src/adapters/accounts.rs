//! services/api/src/adapters/accounts.rs
//!
//! The fixed set of login accounts. Passwords are argon2-hashed once when the
//! adapter is built, so plain-text passwords never sit in the lookup table.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use study_buddy_core::{
    domain::{SessionUser, UserCredentials, UserRole},
    ports::{AccountService, PortError, PortResult},
};

pub const DEFAULT_USER_EMAIL: &str = "user@studybuddy.com";
pub const DEFAULT_USER_PASSWORD: &str = "user123";

/// An `AccountService` over a small, immutable credential list.
pub struct StaticAccounts {
    accounts: Vec<UserCredentials>,
}

fn hash_password(password: &str) -> PortResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {}", e)))
}

impl StaticAccounts {
    /// Builds the admin account from the given credentials plus the regular demo user.
    pub fn new(admin_email: &str, admin_password: &str) -> PortResult<Self> {
        let accounts = vec![
            UserCredentials {
                user: SessionUser {
                    user_id: "1".into(),
                    email: admin_email.to_string(),
                    name: "Admin User".into(),
                    role: UserRole::Admin,
                },
                hashed_password: hash_password(admin_password)?,
            },
            UserCredentials {
                user: SessionUser {
                    user_id: "2".into(),
                    email: DEFAULT_USER_EMAIL.into(),
                    name: "Regular User".into(),
                    role: UserRole::User,
                },
                hashed_password: hash_password(DEFAULT_USER_PASSWORD)?,
            },
        ];
        Ok(Self { accounts })
    }
}

#[async_trait]
impl AccountService for StaticAccounts {
    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email.trim()))
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("No account for {}", email)))
    }
}
