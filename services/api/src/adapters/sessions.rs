//! services/api/src/adapters/sessions.rs
//!
//! In-memory implementation of the `AuthSessionStore` port. Sessions are keyed
//! by the opaque id carried in the `session` cookie and vanish on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use study_buddy_core::{
    domain::SessionUser,
    ports::{AuthSessionStore, PortError, PortResult},
};
use tokio::sync::RwLock;
use tracing::debug;

struct AuthSession {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct InMemoryAuthSessionStore {
    sessions: RwLock<HashMap<String, AuthSession>>,
}

impl InMemoryAuthSessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthSessionStore for InMemoryAuthSessionStore {
    async fn create_auth_session(
        &self,
        session_id: &str,
        user: SessionUser,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), AuthSession { user, expires_at });
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<SessionUser> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(session_id) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.user.clone()),
            Some(_) => {
                debug!("Dropping expired auth session");
                sessions.remove(session_id);
                Err(PortError::Unauthorized)
            }
            None => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use study_buddy_core::domain::UserRole;

    fn user() -> SessionUser {
        SessionUser {
            user_id: "2".into(),
            email: "user@studybuddy.com".into(),
            name: "Regular User".into(),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn valid_session_round_trip() {
        let store = InMemoryAuthSessionStore::new();
        store
            .create_auth_session("abc", user(), Utc::now() + Duration::days(30))
            .await
            .unwrap();
        assert_eq!(store.validate_auth_session("abc").await.unwrap(), user());

        store.delete_auth_session("abc").await.unwrap();
        assert!(matches!(
            store.validate_auth_session("abc").await,
            Err(PortError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn expired_session_is_rejected() {
        let store = InMemoryAuthSessionStore::new();
        store
            .create_auth_session("old", user(), Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        assert!(matches!(
            store.validate_auth_session("old").await,
            Err(PortError::Unauthorized)
        ));
    }
}
