//! services/api/src/adapters/users.rs
//!
//! This module contains the in-memory user repository backing the admin
//! dashboard. It implements the `UserRepository` port from the `core` crate.
//! Nothing is persisted; the list resets to the fixtures on every restart.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use study_buddy_core::{
    domain::{AdminUser, UserData, UserRole, UserStatus},
    ports::{PortError, PortResult, UserRepository},
};
use tokio::sync::RwLock;
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A `UserRepository` that keeps every user in a lock-guarded `Vec`.
pub struct InMemoryUserRepository {
    users: RwLock<Vec<AdminUser>>,
}

impl InMemoryUserRepository {
    /// Creates a repository holding the given users.
    pub fn new(users: Vec<AdminUser>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Creates a repository seeded with the three dashboard fixtures.
    pub fn seeded() -> Self {
        Self::new(fixture_users())
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::seeded()
    }
}

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn fixture_users() -> Vec<AdminUser> {
    let now = Utc::now();
    vec![
        AdminUser {
            id: "1".into(),
            name: "Admin User".into(),
            email: "admin@studybuddy.com".into(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            last_active: now,
            documents_processed: 25,
            created_at: day(2024, 1, 1),
        },
        AdminUser {
            id: "2".into(),
            name: "Regular User".into(),
            email: "user@studybuddy.com".into(),
            role: UserRole::User,
            status: UserStatus::Active,
            last_active: now - chrono::Duration::hours(1),
            documents_processed: 12,
            created_at: day(2024, 1, 5),
        },
        AdminUser {
            id: "3".into(),
            name: "John Doe".into(),
            email: "john@example.com".into(),
            role: UserRole::User,
            status: UserStatus::Inactive,
            last_active: now - chrono::Duration::days(1),
            documents_processed: 8,
            created_at: day(2024, 1, 10),
        },
    ]
}

fn not_found(user_id: &str) -> PortError {
    PortError::NotFound(format!("User {} not found", user_id))
}

//=========================================================================================
// `UserRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_users(&self) -> PortResult<Vec<AdminUser>> {
        Ok(self.users.read().await.clone())
    }

    async fn create_user(&self, data: UserData) -> PortResult<AdminUser> {
        let name = data
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| PortError::Validation("User name is required".to_string()))?;
        let email = data
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| PortError::Validation("User email is required".to_string()))?;

        let mut users = self.users.write().await;
        let now = Utc::now();
        // Millisecond ids can collide within a burst; bump until free.
        let mut id_value = now.timestamp_millis();
        while users.iter().any(|u| u.id == id_value.to_string()) {
            id_value += 1;
        }

        let user = AdminUser {
            id: id_value.to_string(),
            name,
            email,
            role: data.role.unwrap_or(UserRole::User),
            status: UserStatus::Active,
            last_active: now,
            documents_processed: 0,
            created_at: now,
        };
        users.push(user.clone());
        info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn update_user(&self, user_id: &str, data: UserData) -> PortResult<AdminUser> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| not_found(user_id))?;

        if let Some(name) = data.name {
            user.name = name;
        }
        if let Some(email) = data.email {
            user.email = email;
        }
        if let Some(role) = data.role {
            user.role = role;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: &str) -> PortResult<AdminUser> {
        let mut users = self.users.write().await;
        let index = users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or_else(|| not_found(user_id))?;
        let removed = users.remove(index);
        info!(user_id = %removed.id, "Deleted user");
        Ok(removed)
    }

    async fn toggle_status(&self, user_id: &str) -> PortResult<AdminUser> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| not_found(user_id))?;
        user.status = user.status.toggled();
        Ok(user.clone())
    }
}
