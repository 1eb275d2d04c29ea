use crate::domain::repository::UserRepository;
use crate::domain::user::{SentinelIdentity, User};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Resolves who a request acts for. Until sign-in exists every request maps to
/// the configured sentinel identity.
pub struct UserService<R: UserRepository> {
    user_repository: Arc<R>,
    identity: SentinelIdentity,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(user_repository: Arc<R>, identity: SentinelIdentity) -> Self {
        Self {
            user_repository,
            identity,
        }
    }

    #[instrument(skip(self), fields(email = %self.identity.email))]
    pub async fn resolve_current_user(&self) -> Result<User> {
        let user = self
            .user_repository
            .get_or_create_user(&self.identity.email, &self.identity.name)
            .await?;
        debug!(user_id = user.id, "Current user resolved");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::database::connect_in_memory;
    use crate::data::sqlite::SqliteStore;

    #[tokio::test]
    async fn test_resolve_current_user_returns_same_id_twice() {
        let store = Arc::new(SqliteStore::new(connect_in_memory().await.unwrap()));
        let service = UserService::new(store.clone(), SentinelIdentity::default());

        let first = service.resolve_current_user().await.unwrap();
        let second = service.resolve_current_user().await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.email, "test@example.com");
        assert_eq!(first.name.as_deref(), Some("Test User"));
    }

    #[tokio::test]
    async fn test_resolve_current_user_uses_configured_identity() {
        let store = Arc::new(SqliteStore::new(connect_in_memory().await.unwrap()));
        let identity = SentinelIdentity {
            email: "dev@localhost".to_string(),
            name: "Dev".to_string(),
        };
        let service = UserService::new(store.clone(), identity);

        let user = service.resolve_current_user().await.unwrap();
        let stored = store.get_or_create_user("dev@localhost", "Someone else").await.unwrap();
        assert_eq!(user.id, stored.id);
        assert_eq!(stored.name.as_deref(), Some("Dev"));
    }
}
