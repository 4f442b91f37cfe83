use std::sync::Arc;

use pantry::user::User;

use crate::store::{Collection, DocumentStore, StoreResult};

/// Users are partitioned by their own id; email and refresh-token lookups
/// are cross-partition scans, matching the original store's queries.
#[derive(Clone)]
pub struct UserRepository {
    users: Collection<User>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: Collection::new(store),
        }
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<User>> {
        self.users.get(id).await
    }

    /// Emails are stored lowercased; the lookup lowercases its argument so
    /// login is case-insensitive.
    pub async fn by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email.to_lowercase();
        let users = self.users.scan().await?;
        Ok(users
            .into_iter()
            .find(|u| u.email == email && !u.is_deleted))
    }

    pub async fn by_refresh_token(&self, token: &str) -> StoreResult<Option<User>> {
        let users = self.users.scan().await?;
        Ok(users
            .into_iter()
            .find(|u| u.refresh_token.as_deref() == Some(token) && !u.is_deleted))
    }

    pub async fn create(&self, user: &User) -> StoreResult<()> {
        self.users.create(user).await
    }

    pub async fn update(&self, user: &User) -> StoreResult<()> {
        self.users.upsert(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry::user::UserRole;

    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn email_lookup_is_case_insensitive() {
        let repo = UserRepository::new(Arc::new(MemoryStore::new()));
        let user = User::new("Asha", "Rao", "asha@example.com", "999", "digest", UserRole::User);
        repo.create(&user).await.unwrap();

        let found = repo.by_email("Asha@Example.COM").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_token_lookup() {
        let repo = UserRepository::new(Arc::new(MemoryStore::new()));
        let mut user = User::new("Asha", "Rao", "asha@example.com", "999", "digest", UserRole::User);
        user.refresh_token = Some("tok-1".into());
        repo.create(&user).await.unwrap();

        assert!(repo.by_refresh_token("tok-1").await.unwrap().is_some());
        assert!(repo.by_refresh_token("tok-2").await.unwrap().is_none());
    }
}
