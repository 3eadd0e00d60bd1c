use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Member;
use super::MemberStore;
use super::SettingsStore;
use super::StoreData;
use super::StoreError;
use crate::domain::IntegrationSettings;

/// Settings and members held in memory, behind a `RwLock`. Nothing survives a
/// restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreData>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<IntegrationSettings, StoreError> {
        Ok(self.inner.read().await.settings.clone())
    }

    async fn save(
        &self,
        settings: IntegrationSettings,
    ) -> Result<(), StoreError> {
        self.inner.write().await.settings = settings;
        Ok(())
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn insert_member(
        &self,
        member: Member,
    ) -> Result<(), StoreError> {
        self.inner.write().await.insert_member(member)
    }

    async fn get_member(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Member>, StoreError> {
        Ok(self.inner.read().await.member(user_id).cloned())
    }

    async fn list_members(&self) -> Result<Vec<Member>, StoreError> {
        Ok(self.inner.read().await.members.clone())
    }

    async fn get_meta(
        &self,
        user_id: Uuid,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        self.inner.read().await.get_meta(user_id, key)
    }

    async fn update_meta(
        &self,
        user_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let mut data = self.inner.write().await;
        data.member_mut(user_id)?
            .meta
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_meta(
        &self,
        user_id: Uuid,
        key: &str,
    ) -> Result<(), StoreError> {
        let mut data = self.inner.write().await;
        data.member_mut(user_id)?.meta.remove(key);
        Ok(())
    }
}
