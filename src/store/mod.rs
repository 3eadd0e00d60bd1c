//! Persistence for the integration settings and the member directory.
//!
//! Both stores are traits so that the routes and the registration hooks can
//! be handed whichever backend `configuration::StorageSettings` asks for:
//! `MemoryStore` (lost on restart, used by tests) or `FileStore` (a single
//! JSON document on disk). Each backend implements both traits.

mod file;
mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
pub use file::FileStore;
pub use memory::MemoryStore;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::IntegrationSettings;
use crate::domain::MemberEmail;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("No member with id {0}")]
    UnknownMember(Uuid),
    #[error("Member {0} already exists")]
    DuplicateMember(Uuid),
    #[error("Could not read or write the store file")]
    Io(#[from] std::io::Error),
    #[error("Store file is not valid JSON")]
    Serialization(#[from] serde_json::Error),
}

/// A registered member, plus free-form metadata (`"rcp_subscribed_to_getresponse"
/// = "yes"` and the like) attached to them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: Uuid,
    pub email: MemberEmail,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl Member {
    pub fn new(
        email: MemberEmail,
        first_name: String,
        last_name: String,
    ) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            email,
            first_name,
            last_name,
            meta: BTreeMap::new(),
        }
    }
}

/// The integration's configuration record. There is always one: before the
/// first save, `load` returns `IntegrationSettings::default()`.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<IntegrationSettings, StoreError>;

    /// Replace the record wholesale
    async fn save(
        &self,
        settings: IntegrationSettings,
    ) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn insert_member(
        &self,
        member: Member,
    ) -> Result<(), StoreError>;

    async fn get_member(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Member>, StoreError>;

    /// In registration order
    async fn list_members(&self) -> Result<Vec<Member>, StoreError>;

    async fn get_meta(
        &self,
        user_id: Uuid,
        key: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite a metadata entry
    async fn update_meta(
        &self,
        user_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError>;

    /// No-op if the entry doesn't exist
    async fn delete_meta(
        &self,
        user_id: Uuid,
        key: &str,
    ) -> Result<(), StoreError>;
}

/// Everything either backend holds. `FileStore` writes this out as-is.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
struct StoreData {
    settings: IntegrationSettings,
    members: Vec<Member>,
}

impl StoreData {
    fn insert_member(
        &mut self,
        member: Member,
    ) -> Result<(), StoreError> {
        if self.member(member.user_id).is_some() {
            return Err(StoreError::DuplicateMember(member.user_id));
        }
        self.members.push(member);
        Ok(())
    }

    fn member(
        &self,
        user_id: Uuid,
    ) -> Option<&Member> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    fn member_mut(
        &mut self,
        user_id: Uuid,
    ) -> Result<&mut Member, StoreError> {
        self.members
            .iter_mut()
            .find(|m| m.user_id == user_id)
            .ok_or(StoreError::UnknownMember(user_id))
    }

    fn get_meta(
        &self,
        user_id: Uuid,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let member = self
            .member(user_id)
            .ok_or(StoreError::UnknownMember(user_id))?;
        Ok(member.meta.get(key).cloned())
    }
}
