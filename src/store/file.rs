use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Member;
use super::MemberStore;
use super::SettingsStore;
use super::StoreData;
use super::StoreError;
use crate::domain::IntegrationSettings;

/// Settings and members kept in a single JSON document.
///
/// The whole document is rewritten after every change: first to a `.tmp`
/// sibling, synced, then renamed over the original, so a crash mid-write
/// leaves the previous version intact. Reads are served from memory, which
/// only ever holds what made it to disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl FileStore {
    /// Load `path`, or start empty if it doesn't exist yet. Parent directories
    /// are created as needed. A file that exists but can't be parsed is an
    /// error: starting over would silently wipe every member.
    #[tracing::instrument(
        name = "Opening file store",
        skip_all,
        fields(path = %path.as_ref().display())
    )]
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let data = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    /// Called with the write lock held, so writes never interleave
    async fn persist(
        &self,
        data: &StoreData,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(data)?;
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&json).await?;
            file.sync_all().await?;
        }
        fs::rename(&temp_path, &self.path).await?;
        tracing::trace!("store written to {}", self.path.display());
        Ok(())
    }

    /// Apply `change` to a copy of the data and persist it; the copy replaces
    /// the in-memory data only once it is on disk. `change` returns whether
    /// anything changed, so no-ops skip the write.
    async fn update<F>(
        &self,
        change: F,
    ) -> Result<(), StoreError>
    where
        F: FnOnce(&mut StoreData) -> Result<bool, StoreError> + Send,
    {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        if change(&mut next)? {
            self.persist(&next).await?;
            *data = next;
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileStore {
    async fn load(&self) -> Result<IntegrationSettings, StoreError> {
        Ok(self.data.read().await.settings.clone())
    }

    async fn save(
        &self,
        settings: IntegrationSettings,
    ) -> Result<(), StoreError> {
        self.update(|data| {
            data.settings = settings;
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl MemberStore for FileStore {
    async fn insert_member(
        &self,
        member: Member,
    ) -> Result<(), StoreError> {
        self.update(|data| data.insert_member(member).map(|()| true))
            .await
    }

    async fn get_member(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Member>, StoreError> {
        Ok(self.data.read().await.member(user_id).cloned())
    }

    async fn list_members(&self) -> Result<Vec<Member>, StoreError> {
        Ok(self.data.read().await.members.clone())
    }

    async fn get_meta(
        &self,
        user_id: Uuid,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        self.data.read().await.get_meta(user_id, key)
    }

    async fn update_meta(
        &self,
        user_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.update(|data| {
            data.member_mut(user_id)?
                .meta
                .insert(key.to_string(), value.to_string());
            Ok(true)
        })
        .await
    }

    async fn delete_meta(
        &self,
        user_id: Uuid,
        key: &str,
    ) -> Result<(), StoreError> {
        self.update(|data| Ok(data.member_mut(user_id)?.meta.remove(key).is_some()))
            .await
    }
}
