use async_trait::async_trait;
use log::{debug, info, warn};

use super::{ScheduleEntry, ScheduleError};
use crate::api::ApiClient;
use crate::session::SessionContext;
use crate::storage::{Storage, StorageError};
use crate::types::SharedStorage;

pub const SCHEDULE_KEY: &str = "scheduleData";

/// A schedule persisted as one serialized collection. `remove` takes a
/// position in the loaded sequence, not a stable id.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Never fails: an unreadable schedule loads as empty.
    async fn load(&self) -> Vec<ScheduleEntry>;

    async fn add(&self, entry: ScheduleEntry) -> Result<Vec<ScheduleEntry>, ScheduleError>;

    /// Out-of-range positions leave the schedule unchanged.
    async fn remove(&self, index: usize) -> Result<Vec<ScheduleEntry>, ScheduleError>;

    async fn replace_all(&self, entries: &[ScheduleEntry]) -> Result<(), ScheduleError>;
}

pub struct LocalScheduleStore {
    storage: SharedStorage,
}

impl LocalScheduleStore {
    pub fn new(storage: SharedStorage) -> LocalScheduleStore {
        LocalScheduleStore { storage }
    }

    pub fn load_entries(&self) -> Vec<ScheduleEntry> {
        let Some(raw) = self.storage.get(SCHEDULE_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("schedule:: stored schedule is unreadable, showing an empty one: {e}");
            Vec::new()
        })
    }

    /// Replaces the whole stored collection.
    pub fn replace(&self, entries: &[ScheduleEntry]) -> Result<(), ScheduleError> {
        let raw = serde_json::to_string(entries).map_err(StorageError::from)?;
        self.storage.set(SCHEDULE_KEY, &raw)?;
        debug!("schedule:: persisted {} entries", entries.len());
        Ok(())
    }
}

#[async_trait]
impl ScheduleRepository for LocalScheduleStore {
    async fn load(&self) -> Vec<ScheduleEntry> {
        self.load_entries()
    }

    async fn add(&self, entry: ScheduleEntry) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        let mut entries = self.load_entries();
        entries.push(entry);
        self.replace(&entries)?;
        Ok(entries)
    }

    async fn remove(&self, index: usize) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        let mut entries = self.load_entries();
        if index < entries.len() {
            entries.remove(index);
            self.replace(&entries)?;
        } else {
            debug!("schedule:: no entry at {index}, nothing removed");
        }
        Ok(entries)
    }

    async fn replace_all(&self, entries: &[ScheduleEntry]) -> Result<(), ScheduleError> {
        self.replace(entries)
    }
}

/// The admin console's copy of the schedule, kept on the server.
pub struct RemoteScheduleStore {
    client: ApiClient,
}

impl RemoteScheduleStore {
    pub fn new(client: ApiClient) -> RemoteScheduleStore {
        RemoteScheduleStore { client }
    }

    async fn fetch(&self) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        Ok(self.client.fetch_schedule().await?)
    }
}

#[async_trait]
impl ScheduleRepository for RemoteScheduleStore {
    async fn load(&self) -> Vec<ScheduleEntry> {
        self.fetch().await.unwrap_or_else(|e| {
            warn!("schedule:: could not load the server schedule: {e}");
            Vec::new()
        })
    }

    async fn add(&self, entry: ScheduleEntry) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        let mut entries = self.fetch().await?;
        entries.push(entry);
        self.client.save_schedule(&entries).await?;
        Ok(entries)
    }

    async fn remove(&self, index: usize) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        let mut entries = self.fetch().await?;
        if index < entries.len() {
            entries.remove(index);
            self.client.save_schedule(&entries).await?;
        }
        Ok(entries)
    }

    async fn replace_all(&self, entries: &[ScheduleEntry]) -> Result<(), ScheduleError> {
        self.client.save_schedule(entries).await?;
        Ok(())
    }
}

/// Edits go through here so only admins can change the programme.
pub struct ScheduleEditor<R> {
    repository: R,
    session: SessionContext,
}

impl<R: ScheduleRepository> ScheduleEditor<R> {
    pub fn new(repository: R, session: SessionContext) -> ScheduleEditor<R> {
        ScheduleEditor { repository, session }
    }

    pub fn can_edit(&self) -> bool {
        self.session
            .get_session()
            .map_or(false, |s| s.user.role.can_edit_schedule())
    }

    fn authorize(&self) -> Result<(), ScheduleError> {
        if self.can_edit() {
            Ok(())
        } else {
            Err(ScheduleError::Forbidden)
        }
    }

    pub async fn load(&self) -> Vec<ScheduleEntry> {
        self.repository.load().await
    }

    pub async fn add(&self, entry: ScheduleEntry) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        self.authorize()?;
        info!(
            "schedule:: adding {} {} {} {}",
            entry.day, entry.time, entry.court, entry.group
        );
        self.repository.add(entry).await
    }

    pub async fn remove(&self, index: usize) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        self.authorize()?;
        info!("schedule:: removing entry {index}");
        self.repository.remove(index).await
    }

    pub async fn replace_all(&self, entries: &[ScheduleEntry]) -> Result<(), ScheduleError> {
        self.authorize()?;
        info!("schedule:: replacing schedule with {} entries", entries.len());
        self.repository.replace_all(entries).await
    }
}
