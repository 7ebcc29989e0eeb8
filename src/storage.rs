use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use dashmap::DashMap;
use log::{debug, info};
use tokio::sync::Mutex;
use crate::entities::{InsertResult, PartialProfile, ProfileId, ProfileRecord};
use crate::error::HobbytagError;

/// The remote record store. Only whole-record reads and partial writes are needed.
pub trait ProfileStore {
    async fn read_record(&self, id: &ProfileId) -> Result<ProfileRecord, HobbytagError>;
    async fn write_record(&self, id: &ProfileId, partial: PartialProfile) -> Result<(), HobbytagError>;
}

/// Profiles kept as a JSON array in a single file.
pub struct FileStore {
    db_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(db_path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        if !db_path.exists() {
            std::fs::write(&db_path, "[]")?;
        }
        if !db_path.is_file() {
            anyhow::bail!("store path is not a file: {}", db_path.display());
        }
        info!("store path: {}", db_path.display());
        Ok(Self { db_path, write_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub async fn read_all(&self) -> Result<Vec<ProfileRecord>, HobbytagError> {
        let file_str = tokio::fs::read_to_string(&self.db_path).await
            .map_err(HobbytagError::StoreIOError)?;
        if file_str.trim().is_empty() {
            return Ok(vec![]);
        }
        serde_json::from_str(&file_str).map_err(HobbytagError::StoreSerializationError)
    }

    /// Writes a sibling temp file and renames it over the store, so readers never
    /// see a half-written file.
    async fn write_all(&self, records: &[ProfileRecord]) -> Result<(), HobbytagError> {
        let serialized = serde_json::to_string_pretty(records)
            .map_err(HobbytagError::StoreSerializationError)?;
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, serialized).await
            .map_err(HobbytagError::StoreIOError)?;
        tokio::fs::rename(&temp_path, &self.db_path).await
            .map_err(HobbytagError::StoreIOError)
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self.db_path.file_name()
            .map(|x| x.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        self.db_path.with_file_name(file_name)
    }

    pub async fn create_record(&self, record: ProfileRecord) -> Result<InsertResult<ProfileRecord>, HobbytagError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;
        if let Some(existing) = records.iter().find(|x| x.id == record.id) {
            return Ok(InsertResult::Existing(existing.clone()));
        }
        records.push(record.clone());
        self.write_all(&records).await?;
        info!("profile created: {}", record.id);
        Ok(InsertResult::New(record))
    }
}

impl ProfileStore for FileStore {
    async fn read_record(&self, id: &ProfileId) -> Result<ProfileRecord, HobbytagError> {
        let _guard = self.write_lock.lock().await;
        self.read_all().await?
            .into_iter()
            .find(|x| &x.id == id)
            .ok_or(HobbytagError::RecordNotFound(*id))
    }

    async fn write_record(&self, id: &ProfileId, partial: PartialProfile) -> Result<(), HobbytagError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;
        let record = records.iter_mut()
            .find(|x| &x.id == id)
            .ok_or(HobbytagError::RecordNotFound(*id))?;
        debug!("writing profile {}: {:?}", id, partial);
        record.apply(partial);
        self.write_all(&records).await
    }
}

/// Store backed by a concurrent map. Writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: DashMap<ProfileId, ProfileRecord>,
    failing_writes: AtomicUsize,
    write_count: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: ProfileRecord) -> InsertResult<ProfileRecord> {
        if let Some(existing) = self.records.get(&record.id) {
            return InsertResult::Existing(existing.value().clone());
        }
        self.records.insert(record.id, record.clone());
        InsertResult::New(record)
    }

    pub fn remove(&self, id: &ProfileId) -> Option<ProfileRecord> {
        self.records.remove(id).map(|x| x.1)
    }

    pub fn get(&self, id: &ProfileId) -> Option<ProfileRecord> {
        self.records.get(id).map(|x| x.value().clone())
    }

    /// Makes the next `count` writes fail without touching any record.
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

impl ProfileStore for InMemoryStore {
    async fn read_record(&self, id: &ProfileId) -> Result<ProfileRecord, HobbytagError> {
        self.get(id).ok_or(HobbytagError::RecordNotFound(*id))
    }

    async fn write_record(&self, id: &ProfileId, partial: PartialProfile) -> Result<(), HobbytagError> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        let should_fail = self.failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |x| x.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(HobbytagError::WriteFailed("simulated write failure".to_string()));
        }
        let mut record = self.records.get_mut(id).ok_or(HobbytagError::RecordNotFound(*id))?;
        record.value_mut().apply(partial);
        Ok(())
    }
}
