//! JSON document store on the local filesystem.
//!
//! Every operation re-reads the document, so several processes can share
//! one file. Writes hold an exclusive lock on a `.lock` sibling for the whole
//! read-modify-write, then land through a uniquely named temp file that is
//! renamed into place. Readers never take the lock; they always see a whole
//! document.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use huddle_common::{ParticipantId, RecordId, StoreError};

use super::document::StoreDocument;
use super::types::{ChatMessage, MessageDraft, MessageQuery, ParticipantRecord};
use super::ChatStore;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Keeps this handle's writers off the blocking pool while another
    /// one waits on the file lock.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (or lazily create) the document at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let store = Self {
            path,
            write_lock: Mutex::new(()),
        };
        // Surface a corrupt document at open time rather than on first submit.
        store.load().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreDocument, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => parse_document(&self.path, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn modify<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut StoreDocument) -> T + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let _lock = DocumentLock::acquire(&path)?;
            let mut doc = read_document(&path)?;
            let out = f(&mut doc);
            write_document(&path, &doc)?;
            debug!(path = %path.display(), "store written");
            Ok(out)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("store task failed: {e}")))?
    }
}

/// Exclusive advisory lock on a document's `.lock` sibling, released on drop.
struct DocumentLock {
    file: File,
}

impl DocumentLock {
    fn acquire(path: &Path) -> Result<Self, StoreError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path(path))?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(error = %e, "failed to release store lock");
        }
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

fn parse_document(path: &Path, content: &str) -> Result<StoreDocument, StoreError> {
    if content.trim().is_empty() {
        return Ok(StoreDocument::default());
    }
    serde_json::from_str(content)
        .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))
}

fn read_document(path: &Path) -> Result<StoreDocument, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_document(path, &content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::default()),
        Err(e) => Err(e.into()),
    }
}

fn write_document(path: &Path, doc: &StoreDocument) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(doc)
        .map_err(|e| StoreError::Corrupt(format!("failed to serialize store: {e}")))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

#[async_trait]
impl ChatStore for JsonFileStore {
    async fn create_message(&self, draft: MessageDraft) -> Result<ChatMessage, StoreError> {
        self.modify(move |doc| doc.insert_message(draft)).await
    }

    async fn fetch_messages(&self, query: &MessageQuery) -> Result<Vec<ChatMessage>, StoreError> {
        Ok(self.load().await?.query_messages(query))
    }

    async fn fetch_message(&self, id: &RecordId) -> Result<ChatMessage, StoreError> {
        self.load().await?.message(id)
    }

    async fn set_participant_active(
        &self,
        id: &ParticipantId,
        active: bool,
    ) -> Result<(), StoreError> {
        let id = id.clone();
        self.modify(move |doc| doc.set_active(&id, active)).await
    }

    async fn fetch_participant(
        &self,
        id: &ParticipantId,
    ) -> Result<Option<ParticipantRecord>, StoreError> {
        Ok(self.load().await?.participant(id))
    }

    async fn fetch_active_participants(&self) -> Result<Vec<ParticipantId>, StoreError> {
        Ok(self.load().await?.active_participants())
    }
}
