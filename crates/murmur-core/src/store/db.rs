//! Persistence port for recordings, plus the JSON-file production impl.
//!
//! Metadata lives in a single JSON index; audio blobs are written as sidecar
//! `.wav` files next to it (`~/.local/share/murmur/` on Linux).

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use super::{Recording, RecordingId};

/// Async persistence interface backing the recording store.
///
/// All operations are fallible; the store decides how a failure affects its
/// in-memory cache (pessimistic for add/delete, rollback for update).
#[async_trait]
pub trait RecordingsDb: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Recording>>;
    async fn get(&self, id: &RecordingId) -> Result<Option<Recording>>;
    async fn add(&self, recording: &Recording) -> Result<()>;
    async fn update(&self, recording: &Recording) -> Result<()>;
    async fn delete_by_id(&self, id: &RecordingId) -> Result<()>;
    async fn delete_by_ids(&self, ids: &[RecordingId]) -> Result<()>;
}

/// JSON-index persistence with sidecar WAV blobs.
pub struct JsonRecordingsDb {
    dir: PathBuf,
    // Serializes index rewrites; concurrent mutations would otherwise race on
    // the read-modify-write of the index file.
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonRecordingsDb {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Database under the platform data directory.
    pub fn at_default_location() -> Result<Self> {
        let dir = dirs::data_local_dir()
            .context("Could not determine data directory")?
            .join("murmur");
        Ok(Self::new(dir))
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join("recordings.json")
    }

    fn blob_path(&self, id: &RecordingId) -> PathBuf {
        self.dir.join("blobs").join(format!("{id}.wav"))
    }

    async fn load_index(&self) -> Result<Vec<Recording>> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    async fn save_index(&self, recordings: &[Recording]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let contents =
            serde_json::to_string_pretty(recordings).context("Failed to serialize index")?;
        let path = self.index_path();
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    async fn load_blob(&self, recording: &mut Recording) {
        match tokio::fs::read(self.blob_path(&recording.id)).await {
            Ok(bytes) => recording.blob = bytes,
            Err(e) => {
                // A missing blob leaves the entry listed but not playable.
                crate::verbose!("Missing audio blob for recording {}: {e}", recording.id);
            }
        }
    }
}

#[async_trait]
impl RecordingsDb for JsonRecordingsDb {
    async fn get_all(&self) -> Result<Vec<Recording>> {
        let mut recordings = self.load_index().await?;
        for recording in &mut recordings {
            self.load_blob(recording).await;
        }
        Ok(recordings)
    }

    async fn get(&self, id: &RecordingId) -> Result<Option<Recording>> {
        let index = self.load_index().await?;
        let Some(mut recording) = index.into_iter().find(|r| &r.id == id) else {
            return Ok(None);
        };
        self.load_blob(&mut recording).await;
        Ok(Some(recording))
    }

    async fn add(&self, recording: &Recording) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut index = self.load_index().await?;
        if index.iter().any(|r| r.id == recording.id) {
            anyhow::bail!("recording {} already exists", recording.id);
        }

        let blob_path = self.blob_path(&recording.id);
        if let Some(parent) = blob_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&blob_path, &recording.blob)
            .await
            .with_context(|| format!("Failed to write {}", blob_path.display()))?;

        index.push(recording.clone());
        self.save_index(&index).await
    }

    async fn update(&self, recording: &Recording) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut index = self.load_index().await?;
        let slot = index
            .iter_mut()
            .find(|r| r.id == recording.id)
            .with_context(|| format!("recording {} not present in index", recording.id))?;
        *slot = recording.clone();
        self.save_index(&index).await
    }

    async fn delete_by_id(&self, id: &RecordingId) -> Result<()> {
        self.delete_by_ids(std::slice::from_ref(id)).await
    }

    async fn delete_by_ids(&self, ids: &[RecordingId]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut index = self.load_index().await?;
        index.retain(|r| !ids.contains(&r.id));
        self.save_index(&index).await?;

        for id in ids {
            // Blob removal is best-effort; the index is the source of truth.
            if let Err(e) = tokio::fs::remove_file(self.blob_path(id)).await {
                crate::verbose!("Could not remove blob for {id}: {e}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_get_roundtrip_with_sidecar_blob() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonRecordingsDb::new(dir.path().to_path_buf());

        let recording = Recording::new(vec![7u8; 16]);
        db.add(&recording).await.unwrap();

        let loaded = db.get(&recording.id).await.unwrap().unwrap();
        assert_eq!(loaded.blob, vec![7u8; 16]);
        assert_eq!(loaded.id, recording.id);

        assert!(dir.path().join("blobs").exists());
    }

    #[tokio::test]
    async fn test_update_missing_recording_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonRecordingsDb::new(dir.path().to_path_buf());
        let recording = Recording::new(Vec::new());
        assert!(db.update(&recording).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_by_ids_removes_entries_and_blobs() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonRecordingsDb::new(dir.path().to_path_buf());

        let a = Recording::new(vec![1]);
        let b = Recording::new(vec![2]);
        db.add(&a).await.unwrap();
        db.add(&b).await.unwrap();

        db.delete_by_ids(&[a.id.clone()]).await.unwrap();

        assert!(db.get(&a.id).await.unwrap().is_none());
        assert!(db.get(&b.id).await.unwrap().is_some());
    }
}
