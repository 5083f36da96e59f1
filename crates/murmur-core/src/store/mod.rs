//! In-memory recording collection backed by a persistence port.
//!
//! The collection is an optimistic cache over [`RecordingsDb`]. Mutation
//! semantics are deliberately asymmetric:
//!
//! - `add` / `delete_by_id` / `delete_by_ids` are pessimistic: persistence
//!   goes first, memory commits only on confirmed success. These are rare,
//!   user-initiated actions where failing before mutation avoids inconsistent
//!   additions.
//! - `update` is optimistic: the in-memory change lands first and is rolled
//!   back if persistence fails. Updates sit on the hot path of the
//!   transcription pipeline where perceived latency matters.
//!
//! Either way a mutation is never partially applied to memory.

mod db;
mod recording;

pub use db::{JsonRecordingsDb, RecordingsDb};
pub use recording::{Recording, RecordingId, TranscriptionStatus};

use std::sync::{Arc, Mutex};

use crate::error::StoreError;

pub struct RecordingStore {
    db: Arc<dyn RecordingsDb>,
    recordings: Mutex<Vec<Recording>>,
}

impl RecordingStore {
    pub fn new(db: Arc<dyn RecordingsDb>) -> Self {
        Self {
            db,
            recordings: Mutex::new(Vec::new()),
        }
    }

    /// Replace the in-memory collection with the persisted state.
    /// Called once at startup.
    pub async fn sync(&self) -> Result<(), StoreError> {
        let all = self.db.get_all().await.map_err(StoreError::Persistence)?;
        *self.recordings.lock().unwrap() = all;
        Ok(())
    }

    /// Snapshot of the current collection.
    pub fn recordings(&self) -> Vec<Recording> {
        self.recordings.lock().unwrap().clone()
    }

    pub fn get(&self, id: &RecordingId) -> Option<Recording> {
        self.recordings
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id == id)
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.lock().unwrap().is_empty()
    }

    /// Add a recording. Pessimistic: memory is untouched unless persistence
    /// confirms the write.
    pub async fn add(&self, recording: Recording) -> Result<(), StoreError> {
        self.db
            .add(&recording)
            .await
            .map_err(StoreError::Persistence)?;
        self.recordings.lock().unwrap().push(recording);
        Ok(())
    }

    /// Update a recording in place. Optimistic: the in-memory value changes
    /// immediately and is restored if persistence fails.
    pub async fn update(&self, recording: Recording) -> Result<(), StoreError> {
        let previous = {
            let mut list = self.recordings.lock().unwrap();
            let slot = list
                .iter_mut()
                .find(|r| r.id == recording.id)
                .ok_or_else(|| StoreError::NotFound(recording.id.clone()))?;
            std::mem::replace(slot, recording.clone())
        };

        if let Err(e) = self.db.update(&recording).await {
            let mut list = self.recordings.lock().unwrap();
            if let Some(slot) = list.iter_mut().find(|r| r.id == previous.id) {
                *slot = previous;
            }
            return Err(StoreError::Persistence(e));
        }
        Ok(())
    }

    /// Delete one recording. Pessimistic.
    pub async fn delete_by_id(&self, id: &RecordingId) -> Result<(), StoreError> {
        self.db
            .delete_by_id(id)
            .await
            .map_err(StoreError::Persistence)?;
        self.recordings.lock().unwrap().retain(|r| &r.id != id);
        Ok(())
    }

    /// Delete a batch of recordings. Pessimistic, all-or-nothing.
    pub async fn delete_by_ids(&self, ids: &[RecordingId]) -> Result<(), StoreError> {
        self.db
            .delete_by_ids(ids)
            .await
            .map_err(StoreError::Persistence)?;
        self.recordings
            .lock()
            .unwrap()
            .retain(|r| !ids.contains(&r.id));
        Ok(())
    }
}
