//! Sanitizing note-list slot with write-behind flushing.
//!
//! # Responsibility
//! - Decode the persisted note list once at start and filter it through
//!   `sanitize_notes`.
//! - Encode whole-list snapshots and buffer them until flushed.
//!
//! # Invariants
//! - Absent or undecodable slot contents load as an empty list.
//! - Loaded notes with negative sizes are repaired to the minimum size, so a
//!   loaded list always passes staging.
//! - Every staged snapshot has passed `Note::validate` for each note.

use crate::board::ops::{repair_note_size, sanitize_notes};
use crate::model::note::Note;
use crate::repo::slot_repo::{RepoResult, SlotRepository};
use crate::repo::write_behind::WriteBehind;
use log::{debug, error, info, warn};
use serde_json::Value;

/// Fixed key the board's note list lives under by default.
pub const STORAGE_KEY: &str = "sticky-notes-app-state-v1";

pub struct NoteSlot<R: SlotRepository> {
    repo: R,
    key: String,
    queue: WriteBehind,
}

impl<R: SlotRepository> NoteSlot<R> {
    pub fn new(repo: R, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
            queue: WriteBehind::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads and sanitizes the stored note list.
    ///
    /// # Errors
    /// - Returns storage transport errors. Malformed contents are not errors.
    pub fn load(&self) -> RepoResult<Vec<Note>> {
        let Some(raw) = self.repo.read_slot(&self.key)? else {
            info!("event=slot_load module=repo status=ok key={} notes=0 source=default", self.key);
            return Ok(Vec::new());
        };

        let decoded: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=slot_load module=repo status=degraded key={} error_code=decode_failed error={err}",
                    self.key
                );
                return Ok(Vec::new());
            }
        };

        let declared = decoded.as_array().map_or(0, Vec::len);
        let mut notes = sanitize_notes(&decoded);
        let repaired = notes
            .iter_mut()
            .map(repair_note_size)
            .filter(|&changed| changed)
            .count();
        if notes.len() != declared || repaired > 0 {
            warn!(
                "event=slot_load module=repo status=degraded key={} declared={declared} kept={} repaired={repaired}",
                self.key,
                notes.len()
            );
        } else {
            info!(
                "event=slot_load module=repo status=ok key={} notes={}",
                self.key,
                notes.len()
            );
        }
        Ok(notes)
    }

    /// Validates and encodes `notes`, replacing any unflushed snapshot.
    pub fn stage(&mut self, notes: &[Note]) -> RepoResult<()> {
        for note in notes {
            note.validate()?;
        }
        let payload = serde_json::to_string(notes)?;
        self.queue.stage(payload);
        debug!(
            "event=slot_stage module=repo status=ok key={} notes={}",
            self.key,
            notes.len()
        );
        Ok(())
    }

    /// Writes the pending snapshot, if any. Returns whether a write happened.
    ///
    /// On failure the snapshot stays queued for the next flush.
    pub fn flush(&mut self) -> RepoResult<bool> {
        let Some(payload) = self.queue.take() else {
            return Ok(false);
        };

        match self.repo.write_slot(&self.key, &payload) {
            Ok(()) => {
                debug!(
                    "event=slot_flush module=repo status=ok key={} bytes={}",
                    self.key,
                    payload.len()
                );
                Ok(true)
            }
            Err(err) => {
                error!(
                    "event=slot_flush module=repo status=error key={} error={err}",
                    self.key
                );
                self.queue.restore(payload);
                Err(err)
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.queue.has_pending()
    }

    pub fn coalesced_writes(&self) -> u64 {
        self.queue.coalesced()
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }
}
