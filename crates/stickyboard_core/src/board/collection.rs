//! In-memory note collection.
//!
//! # Responsibility
//! - Hold the single source of truth for persisted notes.
//! - Provide id-addressed lookup and whole-note updates.
//!
//! # Invariants
//! - Collection order is creation/load order and is what gets persisted.
//! - The id index always mirrors `notes` positions.
//! - A z-index assigned by `bring_to_front` is strictly the unique maximum.
//! - Assigned z-indices never exceed `MAX_Z_INDEX`; the stack is compacted
//!   to `1..=len` in paint order when it runs out of room.

use crate::board::ops::{next_z_index, MAX_Z_INDEX};
use log::info;
use crate::model::note::{Note, NoteId};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct NoteCollection {
    notes: Vec<Note>,
    index: HashMap<NoteId, usize>,
}

impl NoteCollection {
    pub fn new(notes: Vec<Note>) -> Self {
        let mut collection = Self {
            notes,
            index: HashMap::new(),
        };
        collection.reindex();
        collection
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.index.get(id).map(|&position| &self.notes[position])
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.index.contains_key(id)
    }

    /// Appends a note at the end of the collection.
    pub fn push(&mut self, note: Note) {
        // Duplicate ids from foreign data resolve to the first occurrence.
        self.index.entry(note.id.clone()).or_insert(self.notes.len());
        self.notes.push(note);
    }

    /// Applies `update` to the note with `id`; returns whether it existed.
    pub fn update(&mut self, id: &NoteId, update: impl FnOnce(&mut Note)) -> bool {
        match self.index.get(id) {
            Some(&position) => {
                update(&mut self.notes[position]);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the note with `id`.
    pub fn remove(&mut self, id: &NoteId) -> Option<Note> {
        let position = self.index.get(id).copied()?;
        let removed = self.notes.remove(position);
        self.reindex();
        Some(removed)
    }

    /// Assigns `max(z_index) + 1` to the note with `id`.
    ///
    /// Returns the new z-index, or `None` if the note is unknown.
    pub fn bring_to_front(&mut self, id: &NoteId) -> Option<i64> {
        if !self.contains(id) {
            return None;
        }
        self.ensure_z_headroom();
        let next = next_z_index(&self.notes);
        self.update(id, |note| note.z_index = next).then_some(next)
    }

    /// Compacts z-indices if the next one would pass `MAX_Z_INDEX`.
    ///
    /// Relative stacking order is preserved. Returns whether it compacted.
    pub fn ensure_z_headroom(&mut self) -> bool {
        if next_z_index(&self.notes) <= MAX_Z_INDEX {
            return false;
        }
        let mut order: Vec<usize> = (0..self.notes.len()).collect();
        order.sort_by_key(|&position| self.notes[position].z_index);
        for (rank, position) in order.into_iter().enumerate() {
            self.notes[position].z_index = rank as i64 + 1;
        }
        info!(
            "event=z_compact module=board status=ok notes={}",
            self.notes.len()
        );
        true
    }

    /// Notes sorted bottom-to-top for painting; ties keep collection order.
    pub fn paint_order(&self) -> Vec<&Note> {
        let mut ordered: Vec<&Note> = self.notes.iter().collect();
        ordered.sort_by_key(|note| note.z_index);
        ordered
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, note) in self.notes.iter().enumerate() {
            self.index.entry(note.id.clone()).or_insert(position);
        }
    }
}
