//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value slot contract board state is persisted through.
//! - Isolate SQLite details from the board service.
//! - Gate every read through the note sanitizer and every write through
//!   note validation.
//!
//! # Invariants
//! - A slot holds one whole serialized note list; writes replace it.
//! - Corrupt slot contents degrade to an empty board, never to an error.

pub mod note_slot;
pub mod slot_repo;
pub mod write_behind;
