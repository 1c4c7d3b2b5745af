//! Core logic for the sticky-notes board.
//! This crate owns note geometry, gesture state and persisted board state;
//! rendering layers only forward events and paint what it exposes.

pub mod board;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use board::collection::NoteCollection;
pub use board::interaction::{reduce, BoardUiAction, Interaction};
pub use board::ops::{
    build_note_from_draft, clamp, create_preview, is_delete_drop_hit, next_z_index,
    note_rect_on_screen, repair_note_size, sanitize_notes, MAX_Z_INDEX,
};
pub use config::{BoardConfig, ConfigError, FlushPolicy};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::draft::CreateDraft;
pub use model::geometry::{BoardSize, BoundingRect, PreviewRect, Rect};
pub use model::note::{
    Note, NoteId, NoteValidationError, Palette, MIN_NOTE_HEIGHT, MIN_NOTE_WIDTH, NOTE_COLORS,
};
pub use repo::note_slot::{NoteSlot, STORAGE_KEY};
pub use repo::slot_repo::{RepoError, RepoResult, SlotRepository, SqliteSlotRepository};
pub use service::board_service::{
    BoardError, BoardResult, DragPayload, MoveOutcome, NoteFrame, NoteKey, PointerButton,
    PointerDown, PointerPosition, PointerTarget, ResizePayload, StickyBoard,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
