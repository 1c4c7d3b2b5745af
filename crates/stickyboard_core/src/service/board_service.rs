//! Sticky board use-case service.
//!
//! # Responsibility
//! - Translate pointer and widget events into interaction transitions.
//! - Apply geometry rules and mutate the persisted note collection.
//! - Expose the paint-ready view (notes, create preview, trash hover, moving
//!   note) to the rendering layer.
//!
//! # Invariants
//! - This service is the only component touching both the interaction state
//!   and storage.
//! - In-memory notes are updated synchronously and are the source of truth;
//!   storage receives whole-list snapshots through the write-behind slot.
//! - Missing board/trash rectangles degrade to no-ops, never to errors.
//! - Non-finite event coordinates are ignored so they never reach storage.

use crate::board::collection::NoteCollection;
use crate::board::interaction::{reduce, BoardUiAction, Interaction};
use crate::board::ops::{
    build_note_from_draft, clamp, create_preview, is_delete_drop_hit, note_rect_on_screen,
};
use crate::config::{BoardConfig, FlushPolicy};
use crate::model::draft::CreateDraft;
use crate::model::geometry::{BoundingRect, PreviewRect};
use crate::model::note::{Note, NoteId, Palette, MIN_NOTE_HEIGHT, MIN_NOTE_WIDTH};
use crate::repo::note_slot::NoteSlot;
use crate::repo::slot_repo::{RepoError, SlotRepository};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BoardResult<T> = Result<T, BoardError>;

/// Service error for board storage.
#[derive(Debug)]
pub enum BoardError {
    Repo(RepoError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "board storage failed: {err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for BoardError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Pointer button reported with a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas background.
    Canvas,
    /// Inside an existing note.
    Note,
    /// A region marked as not starting notes (header, trash target).
    NoCreateRegion,
}

/// Pointer-down on the board, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    pub button: PointerButton,
    pub target: PointerTarget,
    pub client_x: f64,
    pub client_y: f64,
}

/// Global pointer position, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub client_x: f64,
    pub client_y: f64,
}

/// Event payload naming a note only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteKey {
    pub note_id: NoteId,
}

/// Note frame reported by the move/resize widget, board-local.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteFrame {
    pub note_id: NoteId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub type DragPayload = NoteFrame;
pub type ResizePayload = NoteFrame;

impl NoteFrame {
    fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|value| value.is_finite())
    }
}

/// Result of releasing a moved note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Position finalized.
    Moved,
    /// Dropped on the trash and removed.
    Deleted,
    /// Unknown note or unusable payload; only the gesture ended.
    Ignored,
}

/// Board orchestrator over a storage slot.
pub struct StickyBoard<R: SlotRepository> {
    notes: NoteCollection,
    ui: Interaction,
    board_rect: Option<BoundingRect>,
    trash_rect: Option<BoundingRect>,
    slot: NoteSlot<R>,
    palette: Palette,
    flush_policy: FlushPolicy,
}

impl<R: SlotRepository> StickyBoard<R> {
    /// Opens the board, reading the persisted note list once.
    pub fn open(repo: R, config: &BoardConfig) -> BoardResult<Self> {
        let slot = NoteSlot::new(repo, config.storage_key.as_str());
        let notes = slot.load()?;
        info!(
            "event=board_open module=service status=ok key={} notes={}",
            slot.key(),
            notes.len()
        );

        Ok(Self {
            notes: NoteCollection::new(notes),
            ui: Interaction::Idle,
            board_rect: None,
            trash_rect: None,
            slot,
            palette: config.palette.clone(),
            flush_policy: config.flush_policy,
        })
    }

    /// Updates the board canvas's on-screen rectangle (`None` = unmounted).
    pub fn set_board_rect(&mut self, rect: Option<BoundingRect>) {
        self.board_rect = rect;
    }

    /// Updates the trash target's on-screen rectangle (`None` = unmounted).
    pub fn set_trash_rect(&mut self, rect: Option<BoundingRect>) {
        self.trash_rect = rect;
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.as_slice()
    }

    pub fn note(&self, note_id: &NoteId) -> Option<&Note> {
        self.notes.get(note_id)
    }

    /// Notes bottom-to-top by z-index.
    pub fn paint_order(&self) -> Vec<&Note> {
        self.notes.paint_order()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.ui
    }

    /// Rectangle spanned by the in-progress create-drag, if any.
    pub fn create_preview(&self) -> Option<PreviewRect> {
        self.ui.create_draft().map(create_preview)
    }

    pub fn is_over_trash(&self) -> bool {
        self.ui.is_over_trash()
    }

    pub fn dragging_note_id(&self) -> Option<&NoteId> {
        self.ui.dragging_note_id()
    }

    /// Starts a create-drag for a primary pointer-down on empty canvas.
    ///
    /// Returns whether a draft was started.
    pub fn start_create(&mut self, event: PointerDown) -> bool {
        if event.button != PointerButton::Primary || event.target != PointerTarget::Canvas {
            return false;
        }
        let Some((x, y)) = self.to_board_local(event.client_x, event.client_y) else {
            return false;
        };

        self.dispatch(BoardUiAction::CreateStart(CreateDraft::at(x, y)));
        debug!("event=create_start module=service status=ok x={x} y={y}");
        true
    }

    /// Follows the pointer while a create-drag is active.
    pub fn pointer_move(&mut self, position: PointerPosition) {
        if self.ui.create_draft().is_none() {
            return;
        }
        let Some((current_x, current_y)) =
            self.to_board_local(position.client_x, position.client_y)
        else {
            return;
        };
        self.dispatch(BoardUiAction::CreateUpdate {
            current_x,
            current_y,
        });
    }

    /// Finishes a create-drag, appending the new note.
    ///
    /// Returns the created note's id. Without a board rectangle the draft is
    /// discarded.
    pub fn pointer_up(&mut self, position: PointerPosition) -> Option<NoteId> {
        let draft = self.ui.create_draft().copied()?;

        let created = match (
            self.board_rect,
            self.to_board_local(position.client_x, position.client_y),
        ) {
            (Some(board), Some((end_x, end_y))) => {
                self.notes.ensure_z_headroom();
                let note = build_note_from_draft(
                    &draft,
                    end_x,
                    end_y,
                    board.size(),
                    self.notes.as_slice(),
                    &self.palette,
                );
                let note_id = note.id.clone();
                info!(
                    "event=note_create module=service status=ok note_id={note_id} x={} y={} width={} height={} z_index={}",
                    note.x, note.y, note.width, note.height, note.z_index
                );
                self.notes.push(note);
                self.persist();
                Some(note_id)
            }
            _ => {
                debug!("event=note_create module=service status=skipped reason=no_board_rect");
                None
            }
        };

        self.dispatch(BoardUiAction::CreateClear);
        created
    }

    /// Starts moving a note: brings it to front and marks it dragging.
    pub fn start_move(&mut self, key: NoteKey) {
        if !self.notes.contains(&key.note_id) {
            debug!(
                "event=move_start module=service status=skipped reason=unknown_note note_id={}",
                key.note_id
            );
            return;
        }
        self.bring_to_front(&key.note_id);
        self.dispatch(BoardUiAction::DragStart {
            note_id: key.note_id,
        });
    }

    /// Live move tick: stores the position and refreshes the trash flag.
    pub fn drag(&mut self, payload: DragPayload) {
        if !payload.is_finite() {
            warn!(
                "event=move module=service status=rejected reason=non_finite note_id={}",
                payload.note_id
            );
            return;
        }
        if self.set_position(&payload.note_id, payload.x, payload.y) {
            self.persist();
        }
        let over_trash =
            self.is_note_over_trash(payload.x, payload.y, payload.width, payload.height);
        self.dispatch(BoardUiAction::DragOverTrash(over_trash));
    }

    /// Releases a moved note, deleting it if dropped on the trash.
    ///
    /// The move gesture ends whatever the outcome.
    pub fn stop_move(&mut self, payload: DragPayload) -> MoveOutcome {
        let outcome = if !payload.is_finite() {
            warn!(
                "event=move_stop module=service status=rejected reason=non_finite note_id={}",
                payload.note_id
            );
            MoveOutcome::Ignored
        } else if !self.set_position(&payload.note_id, payload.x, payload.y) {
            MoveOutcome::Ignored
        } else if self.is_note_over_trash(payload.x, payload.y, payload.width, payload.height) {
            self.notes.remove(&payload.note_id);
            info!(
                "event=note_delete module=service status=ok note_id={}",
                payload.note_id
            );
            MoveOutcome::Deleted
        } else {
            MoveOutcome::Moved
        };

        if outcome != MoveOutcome::Ignored {
            self.persist();
        }
        self.dispatch(BoardUiAction::DragStop);
        outcome
    }

    /// Starts a resize. Only raises the note; no interaction mode is entered.
    pub fn start_resize(&mut self, key: NoteKey) {
        self.bring_to_front(&key.note_id);
    }

    /// Applies the final frame of a resize, flooring size to the minimums.
    pub fn stop_resize(&mut self, payload: ResizePayload) {
        if !payload.is_finite() {
            warn!(
                "event=resize_stop module=service status=rejected reason=non_finite note_id={}",
                payload.note_id
            );
            return;
        }
        let width = payload.width.max(MIN_NOTE_WIDTH);
        let height = payload.height.max(MIN_NOTE_HEIGHT);
        let updated = self.notes.update(&payload.note_id, |note| {
            note.x = payload.x;
            note.y = payload.y;
            note.width = width;
            note.height = height;
        });
        if updated {
            self.persist();
        }
    }

    /// Raises a note above every other note. Safe to call repeatedly.
    pub fn bring_to_front(&mut self, note_id: &NoteId) {
        if let Some(z_index) = self.notes.bring_to_front(note_id) {
            debug!("event=bring_to_front module=service status=ok note_id={note_id} z_index={z_index}");
            self.persist();
        }
    }

    /// Replaces a note's text verbatim.
    pub fn update_text(&mut self, note_id: &NoteId, text: impl Into<String>) {
        let text = text.into();
        if self.notes.update(note_id, |note| note.text = text) {
            self.persist();
        }
    }

    /// Whether a note at this board-local frame would be dropped in the trash.
    ///
    /// Reports `false` when either the board or the trash rectangle is
    /// unavailable.
    pub fn is_note_over_trash(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        let (Some(board), Some(trash)) = (self.board_rect, self.trash_rect) else {
            return false;
        };
        let note_rect = note_rect_on_screen(x, y, width, height, &board);
        is_delete_drop_hit(&note_rect, &trash.to_rect())
    }

    /// Writes any staged snapshot to storage.
    pub fn flush(&mut self) -> BoardResult<bool> {
        Ok(self.slot.flush()?)
    }

    pub fn has_pending_writes(&self) -> bool {
        self.slot.has_pending()
    }

    pub fn slot(&self) -> &NoteSlot<R> {
        &self.slot
    }

    fn dispatch(&mut self, action: BoardUiAction) {
        self.ui = reduce(std::mem::take(&mut self.ui), action);
    }

    fn set_position(&mut self, note_id: &NoteId, x: f64, y: f64) -> bool {
        self.notes.update(note_id, |note| {
            note.x = x;
            note.y = y;
        })
    }

    fn to_board_local(&self, client_x: f64, client_y: f64) -> Option<(f64, f64)> {
        let board = self.board_rect?;
        if !client_x.is_finite() || !client_y.is_finite() {
            return None;
        }
        Some((
            clamp(client_x - board.left, 0.0, board.width),
            clamp(client_y - board.top, 0.0, board.height),
        ))
    }

    fn persist(&mut self) {
        if let Err(err) = self.slot.stage(self.notes.as_slice()) {
            error!("event=persist module=service status=error stage=encode error={err}");
            return;
        }
        if self.flush_policy == FlushPolicy::Immediate {
            if let Err(err) = self.slot.flush() {
                // The slot keeps the snapshot queued for the next flush.
                debug!("event=persist module=service status=deferred error={err}");
            }
        }
    }
}
