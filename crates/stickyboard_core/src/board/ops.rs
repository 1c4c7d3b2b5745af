//! Pure geometry and model helpers for the board.
//!
//! # Responsibility
//! - Clamp pointer coordinates and normalize drag spans into rectangles.
//! - Materialize finished create-drags into notes.
//! - Assign stacking order and hit-test dragged notes against the trash.
//! - Filter untrusted decoded storage data into well-typed notes.
//!
//! # Invariants
//! - Every function here is total and side-effect free.
//! - `next_z_index` is strictly greater than every existing z-index while
//!   z-indices stay within `MAX_Z_INDEX`.
//! - Sanitized z-indices lie within `[-MAX_Z_INDEX, MAX_Z_INDEX]`.
//! - Note creation floors size to the minimum first, then caps it at the
//!   board's far edge; the cap wins.

use crate::model::draft::CreateDraft;
use crate::model::geometry::{BoardSize, BoundingRect, PreviewRect, Rect};
use crate::model::note::{Note, NoteId, Palette, MIN_NOTE_HEIGHT, MIN_NOTE_WIDTH};
use serde_json::{Map, Value};

/// Share of the note's own area that must overlap the trash.
pub const DROP_NOTE_OVERLAP_RATIO: f64 = 0.2;
/// Share of the trash area that must be covered by the note.
pub const DROP_TRASH_OVERLAP_RATIO: f64 = 0.5;

/// Largest z-index accepted from storage (`2^53 - 1`, exact in a JSON number).
pub const MAX_Z_INDEX: i64 = (1 << 53) - 1;

/// Standard range clamp: `max(min, min(max, value))`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// Returns `1 + max(z_index)` over `notes`, or `1` for an empty board.
///
/// Saturates at `i64::MAX`; callers keep headroom with
/// `NoteCollection::ensure_z_headroom`.
pub fn next_z_index(notes: &[Note]) -> i64 {
    notes
        .iter()
        .fold(0, |max: i64, note| max.max(note.z_index))
        .saturating_add(1)
}

/// Replaces negative sizes with the minimum constants.
///
/// Returns whether the note changed. Sizes between zero and the minimum are
/// kept, since edge-capped notes are legitimately that small.
pub fn repair_note_size(note: &mut Note) -> bool {
    let mut repaired = false;
    if note.width < 0.0 {
        note.width = MIN_NOTE_WIDTH;
        repaired = true;
    }
    if note.height < 0.0 {
        note.height = MIN_NOTE_HEIGHT;
        repaired = true;
    }
    repaired
}

/// Keeps only well-formed note objects from a decoded storage value.
///
/// Non-array input yields an empty list. Entries missing a field or carrying
/// a field of the wrong primitive type are dropped, never repaired. Order of
/// the surviving entries is preserved. Extra fields are ignored.
pub fn sanitize_notes(value: &Value) -> Vec<Note> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| item.as_object().and_then(note_from_object))
        .collect()
}

fn note_from_object(object: &Map<String, Value>) -> Option<Note> {
    let text_field = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
    let number_field = |key: &str| object.get(key).and_then(Value::as_f64);

    Some(Note {
        id: NoteId::from(text_field("id")?),
        x: number_field("x")?,
        y: number_field("y")?,
        width: number_field("width")?,
        height: number_field("height")?,
        text: text_field("text")?,
        color: text_field("color")?,
        z_index: z_index_field(object.get("zIndex")?)?,
    })
}

fn z_index_field(value: &Value) -> Option<i64> {
    let z_index = match value.as_i64() {
        Some(integer) => integer,
        // Fractional z-indices from foreign writers are floored.
        None => {
            let float = value.as_f64()?.floor();
            if float.abs() > MAX_Z_INDEX as f64 {
                return None;
            }
            float as i64
        }
    };
    (-MAX_Z_INDEX..=MAX_Z_INDEX)
        .contains(&z_index)
        .then_some(z_index)
}

/// Normalizes a draft into the axis-aligned rectangle it spans.
///
/// Used for live feedback only; no minimum size is applied.
pub fn create_preview(draft: &CreateDraft) -> PreviewRect {
    PreviewRect {
        x: draft.start_x.min(draft.current_x),
        y: draft.start_y.min(draft.current_y),
        width: (draft.start_x - draft.current_x).abs(),
        height: (draft.start_y - draft.current_y).abs(),
    }
}

/// Builds the note produced by a completed create-drag ending at
/// `(end_x, end_y)` on a board of `board` size.
pub fn build_note_from_draft(
    draft: &CreateDraft,
    end_x: f64,
    end_y: f64,
    board: BoardSize,
    existing: &[Note],
    palette: &Palette,
) -> Note {
    let x = draft.start_x.min(end_x);
    let y = draft.start_y.min(end_y);
    let width = (draft.start_x - end_x).abs().max(MIN_NOTE_WIDTH);
    let height = (draft.start_y - end_y).abs().max(MIN_NOTE_HEIGHT);

    Note {
        id: NoteId::generate(),
        x,
        y,
        width: width.min(board.width - x),
        height: height.min(board.height - y),
        text: String::new(),
        color: palette.color_for(existing.len()).to_string(),
        z_index: next_z_index(existing),
    }
}

/// Projects board-local note geometry into the board's screen space.
pub fn note_rect_on_screen(
    note_x: f64,
    note_y: f64,
    note_width: f64,
    note_height: f64,
    board: &BoundingRect,
) -> Rect {
    Rect {
        left: board.left + note_x,
        top: board.top + note_y,
        right: board.left + note_x + note_width,
        bottom: board.top + note_y + note_height,
    }
}

/// Decides whether dropping `note` onto `trash` deletes it.
///
/// Hit when the note's center lies inside the trash (inclusive), or the
/// overlap covers at least 20% of the note, or at least 50% of the trash.
/// Rectangles that do not overlap with positive area never hit.
pub fn is_delete_drop_hit(note: &Rect, trash: &Rect) -> bool {
    let overlap_width = note.right.min(trash.right) - note.left.max(trash.left);
    let overlap_height = note.bottom.min(trash.bottom) - note.top.max(trash.top);

    if overlap_width <= 0.0 || overlap_height <= 0.0 {
        return false;
    }

    let overlap_area = overlap_width * overlap_height;
    let overlap_to_note_ratio = overlap_area / note.area();
    let overlap_to_trash_ratio = overlap_area / trash.area();

    let (center_x, center_y) = note.center();
    let center_inside_trash = trash.contains_point(center_x, center_y);

    center_inside_trash
        || overlap_to_note_ratio >= DROP_NOTE_OVERLAP_RATIO
        || overlap_to_trash_ratio >= DROP_TRASH_OVERLAP_RATIO
}
