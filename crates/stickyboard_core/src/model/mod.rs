//! Board domain model.
//!
//! # Responsibility
//! - Define the persisted `Note` record and its identity type.
//! - Define transient gesture values (`CreateDraft`) and derived geometry.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` that is never reassigned.
//! - Note width/height never fall below the minimum constants through resize.
//! - Geometry values (`Rect`, `BoundingRect`, `PreviewRect`) are derived and
//!   never persisted.

pub mod draft;
pub mod geometry;
pub mod note;
