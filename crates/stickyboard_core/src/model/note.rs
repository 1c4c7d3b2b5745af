//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical persisted note record and its wire shape.
//! - Own the size constants and color palette used at creation time.
//!
//! # Invariants
//! - `id` is immutable after creation.
//! - `color` is fixed at creation and drawn from the palette by creation order.
//! - Persisted geometry is finite and width/height are non-negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Smallest width a note may be created or resized to.
pub const MIN_NOTE_WIDTH: f64 = 140.0;
/// Smallest height a note may be created or resized to.
pub const MIN_NOTE_HEIGHT: f64 = 120.0;

/// Default creation palette, cycled by creation order.
pub const NOTE_COLORS: &[&str] = &["#fff59a", "#ffd5a4", "#b9fbc0", "#a8dadc", "#cdb4db"];

/// Opaque note identifier.
///
/// Freshly created notes get UUID v4 strings; persisted data may carry any
/// string shape and is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted sticky note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// Left edge in board-local pixels.
    pub x: f64,
    /// Top edge in board-local pixels.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Free-form user text; may be empty.
    pub text: String,
    pub color: String,
    /// Stacking order; larger paints on top.
    pub z_index: i64,
}

/// Validation errors for persisted note geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteValidationError {
    NonFiniteGeometry { field: &'static str, value: f64 },
    NegativeSize { field: &'static str, value: f64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteGeometry { field, value } => {
                write!(f, "note {field} must be finite, got {value}")
            }
            Self::NegativeSize { field, value } => {
                write!(f, "note {field} must be >= 0, got {value}")
            }
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Checks that geometry is storable.
    ///
    /// Minimum-size constants are not enforced here: notes created against
    /// the board's far edge are legitimately smaller.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        for (field, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() {
                return Err(NoteValidationError::NonFiniteGeometry { field, value });
            }
        }
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if value < 0.0 {
                return Err(NoteValidationError::NegativeSize { field, value });
            }
        }
        Ok(())
    }
}

/// Ordered color palette used for new notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<String>);

impl Palette {
    /// Builds a palette; an empty list falls back to the default colors.
    pub fn new(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self(colors)
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Color for the note created at position `index` in creation order.
    pub fn color_for(&self, index: usize) -> &str {
        if self.0.is_empty() {
            return NOTE_COLORS[index % NOTE_COLORS.len()];
        }
        self.0[index % self.0.len()].as_str()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(NOTE_COLORS.iter().map(|color| color.to_string()).collect())
    }
}
