//! Transient create-by-drag gesture state.

/// In-progress create gesture in board-local coordinates.
///
/// The start point is fixed when the gesture begins; the current point
/// follows the pointer until release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreateDraft {
    pub start_x: f64,
    pub start_y: f64,
    pub current_x: f64,
    pub current_y: f64,
}

impl CreateDraft {
    /// Starts a draft with `current == start`.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            start_x: x,
            start_y: y,
            current_x: x,
            current_y: y,
        }
    }

    /// Returns a copy with only the current point replaced.
    pub fn with_current(self, current_x: f64, current_y: f64) -> Self {
        Self {
            current_x,
            current_y,
            ..self
        }
    }
}
