//! Derived geometry values used for previews and hit-testing.

/// Edge-based rectangle in a shared (screen) coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Geometric center `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// On-screen bounding box of a mounted element, origin plus size.
///
/// This is what the rendering layer reports for the board canvas and the
/// trash target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn size(&self) -> BoardSize {
        BoardSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect {
            left: self.left,
            top: self.top,
            right: self.right(),
            bottom: self.bottom(),
        }
    }
}

/// Board dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardSize {
    pub width: f64,
    pub height: f64,
}

/// Live rectangle drawn while a create-drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
