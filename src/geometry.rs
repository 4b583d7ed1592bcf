use serde::{Deserialize, Serialize};

/// Axis-aligned box in normalized page space: all coordinates are fractions
/// [0,1] of page width/height, origin top-left, y increasing downward.
///
/// Every persisted entity stores geometry in this space; raw pixel
/// coordinates never leave the adapter layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl NormalizedBBox {
    /// Build a box from two corners in any order, clamped to [0,1].
    pub fn new(xa: f32, ya: f32, xb: f32, yb: f32) -> Self {
        Self {
            x0: xa.min(xb).clamp(0.0, 1.0),
            y0: ya.min(yb).clamp(0.0, 1.0),
            x1: xa.max(xb).clamp(0.0, 1.0),
            y1: ya.max(yb).clamp(0.0, 1.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Smallest box covering both operands.
    pub fn union(&self, other: &NormalizedBBox) -> NormalizedBBox {
        NormalizedBBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Union of a non-empty sequence of boxes.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a NormalizedBBox>) -> Option<NormalizedBBox> {
        boxes
            .into_iter()
            .copied()
            .reduce(|acc, b| acc.union(&b))
    }
}

/// Zero or negative extents would poison every division; substitute 1 so a
/// degenerate source produces degenerate (not NaN/infinite) geometry.
fn safe_extent(extent: f32) -> f32 {
    if extent <= 0.0 {
        1.0
    } else {
        extent
    }
}

/// Normalize a box given in a top-left-origin pixel space (bitmaps from the
/// renderer). Uses the physical raster size, so device-pixel-ratio scaling
/// cancels out.
pub fn normalize_top_left(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    extent_w: f32,
    extent_h: f32,
) -> NormalizedBBox {
    let ew = safe_extent(extent_w);
    let eh = safe_extent(extent_h);
    NormalizedBBox::new(x / ew, y / eh, (x + width) / ew, (y + height) / eh)
}

/// Normalize a box given in a bottom-left-origin space with y increasing
/// upward (embedded text streams). `ty` is the baseline offset from the
/// page bottom; the flip maps it into top-left space.
pub fn normalize_bottom_left(
    tx: f32,
    ty: f32,
    width: f32,
    height: f32,
    extent_w: f32,
    extent_h: f32,
) -> NormalizedBBox {
    let ew = safe_extent(extent_w);
    let eh = safe_extent(extent_h);
    let y0 = 1.0 - (ty + height) / eh;
    let y1 = 1.0 - ty / eh;
    NormalizedBBox::new(tx / ew, y0, (tx + width) / ew, y1)
}

/// On-screen bounding rectangle of the capture overlay, in screen pixels.
/// Converts raw pointer coordinates into normalized page space.
#[derive(Debug, Clone, Copy)]
pub struct ViewportRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportRect {
    /// Map a screen-space pointer position to a normalized page point.
    pub fn to_normalized(&self, screen_x: f32, screen_y: f32) -> (f32, f32) {
        let w = safe_extent(self.width);
        let h = safe_extent(self.height);
        (
            ((screen_x - self.left) / w).clamp(0.0, 1.0),
            ((screen_y - self.top) / h).clamp(0.0, 1.0),
        )
    }
}
