/// Pointer-space position or displacement, in display pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    /// Grid cell under this pixel position at `pixels_per_cell` magnification.
    /// Not clamped: negative or oversized results are left for the caller.
    pub fn to_cell(self, pixels_per_cell: usize) -> (i64, i64) {
        let scale = pixels_per_cell.max(1) as f32;
        ((self.x / scale).floor() as i64, (self.y / scale).floor() as i64)
    }
}
