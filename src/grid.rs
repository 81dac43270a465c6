use crate::FluidError;

/// Square simulation grid: `n` interior cells per side plus one ghost cell on
/// each edge, so every buffer is `(n + 2) * (n + 2)` long.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    n: usize,
}

impl Grid {
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "resolution must be > 0");
        Self { n }
    }

    /// Interior resolution `N`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Row stride, `N + 2`.
    pub fn width(&self) -> usize {
        self.n + 2
    }

    pub fn size(&self) -> usize {
        self.width() * self.width()
    }

    /// Grid spacing `h = 1 / N`.
    pub fn h(&self) -> f32 {
        1.0 / self.n as f32
    }

    pub fn idx(&self, x: usize, y: usize) -> usize {
        assert!(
            self.contains(x, y),
            "cell ({x}, {y}) outside 0..={} grid",
            self.n + 1
        );
        x + self.width() * y
    }

    pub fn checked_idx(&self, x: usize, y: usize) -> Result<usize, FluidError> {
        if self.contains(x, y) {
            Ok(x + self.width() * y)
        } else {
            Err(FluidError::OutOfRange {
                x: x as i64,
                y: y as i64,
                n: self.n,
            })
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x <= self.n + 1 && y <= self.n + 1
    }

    pub fn is_interior(&self, x: i64, y: i64) -> bool {
        let n = self.n as i64;
        (1..=n).contains(&x) && (1..=n).contains(&y)
    }

    /// Clamps a signed coordinate into the interior range `1..=N`.
    pub fn clamp_interior(&self, x: i64, y: i64) -> (usize, usize) {
        let n = self.n as i64;
        (x.clamp(1, n) as usize, y.clamp(1, n) as usize)
    }
}
