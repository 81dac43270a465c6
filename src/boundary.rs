use crate::Field;

/// Which wall reflection a field obeys when its ghost ring is rebuilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Density, pressure, divergence: ghosts copy the adjacent interior cell.
    Scalar,
    /// `u`: negated across the left and right walls.
    HorizontalVelocity,
    /// `v`: negated across the bottom and top walls.
    VerticalVelocity,
}

impl FieldKind {
    /// Numeric tag used by compute-shader backends (0, 1, 2).
    pub fn code(self) -> u32 {
        match self {
            FieldKind::Scalar => 0,
            FieldKind::HorizontalVelocity => 1,
            FieldKind::VerticalVelocity => 2,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(FieldKind::Scalar),
            1 => Some(FieldKind::HorizontalVelocity),
            2 => Some(FieldKind::VerticalVelocity),
            _ => None,
        }
    }

    fn side_sign(self) -> f32 {
        if self == FieldKind::HorizontalVelocity {
            -1.0
        } else {
            1.0
        }
    }

    fn floor_sign(self) -> f32 {
        if self == FieldKind::VerticalVelocity {
            -1.0
        } else {
            1.0
        }
    }
}

/// Rebuilds the ghost ring of `field` from its interior.
///
/// Edges mirror the adjacent interior cell (sign-flipped for the velocity
/// component normal to that wall); each corner becomes the plain average of
/// its two neighbouring edge ghosts regardless of `kind`.
pub fn enforce(kind: FieldKind, field: &mut Field) {
    let n = field.n();
    let w = n + 2;
    let side = kind.side_sign();
    let floor = kind.floor_sign();
    let data = field.as_mut_slice();
    let at = |x: usize, y: usize| x + w * y;
    for i in 1..=n {
        data[at(0, i)] = side * data[at(1, i)];
        data[at(n + 1, i)] = side * data[at(n, i)];
        data[at(i, 0)] = floor * data[at(i, 1)];
        data[at(i, n + 1)] = floor * data[at(i, n)];
    }
    data[at(0, 0)] = 0.5 * (data[at(1, 0)] + data[at(0, 1)]);
    data[at(0, n + 1)] = 0.5 * (data[at(1, n + 1)] + data[at(0, n)]);
    data[at(n + 1, 0)] = 0.5 * (data[at(n, 0)] + data[at(n + 1, 1)]);
    data[at(n + 1, n + 1)] = 0.5 * (data[at(n, n + 1)] + data[at(n + 1, n)]);
}
