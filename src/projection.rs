use crate::boundary::{enforce, FieldKind};
use crate::diffusion::relax;
use crate::Field;

fn central_divergence(u: &Field, v: &Field, i: usize, j: usize) -> f32 {
    u.get(i + 1, j) - u.get(i - 1, j) + v.get(i, j + 1) - v.get(i, j - 1)
}

/// Writes `-0.5 * h * div(u, v)` into the interior of `out` and rebuilds its
/// ghost ring as a scalar.
pub fn divergence_into(out: &mut Field, u: &Field, v: &Field) {
    out.assert_same_grid(u);
    out.assert_same_grid(v);
    let h = out.grid().h();
    out.fill_interior_with_index(|i, j| -0.5 * h * central_divergence(u, v, i, j));
    enforce(FieldKind::Scalar, out);
}

/// Largest absolute central-difference divergence over the interior, in
/// units of velocity per cell.
pub fn max_divergence(u: &Field, v: &Field) -> f32 {
    u.assert_same_grid(v);
    let n = u.n();
    let mut max = 0.0_f32;
    for j in 1..=n {
        for i in 1..=n {
            max = max.max((0.5 * central_divergence(u, v, i, j)).abs());
        }
    }
    max
}

/// Removes the divergent part of `(u, v)` in place.
///
/// `pressure` and `divergence` are scratch: both are overwritten, and after the
/// call `pressure` holds the relaxed solution of `laplacian(p) = divergence`.
pub fn project(u: &mut Field, v: &mut Field, pressure: &mut Field, divergence: &mut Field) {
    u.assert_same_grid(v);
    u.assert_same_grid(pressure);
    divergence_into(divergence, u, v);
    pressure.fill_interior_with_index(|_, _| 0.0);
    enforce(FieldKind::Scalar, pressure);

    relax(FieldKind::Scalar, pressure, divergence, 1.0, 4.0);

    let scale = 0.5 / u.grid().h();
    let p = &*pressure;
    u.update_interior_with_index(|i, j, value| {
        value - scale * (p.get(i + 1, j) - p.get(i - 1, j))
    });
    v.update_interior_with_index(|i, j, value| {
        value - scale * (p.get(i, j + 1) - p.get(i, j - 1))
    });
    enforce(FieldKind::HorizontalVelocity, u);
    enforce(FieldKind::VerticalVelocity, v);
}
