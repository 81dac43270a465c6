use crate::boundary::{enforce, FieldKind};
use crate::Field;

/// Bilinear sample of `field` at a lattice-space position already clamped to
/// `[0.5, N + 0.5]`. NaN positions fall back to the `(0, 0)` footprint.
fn sample_bilinear(field: &Field, x: f32, y: f32) -> f32 {
    let i0 = x.floor() as usize;
    let j0 = y.floor() as usize;
    let i1 = i0 + 1;
    let j1 = j0 + 1;
    let s1 = x - i0 as f32;
    let s0 = 1.0 - s1;
    let t1 = y - j0 as f32;
    let t0 = 1.0 - t1;
    s0 * (t0 * field.get(i0, j0) + t1 * field.get(i0, j1))
        + s1 * (t0 * field.get(i1, j0) + t1 * field.get(i1, j1))
}

/// Semi-Lagrangian transport of `src` along `(u, v)` into `dest`.
///
/// Each interior cell traces back `dt * N` cells against the local velocity and
/// resamples `src` there, so the step is stable for any `dt`.
pub fn advect(kind: FieldKind, dest: &mut Field, src: &Field, u: &Field, v: &Field, dt: f32) {
    dest.assert_same_grid(src);
    dest.assert_same_grid(u);
    dest.assert_same_grid(v);
    let n = dest.n() as f32;
    let dt0 = dt * n;
    let lo = 0.5;
    let hi = n + 0.5;
    dest.fill_interior_with_index(|i, j| {
        let x = (i as f32 - dt0 * u.get(i, j)).clamp(lo, hi);
        let y = (j as f32 - dt0 * v.get(i, j)).clamp(lo, hi);
        sample_bilinear(src, x, y)
    });
    enforce(kind, dest);
}
