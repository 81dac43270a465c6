use crate::boundary::{enforce, FieldKind};
use crate::Field;

/// Sweep count for both the diffusion and pressure relaxations.
pub const RELAX_ITERATIONS: usize = 20;

/// Gauss-Seidel solve of `c*x - a*(sum of 4 neighbours of x) = x0` over the
/// interior, row-major, with the ghost ring rebuilt after every sweep.
pub(crate) fn relax(kind: FieldKind, x: &mut Field, x0: &Field, a: f32, c: f32) {
    x.assert_same_grid(x0);
    let n = x.n();
    let w = n + 2;
    let c_recip = 1.0 / c;
    for _ in 0..RELAX_ITERATIONS {
        {
            let rhs = x0.as_slice();
            let data = x.as_mut_slice();
            for j in 1..=n {
                let row = j * w;
                for i in 1..=n {
                    let k = row + i;
                    let sum = data[k - 1] + data[k + 1] + data[k - w] + data[k + w];
                    data[k] = (rhs[k] + a * sum) * c_recip;
                }
            }
        }
        enforce(kind, x);
    }
}

/// Implicit (backward Euler) diffusion of `src` into `dest`.
///
/// `dest` doubles as the initial guess and is relaxed in place, so the result
/// depends on the row-major sweep order. A zero `rate` or `dt` makes every
/// sweep copy `src` straight through.
pub fn diffuse(kind: FieldKind, dest: &mut Field, src: &Field, rate: f32, dt: f32) {
    let n = dest.n() as f32;
    let a = dt * rate * n * n;
    relax(kind, dest, src, a, 1.0 + 4.0 * a);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn spike(n: usize, at: (usize, usize), value: f32) -> Field {
        let mut field = Field::new(Grid::new(n));
        field.set(at.0, at.1, value);
        field
    }

    #[test]
    fn zero_rate_copies_interior() {
        let grid = Grid::new(6);
        let src = Field::from_fn(grid, |x, y| (x * 3 + y) as f32);
        let mut dest = Field::filled(grid, 9.0);
        diffuse(FieldKind::Scalar, &mut dest, &src, 0.0, 0.1);
        assert_eq!(dest.interior_snapshot(), src.interior_snapshot());
    }

    #[test]
    fn zero_dt_copies_interior() {
        let grid = Grid::new(5);
        let src = spike(5, (3, 3), 4.0);
        let mut dest = Field::new(grid);
        diffuse(FieldKind::Scalar, &mut dest, &src, 1.0, 0.0);
        assert_eq!(dest.interior_snapshot(), src.interior_snapshot());
    }

    #[test]
    fn diffusion_spreads_peak_to_neighbours() {
        let src = spike(9, (5, 5), 10.0);
        let mut dest = Field::new(src.grid());
        diffuse(FieldKind::Scalar, &mut dest, &src, 0.01, 0.1);
        assert!(dest.get(5, 5) < 10.0);
        assert!(dest.get(4, 5) > 0.0);
        assert_close(dest.get(4, 5), dest.get(5, 4), 1e-3);
    }

    #[test]
    fn scalar_diffusion_keeps_mass_with_reflective_walls() {
        let src = spike(8, (1, 1), 10.0);
        let mut dest = Field::new(src.grid());
        diffuse(FieldKind::Scalar, &mut dest, &src, 0.001, 0.1);
        assert_close(dest.interior_sum(), 10.0, 0.05);
    }

    #[test]
    fn ghost_ring_is_enforced_after_diffusion() {
        let src = spike(6, (1, 3), 2.0);
        let mut dest = Field::new(src.grid());
        diffuse(FieldKind::HorizontalVelocity, &mut dest, &src, 0.01, 0.1);
        for i in 1..=6 {
            assert_eq!(dest.get(0, i), -dest.get(1, i));
        }
    }

    fn row_major_sweeps(x: &mut Field, x0: &Field, a: f32, c: f32, in_place: bool) {
        let n = x.n();
        for _ in 0..RELAX_ITERATIONS {
            let old = x.clone();
            for j in 1..=n {
                for i in 1..=n {
                    let sum = {
                        let from: &Field = if in_place { &*x } else { &old };
                        from.get(i - 1, j) + from.get(i + 1, j) + from.get(i, j - 1)
                            + from.get(i, j + 1)
                    };
                    x.set(i, j, (x0.get(i, j) + a * sum) * (1.0 / c));
                }
            }
            enforce(FieldKind::Scalar, x);
        }
    }

    #[test]
    fn relax_sweeps_in_place_row_major() {
        let grid = Grid::new(3);
        let mut src = Field::new(grid);
        src.fill_interior_with_index(|x, y| (x * x + 2 * y) as f32);

        let mut relaxed = Field::new(grid);
        relax(FieldKind::Scalar, &mut relaxed, &src, 1.0, 5.0);

        let mut gauss_seidel = Field::new(grid);
        row_major_sweeps(&mut gauss_seidel, &src, 1.0, 5.0, true);
        assert_eq!(relaxed, gauss_seidel);

        let mut jacobi = Field::new(grid);
        row_major_sweeps(&mut jacobi, &src, 1.0, 5.0, false);
        let gap = relaxed
            .interior()
            .zip(jacobi.interior())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f32, f32::max);
        assert!(gap > 1e-2, "jacobi result too close: {gap}");
    }

    #[test]
    fn diffuse_matches_row_major_reference() {
        let grid = Grid::new(3);
        let mut src = Field::new(grid);
        src.fill_interior_with_index(|x, y| (3 * x + y * y) as f32);
        // a = dt * rate * N^2 = 1
        let (rate, dt) = (0.25, 4.0 / 9.0);
        let a = dt * rate * 3.0 * 3.0;
        let mut dest = Field::new(grid);
        diffuse(FieldKind::Scalar, &mut dest, &src, rate, dt);
        let mut expected = Field::new(grid);
        row_major_sweeps(&mut expected, &src, a, 1.0 + 4.0 * a, true);
        assert_eq!(dest, expected);
    }

    #[test]
    fn relax_with_zero_rhs_keeps_zero_field() {
        let grid = Grid::new(4);
        let div = Field::new(grid);
        let mut p = Field::new(grid);
        relax(FieldKind::Scalar, &mut p, &div, 1.0, 4.0);
        assert_eq!(p.max_abs(), 0.0);
        assert!(p.is_finite());
    }
}
