use crate::{FluidError, Grid};
use rayon::prelude::*;
use std::sync::OnceLock;

const PAR_THRESHOLD_DEFAULT: usize = 262_144;
const PAR_MIN_WORK_PER_THREAD: usize = 4096;

fn parallel_threshold() -> usize {
    static THRESHOLD: OnceLock<usize> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var("SIM_PAR_THRESHOLD")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(PAR_THRESHOLD_DEFAULT)
    })
}

/// Only for passes where each output cell reads nothing written in the same
/// pass. Relaxation sweeps never go through here.
pub(crate) fn should_parallel(len: usize) -> bool {
    if len < parallel_threshold() {
        return false;
    }
    let threads = rayon::current_num_threads().max(1);
    len / threads >= PAR_MIN_WORK_PER_THREAD
}

/// One scalar quantity over the grid, ghost ring included.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    grid: Grid,
    data: Vec<f32>,
}

impl Field {
    pub fn new(grid: Grid) -> Self {
        Self::filled(grid, 0.0)
    }

    pub fn filled(grid: Grid, fill: f32) -> Self {
        let data = vec![fill; grid.size()];
        Self { grid, data }
    }

    pub fn from_fn(grid: Grid, f: impl Fn(usize, usize) -> f32) -> Self {
        let width = grid.width();
        let data = (0..grid.size())
            .map(|i| {
                let x = i % width;
                let y = i / width;
                f(x, y)
            })
            .collect();
        Self { grid, data }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn n(&self) -> usize {
        self.grid.n()
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.grid.idx(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let i = self.grid.idx(x, y);
        self.data[i] = value;
    }

    pub fn try_get(&self, x: usize, y: usize) -> Result<f32, FluidError> {
        let i = self.grid.checked_idx(x, y)?;
        Ok(self.data[i])
    }

    pub fn try_set(&mut self, x: usize, y: usize, value: f32) -> Result<(), FluidError> {
        let i = self.grid.checked_idx(x, y)?;
        self.data[i] = value;
        Ok(())
    }

    pub(crate) fn add_at(&mut self, x: usize, y: usize, delta: f32) {
        let i = self.grid.idx(x, y);
        self.data[i] += delta;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn fill(&mut self, value: f32) {
        if should_parallel(self.data.len()) {
            self.data.par_iter_mut().for_each(|cell| *cell = value);
        } else {
            self.data.fill(value);
        }
    }

    /// Exchanges storage with `other` without touching any element.
    pub fn swap(&mut self, other: &mut Self) -> Result<(), FluidError> {
        if self.grid != other.grid {
            return Err(FluidError::ShapeMismatch {
                expected: self.grid.n(),
                found: other.grid.n(),
            });
        }
        std::mem::swap(&mut self.data, &mut other.data);
        Ok(())
    }

    /// `self += other * scale` over every cell, ghosts included.
    pub fn add_scaled_in_place(&mut self, other: &Self, scale: f32) {
        self.assert_same_grid(other);
        if should_parallel(self.data.len()) {
            self.data
                .par_iter_mut()
                .zip(other.data.par_iter())
                .for_each(|(value, other_value)| *value += other_value * scale);
        } else {
            for (value, other_value) in self.data.iter_mut().zip(other.data.iter()) {
                *value += other_value * scale;
            }
        }
    }

    /// Overwrites interior cells with `f(x, y)`; ghost cells are left alone.
    pub fn fill_interior_with_index(&mut self, f: impl Fn(usize, usize) -> f32 + Sync) {
        self.update_interior_with_index(|x, y, _| f(x, y));
    }

    pub fn update_interior_with_index(&mut self, f: impl Fn(usize, usize, f32) -> f32 + Sync) {
        let width = self.grid.width();
        let n = self.grid.n();
        let update_row = |y: usize, row: &mut [f32]| {
            for (x, value) in row.iter_mut().enumerate().take(n + 1).skip(1) {
                *value = f(x, y, *value);
            }
        };
        if should_parallel(self.data.len()) {
            self.data
                .par_chunks_mut(width)
                .enumerate()
                .skip(1)
                .take(n)
                .for_each(|(y, row)| update_row(y, row));
        } else {
            self.data
                .chunks_mut(width)
                .enumerate()
                .skip(1)
                .take(n)
                .for_each(|(y, row)| update_row(y, row));
        }
    }

    pub fn interior(&self) -> impl Iterator<Item = f32> + '_ {
        let width = self.grid.width();
        let n = self.grid.n();
        self.data
            .chunks(width)
            .skip(1)
            .take(n)
            .flat_map(move |row| row[1..=n].iter().copied())
    }

    pub fn interior_sum(&self) -> f32 {
        self.interior().sum()
    }

    pub fn interior_max(&self) -> f32 {
        self.interior().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn min_max(&self) -> (f32, f32) {
        let mut iter = self.interior().filter(|value| value.is_finite());
        let Some(first) = iter.next() else {
            return (0.0, 0.0);
        };
        iter.fold((first, first), |(lo, hi), value| (lo.min(value), hi.max(value)))
    }

    pub fn max_abs(&self) -> f32 {
        self.interior().map(f32::abs).fold(0.0_f32, f32::max)
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|value| value.is_finite())
    }

    /// Row-major copy of the `N * N` interior, bottom row first.
    pub fn interior_snapshot(&self) -> Vec<f32> {
        self.interior().collect()
    }

    pub(crate) fn assert_same_grid(&self, other: &Self) {
        assert_eq!(self.grid, other.grid, "field grid mismatch");
    }
}

/// Two physical buffers for one quantity. `current` holds this frame's value
/// and `previous` the source / scratch role; only `swap_roles` exchanges them.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldPair {
    pub current: Field,
    pub previous: Field,
}

impl FieldPair {
    pub fn new(grid: Grid) -> Self {
        Self {
            current: Field::new(grid),
            previous: Field::new(grid),
        }
    }

    pub fn grid(&self) -> Grid {
        self.current.grid()
    }

    pub fn swap_roles(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
    }

    pub fn clear(&mut self) {
        self.current.fill(0.0);
        self.previous.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    #[test]
    fn from_fn_uses_stride_n_plus_two() {
        let grid = Grid::new(3);
        let field = Field::from_fn(grid, |x, y| (x + y * 10) as f32);
        assert_close(field.get(4, 2), 24.0, 1e-6);
        assert_close(field.as_slice()[4 + 5 * 2], 24.0, 1e-6);
    }

    #[test]
    fn try_accessors_report_out_of_range() {
        let mut field = Field::new(Grid::new(2));
        assert!(field.try_set(3, 3, 1.0).is_ok());
        assert!(matches!(
            field.try_set(4, 0, 1.0),
            Err(FluidError::OutOfRange { .. })
        ));
        assert!(field.try_get(0, 4).is_err());
        assert_close(field.try_get(3, 3).unwrap(), 1.0, 1e-6);
    }

    #[test]
    fn swap_exchanges_storage_pointers() {
        let grid = Grid::new(4);
        let mut a = Field::filled(grid, 1.0);
        let mut b = Field::filled(grid, 2.0);
        let a_ptr = a.as_slice().as_ptr();
        let b_ptr = b.as_slice().as_ptr();
        a.swap(&mut b).unwrap();
        assert_eq!(a.as_slice().as_ptr(), b_ptr);
        assert_eq!(b.as_slice().as_ptr(), a_ptr);
        assert_close(a.get(2, 2), 2.0, 1e-6);
        assert_close(b.get(2, 2), 1.0, 1e-6);
    }

    #[test]
    fn swap_rejects_different_shapes() {
        let mut a = Field::filled(Grid::new(4), 1.0);
        let mut b = Field::new(Grid::new(5));
        assert_eq!(
            a.swap(&mut b),
            Err(FluidError::ShapeMismatch {
                expected: 4,
                found: 5
            })
        );
        assert_eq!(
            a.swap(&mut b).unwrap_err().to_string(),
            "field shape mismatch: expected N=4, found N=5"
        );
        assert_close(a.get(1, 1), 1.0, 1e-6);
    }

    #[test]
    fn swap_roles_moves_buffers_between_roles() {
        let grid = Grid::new(3);
        let mut pair = FieldPair::new(grid);
        pair.current.set(1, 1, 5.0);
        let current_ptr = pair.current.as_slice().as_ptr();
        pair.swap_roles();
        assert_eq!(pair.previous.as_slice().as_ptr(), current_ptr);
        assert_close(pair.previous.get(1, 1), 5.0, 1e-6);
        assert_close(pair.current.get(1, 1), 0.0, 1e-6);
    }

    #[test]
    fn add_scaled_in_place_adds_every_cell() {
        let grid = Grid::new(2);
        let mut dest = Field::filled(grid, 1.0);
        let src = Field::from_fn(grid, |x, y| (x + y) as f32);
        dest.add_scaled_in_place(&src, 0.5);
        assert_close(dest.get(0, 0), 1.0, 1e-6);
        assert_close(dest.get(3, 3), 4.0, 1e-6);
    }

    #[test]
    fn interior_helpers_skip_ghost_ring() {
        let grid = Grid::new(2);
        let mut field = Field::filled(grid, 100.0);
        field.fill_interior_with_index(|x, y| (x + 2 * y) as f32);
        assert_eq!(field.interior_snapshot(), vec![3.0, 4.0, 5.0, 6.0]);
        assert_close(field.interior_sum(), 18.0, 1e-6);
        assert_close(field.interior_max(), 6.0, 1e-6);
        assert_eq!(field.min_max(), (3.0, 6.0));
        assert_close(field.get(0, 0), 100.0, 1e-6);
    }

    #[test]
    fn update_interior_sees_previous_value() {
        let grid = Grid::new(3);
        let mut field = Field::filled(grid, 2.0);
        field.update_interior_with_index(|x, _y, value| value * x as f32);
        assert_close(field.get(3, 1), 6.0, 1e-6);
        assert_close(field.get(4, 1), 2.0, 1e-6);
    }
}
