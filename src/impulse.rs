use crate::{Field, FluidConfig, FluidError, Vec2};

/// Adds `amount` to every cell of the half-open square
/// `[x - radius, x + radius) x [y - radius, y + radius)`, clipped to the
/// interior. A radius of 1 stamps a 2x2 block.
///
/// The centre must be an interior cell; otherwise nothing is written.
pub fn add_point_source(
    field: &mut Field,
    x: i64,
    y: i64,
    radius: usize,
    amount: f32,
) -> Result<(), FluidError> {
    let grid = field.grid();
    if !grid.is_interior(x, y) {
        return Err(FluidError::OutOfRange { x, y, n: grid.n() });
    }
    let n = grid.n() as i64;
    let r = i64::try_from(radius).unwrap_or(i64::MAX);
    let (x_lo, x_hi) = (x.saturating_sub(r).max(1), x.saturating_add(r).min(n + 1));
    let (y_lo, y_hi) = (y.saturating_sub(r).max(1), y.saturating_add(r).min(n + 1));
    for j in y_lo..y_hi {
        for i in x_lo..x_hi {
            field.add_at(i as usize, j as usize, amount);
        }
    }
    Ok(())
}

/// Adds `magnitude` to the single interior cell `(x, y)`.
pub fn add_directional_force(
    field: &mut Field,
    x: i64,
    y: i64,
    magnitude: f32,
) -> Result<(), FluidError> {
    let grid = field.grid();
    if !grid.is_interior(x, y) {
        return Err(FluidError::OutOfRange { x, y, n: grid.n() });
    }
    field.add_at(x as usize, y as usize, magnitude);
    Ok(())
}

/// A completed secondary-button drag, in display pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drag {
    pub start: Vec2,
    pub end: Vec2,
}

impl Drag {
    pub fn force(&self, force_scale: f32) -> Vec2 {
        self.start.sub(self.end).scale(force_scale)
    }
}

/// Pointer state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position while the primary button is held.
    pub dye: Option<Vec2>,
    /// Drag released during this frame.
    pub drag: Option<Drag>,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.dye.is_none() && self.drag.is_none()
    }
}

/// Paints one frame of pointer input into the source buffers. Pointer
/// positions are clamped onto the interior first, so off-window input still
/// lands on the nearest edge cell.
pub fn paint_input(
    input: &FrameInput,
    config: &FluidConfig,
    density_source: &mut Field,
    u_source: &mut Field,
    v_source: &mut Field,
) -> Result<(), FluidError> {
    let grid = density_source.grid();
    if let Some(pos) = input.dye {
        let (cx, cy) = pos.to_cell(config.display_scale);
        let (x, y) = grid.clamp_interior(cx, cy);
        add_point_source(
            density_source,
            x as i64,
            y as i64,
            config.dye_radius,
            config.dye_amount,
        )?;
    }
    if let Some(drag) = input.drag {
        let force = drag.force(config.force_scale);
        let (cx, cy) = drag.start.to_cell(config.display_scale);
        let (x, y) = grid.clamp_interior(cx, cy);
        add_directional_force(u_source, x as i64, y as i64, force.x)?;
        add_directional_force(v_source, x as i64, y as i64, force.y)?;
    }
    Ok(())
}

/// Sanitises a measured frame time: non-finite or non-positive values become
/// zero and long stalls are capped at `max_dt`.
pub fn clamp_frame_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max_dt)
}
