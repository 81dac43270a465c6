use crate::advection::advect;
use crate::boundary::FieldKind;
use crate::diffusion::diffuse;
use crate::impulse::{add_directional_force, add_point_source, clamp_frame_dt, paint_input};
use crate::projection::{max_divergence, project};
use crate::{Field, FieldPair, FluidConfig, FluidError, FrameInput, Grid};
use log::{debug, warn};

/// `dest += dt * src` over the whole buffer.
pub fn add_source(dest: &mut Field, src: &Field, dt: f32) {
    dest.add_scaled_in_place(src, dt);
}

/// Advances the velocity pair by one frame.
///
/// On entry `previous` holds the frame's injected forces; on exit `current`
/// holds the new velocity and `previous` is scratch.
pub fn velocity_step(u: &mut FieldPair, v: &mut FieldPair, viscosity: f32, dt: f32) {
    add_source(&mut u.current, &u.previous, dt);
    add_source(&mut v.current, &v.previous, dt);

    u.swap_roles();
    diffuse(FieldKind::HorizontalVelocity, &mut u.current, &u.previous, viscosity, dt);
    v.swap_roles();
    diffuse(FieldKind::VerticalVelocity, &mut v.current, &v.previous, viscosity, dt);
    project(&mut u.current, &mut v.current, &mut u.previous, &mut v.previous);

    u.swap_roles();
    v.swap_roles();
    advect(
        FieldKind::HorizontalVelocity,
        &mut u.current,
        &u.previous,
        &u.previous,
        &v.previous,
        dt,
    );
    advect(
        FieldKind::VerticalVelocity,
        &mut v.current,
        &v.previous,
        &u.previous,
        &v.previous,
        dt,
    );
    project(&mut u.current, &mut v.current, &mut u.previous, &mut v.previous);
}

/// Advances the density pair by one frame, carrying it along `(u, v)`.
///
/// On entry `density.previous` holds the frame's injected dye.
pub fn density_step(density: &mut FieldPair, u: &Field, v: &Field, diffusion: f32, dt: f32) {
    add_source(&mut density.current, &density.previous, dt);
    density.swap_roles();
    diffuse(
        FieldKind::Scalar,
        &mut density.current,
        &density.previous,
        diffusion,
        dt,
    );
    density.swap_roles();
    advect(
        FieldKind::Scalar,
        &mut density.current,
        &density.previous,
        u,
        v,
        dt,
    );
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub dt: f32,
    pub mass: f32,
    pub peak_density: f32,
    pub max_speed: f32,
    pub max_divergence: f32,
}

/// Owns every field of one simulation and runs whole frames.
#[derive(Clone, Debug)]
pub struct FluidSolver {
    config: FluidConfig,
    grid: Grid,
    u: FieldPair,
    v: FieldPair,
    density: FieldPair,
    frame: u64,
    last_dt: f32,
}

impl FluidSolver {
    pub fn new(config: FluidConfig) -> Result<Self, FluidError> {
        config.validate()?;
        let grid = Grid::new(config.n);
        Ok(Self {
            config,
            grid,
            u: FieldPair::new(grid),
            v: FieldPair::new(grid),
            density: FieldPair::new(grid),
            frame: 0,
            last_dt: 0.0,
        })
    }

    pub fn config(&self) -> &FluidConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn density(&self) -> &Field {
        &self.density.current
    }

    pub fn velocity_u(&self) -> &Field {
        &self.u.current
    }

    pub fn velocity_v(&self) -> &Field {
        &self.v.current
    }

    /// Interior density, row-major, for the renderer.
    pub fn density_snapshot(&self) -> Vec<f32> {
        self.density.current.interior_snapshot()
    }

    pub fn density_source_mut(&mut self) -> &mut Field {
        &mut self.density.previous
    }

    pub fn velocity_sources_mut(&mut self) -> (&mut Field, &mut Field) {
        (&mut self.u.previous, &mut self.v.previous)
    }

    /// Zeroes every source buffer so impulses last exactly one frame.
    pub fn begin_frame(&mut self) {
        self.u.previous.fill(0.0);
        self.v.previous.fill(0.0);
        self.density.previous.fill(0.0);
    }

    /// Stamps the configured dye square centred on interior cell `(x, y)`.
    pub fn add_dye(&mut self, x: i64, y: i64) -> Result<(), FluidError> {
        add_point_source(
            &mut self.density.previous,
            x,
            y,
            self.config.dye_radius,
            self.config.dye_amount,
        )
    }

    pub fn add_force(&mut self, x: i64, y: i64, fx: f32, fy: f32) -> Result<(), FluidError> {
        add_directional_force(&mut self.u.previous, x, y, fx)?;
        add_directional_force(&mut self.v.previous, x, y, fy)
    }

    pub fn apply_input(&mut self, input: &FrameInput) -> Result<(), FluidError> {
        paint_input(
            input,
            &self.config,
            &mut self.density.previous,
            &mut self.u.previous,
            &mut self.v.previous,
        )
    }

    /// Runs the velocity step then the density step on whatever the source
    /// buffers currently hold. `dt` is used as given.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            warn!("frame {}: stepping with suspicious dt={dt}", self.frame);
        }
        velocity_step(&mut self.u, &mut self.v, self.config.viscosity, dt);
        density_step(
            &mut self.density,
            &self.u.current,
            &self.v.current,
            self.config.diffusion,
            dt,
        );
        self.frame += 1;
        self.last_dt = dt;
        if log::log_enabled!(log::Level::Debug) {
            let stats = self.stats();
            debug!(
                "frame={} dt={:.4} mass={:.3} peak={:.3} speed={:.3} div={:.2e}",
                stats.frame,
                stats.dt,
                stats.mass,
                stats.peak_density,
                stats.max_speed,
                stats.max_divergence
            );
        }
    }

    /// One complete frame: clear sources, paint `input`, clamp `dt` to the
    /// configured ceiling and step.
    pub fn advance(&mut self, input: &FrameInput, dt: f32) -> Result<(), FluidError> {
        self.begin_frame();
        self.apply_input(input)?;
        self.step(clamp_frame_dt(dt, self.config.max_dt));
        Ok(())
    }

    pub fn reset(&mut self) {
        self.u.clear();
        self.v.clear();
        self.density.clear();
        self.frame = 0;
        self.last_dt = 0.0;
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frame: self.frame,
            dt: self.last_dt,
            mass: self.density.current.interior_sum(),
            peak_density: self.density.current.interior_max(),
            max_speed: self.u.current.max_abs().max(self.v.current.max_abs()),
            max_divergence: max_divergence(&self.u.current, &self.v.current),
        }
    }
}
