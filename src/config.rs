use crate::FluidError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidConfig {
    /// Interior cells per side.
    pub n: usize,
    pub diffusion: f32,
    pub viscosity: f32,
    /// Dye added to each stamped cell while the primary pointer is held.
    pub dye_amount: f32,
    /// Half-width of the square dye stamp, in cells.
    pub dye_radius: usize,
    /// Multiplier applied to `drag_start - drag_end` (display pixels) to get
    /// the injected force.
    pub force_scale: f32,
    /// Display pixels per grid cell.
    pub display_scale: usize,
    /// Upper bound applied to frame times before stepping.
    pub max_dt: f32,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            n: 200,
            diffusion: 0.0003,
            viscosity: 0.0,
            dye_amount: 50.0,
            dye_radius: 1,
            force_scale: -80.0,
            display_scale: 4,
            max_dt: 0.1,
        }
    }
}

impl FluidConfig {
    pub fn with_resolution(n: usize) -> Self {
        Self {
            n,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), FluidError> {
        if self.n == 0 {
            return Err(FluidError::InvalidConfig("resolution must be > 0".into()));
        }
        if self.display_scale == 0 {
            return Err(FluidError::InvalidConfig("display scale must be > 0".into()));
        }
        for (name, value) in [
            ("diffusion", self.diffusion),
            ("viscosity", self.viscosity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FluidError::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        if !self.dye_amount.is_finite() || !self.force_scale.is_finite() {
            return Err(FluidError::InvalidConfig(
                "impulse magnitudes must be finite".into(),
            ));
        }
        if !self.max_dt.is_finite() || self.max_dt <= 0.0 {
            return Err(FluidError::InvalidConfig(format!(
                "max_dt must be finite and > 0, got {}",
                self.max_dt
            )));
        }
        Ok(())
    }
}
