mod advection;
mod boundary;
mod config;
mod diffusion;
mod error;
mod field;
mod grid;
mod hud;
mod impulse;
mod projection;
mod solver;
mod vec2;

pub use advection::advect;
pub use boundary::{enforce, FieldKind};
pub use config::FluidConfig;
pub use diffusion::{diffuse, RELAX_ITERATIONS};
pub use error::FluidError;
pub use field::{Field, FieldPair};
pub use grid::Grid;
pub use hud::{overlay_stats, LumaImage, GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH, LINE_SPACING};
pub use impulse::{
    add_directional_force, add_point_source, clamp_frame_dt, paint_input, Drag, FrameInput,
};
pub use projection::{divergence_into, max_divergence, project};
pub use solver::{add_source, density_step, velocity_step, FluidSolver, FrameStats};
pub use vec2::Vec2;
