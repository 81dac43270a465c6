use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use stable_fluid::{
    overlay_stats, Drag, Field, FluidConfig, FluidSolver, FrameInput, LumaImage, Vec2,
};

/// Headless stable-fluids run: stirs dye with a scripted pointer and writes
/// the final density as a grayscale PGM.
#[derive(Parser, Debug)]
#[command(name = "stable_fluid", version, about)]
struct Cli {
    /// Interior cells per side
    #[arg(long, default_value_t = 128)]
    size: usize,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 240)]
    frames: u64,

    /// Fixed frame time in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    #[arg(long, default_value_t = 0.0003)]
    diffusion: f32,

    #[arg(long, default_value_t = 0.0)]
    viscosity: f32,

    /// Display pixels per grid cell in the written image
    #[arg(long, default_value_t = 4)]
    scale: usize,

    /// Frames between scripted drags
    #[arg(long, default_value_t = 30)]
    gust_every: u64,

    /// Output image (binary PGM)
    #[arg(long, value_name = "FILE", default_value = "density.pgm")]
    output: PathBuf,

    /// Skip the statistics overlay
    #[arg(long)]
    no_hud: bool,
}

/// Pointer script: dye held at the centre for the first half of the run, and
/// a drag released every `gust_every` frames whose direction rotates a
/// quarter turn each time.
fn scripted_input(
    frame: u64,
    total: u64,
    gust_every: u64,
    centre: Vec2,
    reach: f32,
) -> FrameInput {
    let dye = (frame < total / 2).then_some(centre);
    let drag = (gust_every > 0 && frame % gust_every == 0).then(|| {
        let quarter = (frame / gust_every) % 4;
        let (dx, dy) = match quarter {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        };
        Drag {
            start: centre,
            end: Vec2::new(centre.x + dx * reach, centre.y + dy * reach),
        }
    });
    FrameInput { dye, drag }
}

fn density_to_luma(density: &Field, scale: usize) -> LumaImage {
    let n = density.n();
    let scale = scale.max(1);
    let mut image = LumaImage::new(n * scale, n * scale);
    for py in 0..image.height {
        for px in 0..image.width {
            let value = density.get(1 + px / scale, 1 + py / scale);
            let t = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
            image.pixels[py * image.width + px] = (t * 255.0) as u8;
        }
    }
    image
}

fn write_pgm(path: &Path, image: &LumaImage) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write!(out, "P5\n{} {}\n255\n", image.width, image.height)?;
    out.write_all(&image.pixels)?;
    out.flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = FluidConfig {
        n: cli.size,
        diffusion: cli.diffusion,
        viscosity: cli.viscosity,
        display_scale: cli.scale,
        ..FluidConfig::default()
    };
    let mut solver = FluidSolver::new(config).context("invalid simulation settings")?;
    info!(
        "grid {}x{} diffusion={} viscosity={} dt={:.4}",
        cli.size, cli.size, cli.diffusion, cli.viscosity, cli.dt
    );

    let pixels = (cli.size * cli.scale) as f32;
    let centre = Vec2::new(pixels * 0.5, pixels * 0.5);
    let reach = pixels * 0.05;
    let started = Instant::now();
    for frame in 0..cli.frames {
        let input = scripted_input(frame, cli.frames, cli.gust_every, centre, reach);
        solver
            .advance(&input, cli.dt)
            .with_context(|| format!("frame {frame}"))?;
    }
    let elapsed = started.elapsed();
    let stats = solver.stats();
    info!(
        "{} frames in {:.2?} ({:.1} fps) mass={:.3} peak={:.3} max_div={:.2e}",
        cli.frames,
        elapsed,
        cli.frames as f64 / elapsed.as_secs_f64().max(1e-9),
        stats.mass,
        stats.peak_density,
        stats.max_divergence
    );

    let mut image = density_to_luma(solver.density(), cli.scale);
    if !cli.no_hud {
        overlay_stats(&mut image, &stats);
    }
    write_pgm(&cli.output, &image)?;
    info!("wrote {}", cli.output.display());
    Ok(())
}
