//! Headless walk across procedural terrain.
//!
//! Runs the movement plugin in a minimal Bevy app with a fixed frame time, a
//! floating-origin observer and a walking body over fractal noise terrain.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use fieldwalk::field::NoiseTerrain;
use fieldwalk::plugin::{LocationHud, Navigation};
use fieldwalk::{
    init_logging, ActiveMovement, FieldCollider, FieldwalkConfig, FloatingOriginTarget,
    LocationReadout, MoveAxes, MovementCamera, MovementPlugin, MovementTarget, Navigator,
    ObserverHandle, ObserverTransform, WalkingTarget, WorldRecenter, DELTA_TIME,
};
use glam::DVec3;
use log::{debug, info};

/// Walks an observer across a density-field world
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of simulation frames to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,
    /// Terrain seed
    #[arg(short, long, default_value_t = 7)]
    seed: u32,
}

const TERRAIN_BASE: f64 = 0.0;
const TERRAIN_AMPLITUDE: f64 = 8.0;
const TERRAIN_FREQUENCY: f64 = 1.0 / 64.0;

/// Pager that only reports the shifts it is asked to make.
#[derive(Debug, Default)]
struct LoggingPager {
    shifts: u64,
}

impl WorldRecenter for LoggingPager {
    fn recenter(&mut self, dx: f64, dz: f64) {
        self.shifts += 1;
        debug!("world shift #{} by ({dx:.3}, {dz:.3})", self.shifts);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<FieldwalkConfig> {
    match path {
        Some(file) => FieldwalkConfig::load(file)
            .with_context(|| format!("loading configuration from {}", file.display())),
        None => Ok(FieldwalkConfig::default()),
    }
}

fn build_app(config: &FieldwalkConfig, seed: u32) -> Result<App> {
    let terrain = NoiseTerrain::new(seed, TERRAIN_BASE, TERRAIN_AMPLITUDE, TERRAIN_FREQUENCY);
    let spawn = DVec3::new(0.0, TERRAIN_BASE + TERRAIN_AMPLITUDE + config.walker.eye_height, 0.0);

    let observer = ObserverHandle::new(ObserverTransform::from_translation(spawn));
    let origin = FloatingOriginTarget::new(observer.clone(), LoggingPager::default());
    let readout = LocationReadout::new(origin.world_position());
    let collider = FieldCollider::cached(terrain, config.cache.half_extent)
        .context("building terrain collider")?;
    let walker = WalkingTarget::new(origin, collider, config.walker)
        .context("building walking target")?;

    let mut navigator = Navigator::new(config.navigation);
    navigator.set_axes(MoveAxes {
        forward: 1.0,
        ..MoveAxes::default()
    });

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(MovementPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            DELTA_TIME,
        )))
        .insert_resource(ActiveMovement::new(walker, observer))
        .insert_resource(Navigation(navigator))
        .insert_resource(LocationHud(readout));
    app.world_mut().spawn((Transform::default(), MovementCamera));
    Ok(app)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_ref())?;
    let mut app = build_app(&config, args.seed)?;
    info!("walking {} frames over terrain seed {}", args.ticks, args.seed);

    for _ in 0..args.ticks {
        app.update();
    }

    if let Some(active) = app.world().get_resource::<ActiveMovement>() {
        let location = active.target().location();
        info!(
            "finished at {:.2}, {:.2}, {:.2}",
            location.x, location.y, location.z
        );
    }
    if let Some(hud) = app.world().get_resource::<LocationHud>() {
        info!("hud reads {}", hud.0.text());
    }
    Ok(())
}
