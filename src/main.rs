//! Playfield headless runner.
//!
//! Loads a configuration and a scene, steps the simulation at a fixed rate
//! for a given number of simulated seconds, and logs what happened.
//!
//! # Running
//!
//! ```text
//! playfield --config assets/config.ini --scene assets/scenes/bouncing.json --seconds 30
//! RUST_LOG=debug playfield --scene assets/scenes/bouncing.json
//! playfield --write-config my_config.ini
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{debug, error, info};

use playfield::error::SimError;
use playfield::resources::simconfig::SimConfig;
use playfield::scene::SceneDescription;
use playfield::simulation::Simulation;

#[derive(Parser)]
#[command(version, about = "Headless runner for the Playfield 2D simulation")]
struct Cli {
    /// INI configuration file. Built-in defaults when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON scene to load.
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Simulated seconds to run.
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Fixed step length in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Override the random seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the effective configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), SimError> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::load_from_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    if let Some(path) = &cli.write_config {
        config.save_to_file(path)?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    if !(cli.dt.is_finite() && cli.dt > 0.0) {
        return Err(SimError::Config(format!("--dt must be positive, got {}", cli.dt)));
    }

    let mut sim = Simulation::new(config)?;
    install_handlers(&mut sim);

    if let Some(path) = &cli.scene {
        let scene = SceneDescription::load_from_file(path)?;
        scene.apply(&mut sim)?;
    } else {
        info!("No scene given, running an empty playfield");
    }

    let steps = (cli.seconds.max(0.0) / cli.dt).ceil() as u64;
    let steps_per_report = (1.0 / cli.dt).round().max(1.0) as u64;
    for step in 1..=steps {
        sim.tick(cli.dt);
        if step % steps_per_report == 0 {
            let camera = sim.camera_position();
            info!(
                "t={:.2}s entities={} collisions={} camera=({:.1}, {:.1})",
                sim.elapsed(),
                sim.active_count(),
                sim.collision_count(),
                camera.x,
                camera.y
            );
        }
    }

    info!(
        "Finished after {} steps ({:.2}s simulated): {} entities alive, {} collisions, {} spawned",
        sim.frame_count(),
        sim.elapsed(),
        sim.active_count(),
        sim.collision_count(),
        sim.signals().get_integer("spawned").unwrap_or(0)
    );
    Ok(())
}

/// Bookkeeping handlers shared by every scene run from the command line.
fn install_handlers(sim: &mut Simulation) {
    sim.on_spawn(|ctx, event| {
        ctx.signals_mut().add_integer("spawned", 1);
        debug!("Rule {:?} spawned {} ({} so far)", event.rule, event.id, event.spawned_count);
    });
    sim.on_collision(|ctx, a, b| {
        let total = ctx.signals_mut().add_integer("collisions", 1);
        debug!("Collision #{} between {} and {}", total, a, b);
    });
    sim.on_timer(|ctx, event| {
        info!("Timer signal '{}' at {:.2}s", event.signal, ctx.time());
        ctx.signals_mut().set_flag(event.signal.clone());
    });
    sim.on_tween_complete(|_ctx, event| {
        debug!("Tween {:?} on {} finished", event.property, event.target);
    });
}
