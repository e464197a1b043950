#![deny(unsafe_code)]
//! Headless driver for flow-studio.
//!
//! Subcommands:
//! - `render`: build a session, run N ticks with scripted control changes,
//!   export a PNG frame
//! - `params`: print the effective parameters and their schema
//! - `modes`: list color modes

mod error;
mod schedule;

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use flow_studio_core::{ColorMode, Engine, StudioConfig};
use flow_studio_render::{render_frame, snapshot};
use flow_studio_swarm::FlowStudio;
use log::{debug, info};
use schedule::ScheduledAction;

#[derive(Parser)]
#[command(name = "flow-studio", about = "Particle flow field studio")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Session settings. Flags override values from `--config`.
#[derive(Args, Debug, Default)]
struct SessionArgs {
    /// JSON config file (any subset of the session keys).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Surface width in pixels.
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Surface height in pixels.
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Direction grid cells per side.
    #[arg(long)]
    resolution: Option<usize>,

    /// PRNG seed; omit for a different run every time.
    #[arg(long)]
    seed: Option<u64>,

    /// Noise scale [0.01, 0.5].
    #[arg(long)]
    noise_scale: Option<f64>,

    /// Particle speed [0.1, 5.0].
    #[arg(long)]
    speed: Option<f64>,

    /// Particle count [100, 5000].
    #[arg(long)]
    count: Option<usize>,

    /// Trail length [10, 200].
    #[arg(long)]
    trail: Option<usize>,

    /// Color mode (white, ice, rose).
    #[arg(long)]
    color_mode: Option<String>,
}

impl SessionArgs {
    fn to_config(&self) -> Result<StudioConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
                StudioConfig::from_json(&text)?
            }
            None => StudioConfig::default(),
        };
        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.height {
            config.height = v;
        }
        if let Some(v) = self.resolution {
            config.resolution = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(v) = self.noise_scale {
            config.params.noise_scale = v;
        }
        if let Some(v) = self.speed {
            config.params.particle_speed = v;
        }
        if let Some(v) = self.count {
            config.params.particle_count = v;
        }
        if let Some(v) = self.trail {
            config.params.trail_length = v;
        }
        if let Some(name) = &self.color_mode {
            config.color_mode = ColorMode::from_name(name)?;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run the studio for N ticks and export a PNG frame.
    Render {
        #[command(flatten)]
        session: SessionArgs,

        /// Number of ticks to run.
        #[arg(short, long, default_value_t = 300)]
        ticks: u64,

        /// Randomize all controls before the first tick.
        #[arg(long)]
        randomize: bool,

        /// Scripted control change, TICK:KEY=VALUE, TICK:color=MODE or
        /// TICK:randomize. Repeatable.
        #[arg(long = "at", value_name = "TICK:ACTION")]
        actions: Vec<ScheduledAction>,

        /// Output file. Defaults to flow_field_<timestamp>.png in --out-dir.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the default timestamped file name.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print effective parameters and the parameter schema.
    Params {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// List available color modes.
    Modes,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Modes => {
            let modes = ColorMode::list_names();
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "color_modes": modes }))?
                );
            } else {
                println!("Color modes:");
                println!("  {}", modes.join(", "));
            }
        }
        Command::Params { session } => {
            let config = session.to_config()?;
            let studio = FlowStudio::new(&config)?;
            let info = serde_json::json!({
                "params": studio.params(),
                "schema": studio.param_schema(),
            });
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&info["params"])?);
            }
        }
        Command::Render {
            session,
            ticks,
            randomize,
            mut actions,
            output,
            out_dir,
        } => {
            let config = session.to_config()?;
            let mut studio = FlowStudio::new(&config)?;
            if randomize {
                let p = studio.randomize()?;
                info!("randomized: {p:?}");
            }

            actions.sort_by_key(|a| a.tick);
            let mut pending = actions.iter().peekable();
            for tick in 0..ticks {
                while let Some(action) = pending.next_if(|a| a.tick <= tick) {
                    action.apply(&mut studio)?;
                }
                studio.step()?;
            }
            for action in pending {
                debug!("action at tick {} never ran ({} ticks)", action.tick, ticks);
            }

            let canvas = render_frame(&studio)?;
            let path = match output {
                Some(path) => {
                    snapshot::write_png(&canvas, &path)?;
                    path
                }
                None => snapshot::export_frame(&canvas, &out_dir)?,
            };
            info!("saved frame to {}", path.display());

            let params = studio.params();
            if cli.json {
                let info = serde_json::json!({
                    "width": config.width,
                    "height": config.height,
                    "ticks": studio.ticks(),
                    "seed": config.seed,
                    "particles": studio.swarm().len(),
                    "params": params,
                    "output": path.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {}x{} ({} ticks, {} particles) -> {}",
                    config.width,
                    config.height,
                    studio.ticks(),
                    studio.swarm().len(),
                    path.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
