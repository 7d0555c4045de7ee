//! Pigment Studio Application Builder
//!
//! Runs a pigment-pattern simulation either in a window, where the lattice is
//! drawn as a sprite texture and advanced sweep by sweep, or headless, where
//! the run goes straight to completion and the final lattice is written as a
//! PNG.
//!
//! # CLI Arguments
//!
//! - `--config <path>` - Load a JSON simulation config (defaults otherwise)
//! - `--seed <N>` - Override the config seed
//! - `--iterations <N>` - Override the config iteration count
//! - `--headless` - Run without a window and exit when done
//! - `--output <path>` - PNG path for the final lattice
//! - `--pixel-size <N>` - Pixels per site in the PNG (default: 4)
//! - `--exit-frame <N>` - Exit the viewer after N frames
//!
//! # Examples
//!
//! Interactive mode:
//! ```bash
//! cargo run -- --config configs/stripes.json
//! ```
//!
//! Headless render:
//! ```bash
//! cargo run -- --headless --seed 7 --output renders/seed7.png
//! ```

use crate::playback::PlaybackState;
use bevy::app::AppExit;
use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageSampler, ImageSamplerDescriptor};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use pigment_core::{
    lattice_rgba, load_config, render_to_png, RenderPalette, Simulation, SimulationConfig,
};
use std::path::PathBuf;

/// Default PNG path in headless mode.
pub const DEFAULT_OUTPUT: &str = "renders/pattern.png";

/// Default pixels per site in the PNG.
pub const DEFAULT_PIXEL_SIZE: u32 = 4;

/// Initial viewer speed.
pub const DEFAULT_SWEEPS_PER_SECOND: f32 = 10.0;

/// Longest side of the on-screen canvas, in pixels.
const CANVAS_EXTENT: f32 = 720.0;

/// Options gathered from the builder and the command line.
#[derive(Debug, Clone)]
pub struct PigmentStudioConfig {
    /// Window title.
    pub title: String,
    /// Window resolution (width, height).
    pub resolution: (u32, u32),
    /// Background clear color.
    pub clear_color: Color,
    /// JSON config to load.
    pub config_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub iterations: Option<usize>,
    pub headless: bool,
    /// PNG path for the final lattice.
    pub output: Option<PathBuf>,
    pub pixel_size: u32,
    /// Frame to exit on (None = run until closed).
    pub exit_frame: Option<u32>,
}

/// Fluent builder for the pigment studio.
///
/// # Example
///
/// ```ignore
/// fn main() -> AppExit {
///     PigmentStudioApp::new("Pigment Studio")
///         .with_cli_args()
///         .run()
/// }
/// ```
pub struct PigmentStudioApp {
    config: PigmentStudioConfig,
}

impl PigmentStudioApp {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            config: PigmentStudioConfig {
                title: title.into(),
                resolution: (800, 800),
                clear_color: Color::srgb(0.12, 0.12, 0.12),
                config_path: None,
                seed: None,
                iterations: None,
                headless: false,
                output: None,
                pixel_size: DEFAULT_PIXEL_SIZE,
                exit_frame: None,
            },
        }
    }

    /// Parse command-line arguments to configure the app.
    ///
    /// Unknown arguments are skipped. Malformed values print a warning and
    /// keep the current setting.
    pub fn with_cli_args(mut self) -> Self {
        let args: Vec<String> = std::env::args().collect();
        self.apply_args(&args[1.min(args.len())..]);
        self
    }

    fn apply_args(&mut self, args: &[String]) {
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = args.get(i + 1);
            match flag {
                "--headless" => {
                    self.config.headless = true;
                    i += 1;
                    continue;
                }
                "--config" | "--output" | "--seed" | "--iterations" | "--pixel-size"
                | "--exit-frame" => {}
                _ => {
                    i += 1;
                    continue;
                }
            }

            let Some(value) = value else {
                eprintln!("Warning: {} requires an argument", flag);
                i += 1;
                continue;
            };

            match flag {
                "--config" => self.config.config_path = Some(PathBuf::from(value)),
                "--output" => self.config.output = Some(PathBuf::from(value)),
                "--seed" => match value.parse() {
                    Ok(seed) => self.config.seed = Some(seed),
                    Err(_) => eprintln!("Warning: --seed requires a number"),
                },
                "--iterations" => match value.parse() {
                    Ok(n) => self.config.iterations = Some(n),
                    Err(_) => eprintln!("Warning: --iterations requires a number"),
                },
                "--pixel-size" => match value.parse() {
                    Ok(n) => self.config.pixel_size = n,
                    Err(_) => eprintln!("Warning: --pixel-size requires a number"),
                },
                "--exit-frame" => match value.parse() {
                    Ok(frame) => self.config.exit_frame = Some(frame),
                    Err(_) => eprintln!("Warning: --exit-frame requires a number"),
                },
                _ => {}
            }
            i += 2;
        }
    }

    /// Load the simulation config and apply CLI overrides.
    fn simulation_config(&self) -> Result<SimulationConfig, pigment_core::ConfigError> {
        let mut sim_config = match &self.config.config_path {
            Some(path) => load_config(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(seed) = self.config.seed {
            sim_config.seed = seed;
        }
        if let Some(iterations) = self.config.iterations {
            sim_config.iterations = iterations;
        }
        Ok(sim_config)
    }

    /// Run the application.
    pub fn run(self) -> AppExit {
        let mut app = App::new();

        // Plugins first so LogPlugin captures setup logging.
        if self.config.headless {
            app.add_plugins((MinimalPlugins, LogPlugin::default()));
        } else {
            app.add_plugins(DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    resolution: self.config.resolution.into(),
                    title: self.config.title.clone(),
                    ..default()
                }),
                ..default()
            }));
        }

        let sim_config = match self.simulation_config() {
            Ok(config) => config,
            Err(err) => {
                error!("Could not load simulation config: {}", err);
                return AppExit::error();
            }
        };
        let sim = match Simulation::from_config(&sim_config) {
            Ok(sim) => sim,
            Err(err) => {
                error!("Invalid simulation config: {}", err);
                return AppExit::error();
            }
        };

        app.insert_resource(SimulationRun {
            config: sim_config,
            sim,
        });

        let output = match (&self.config.output, self.config.headless) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(PathBuf::from(DEFAULT_OUTPUT)),
            (None, false) => None,
        };
        if let Some(path) = output {
            app.insert_resource(OutputConfig {
                path,
                pixel_size: self.config.pixel_size,
            });
        }

        if self.config.headless {
            app.add_systems(Update, headless_run_system);
        } else {
            app.insert_resource(ClearColor(self.config.clear_color));
            app.insert_resource(PlaybackState::new(DEFAULT_SWEEPS_PER_SECOND));
            app.insert_resource(FrameCounter(0));
            if let Some(exit_frame) = self.config.exit_frame {
                app.insert_resource(AutoExitConfig { exit_frame });
            }

            app.add_systems(Startup, setup);
            app.add_systems(
                Update,
                (
                    handle_input_system,
                    advance_simulation_system,
                    update_canvas_texture_system,
                    auto_exit_system,
                )
                    .chain(),
            );
        }

        app.run()
    }
}

// =============================================================================
// Internal Resources and Components
// =============================================================================

/// The run being shown, with the config it was built from.
#[derive(Resource)]
struct SimulationRun {
    config: SimulationConfig,
    sim: Simulation,
}

impl SimulationRun {
    /// Rebuild the run with the next seed.
    fn restart(&mut self) {
        self.config.seed = self.config.seed.wrapping_add(1);
        match Simulation::from_config(&self.config) {
            Ok(sim) => {
                self.sim = sim;
                info!("Restarted with seed {}", self.config.seed);
            }
            Err(err) => error!("Restart failed: {}", err),
        }
    }

    fn write_png(&self, output: &OutputConfig) -> bool {
        match render_to_png(self.sim.lattice(), &output.path, output.pixel_size) {
            Ok(()) => {
                info!("Saved lattice to {}", output.path.display());
                true
            }
            Err(err) => {
                error!("Failed to save {}: {}", output.path.display(), err);
                false
            }
        }
    }
}

/// Where to write the final lattice.
#[derive(Resource)]
struct OutputConfig {
    path: PathBuf,
    pixel_size: u32,
}

/// Handle to the canvas texture.
#[derive(Resource)]
struct CanvasTexture {
    handle: Handle<Image>,
}

/// Marker for the canvas sprite entity.
#[derive(Component)]
struct CanvasSprite;

#[derive(Resource)]
struct FrameCounter(u32);

#[derive(Resource)]
struct AutoExitConfig {
    exit_frame: u32,
}

// =============================================================================
// Systems
// =============================================================================

fn setup(mut commands: Commands, mut images: ResMut<Assets<Image>>, run: Res<SimulationRun>) {
    commands.spawn(Camera2d);

    let (rows, cols) = run.sim.lattice().dimensions();
    let size = Extent3d {
        width: cols as u32,
        height: rows as u32,
        depth_or_array_layers: 1,
    };

    let mut image = Image::new_fill(
        size,
        TextureDimension::D2,
        &[255, 255, 255, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::all(),
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor::nearest());

    let handle = images.add(image);

    let scale = (CANVAS_EXTENT / rows.max(cols) as f32).max(1.0);
    commands.spawn((
        Sprite {
            image: handle.clone(),
            custom_size: Some(Vec2::new(cols as f32 * scale, rows as f32 * scale)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 0.0),
        CanvasSprite,
    ));

    commands.insert_resource(CanvasTexture { handle });

    info!("Controls: Space play/pause, N single sweep, R restart with next seed, +/- speed");
}

/// Keyboard controls.
fn handle_input_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut playback: ResMut<PlaybackState>,
    mut run: ResMut<SimulationRun>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        playback.toggle_play();
        info!(
            "{} at {} sweeps/s",
            if playback.playing { "Playing" } else { "Paused" },
            playback.speed
        );
    }
    if keyboard.just_pressed(KeyCode::KeyN) {
        playback.request_step();
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        playback.reset();
        run.restart();
    }
    if keyboard.just_pressed(KeyCode::Equal) || keyboard.just_pressed(KeyCode::NumpadAdd) {
        playback.faster();
        info!("Speed: {} sweeps/s", playback.speed);
    }
    if keyboard.just_pressed(KeyCode::Minus) || keyboard.just_pressed(KeyCode::NumpadSubtract) {
        playback.slower();
        info!("Speed: {} sweeps/s", playback.speed);
    }
}

/// Advance the simulation based on playback speed.
fn advance_simulation_system(
    time: Res<Time>,
    mut playback: ResMut<PlaybackState>,
    mut run: ResMut<SimulationRun>,
) {
    let due = playback.take_due_sweeps(time.delta_secs());
    if due == 0 || !run.sim.is_running() {
        return;
    }

    for _ in 0..due {
        if !run.sim.step() {
            break;
        }
    }

    if !run.sim.is_running() {
        playback.pause();
    }
}

/// Re-upload the canvas texture when the lattice changed.
fn update_canvas_texture_system(
    run: Res<SimulationRun>,
    canvas: Res<CanvasTexture>,
    mut images: ResMut<Assets<Image>>,
) {
    if !run.is_changed() {
        return;
    }
    let Some(image) = images.get_mut(&canvas.handle) else {
        return;
    };
    image.data = Some(lattice_rgba(run.sim.lattice(), &RenderPalette::default()));
}

/// Exit the viewer after the configured frame, saving the lattice if an
/// output path was given.
#[allow(deprecated)]
fn auto_exit_system(
    mut frame_counter: ResMut<FrameCounter>,
    exit_config: Option<Res<AutoExitConfig>>,
    output: Option<Res<OutputConfig>>,
    run: Res<SimulationRun>,
    mut exit: EventWriter<AppExit>,
) {
    frame_counter.0 += 1;

    let Some(config) = exit_config else {
        return;
    };
    if frame_counter.0 != config.exit_frame.max(1) {
        return;
    }

    info!("Exiting after {} frames", frame_counter.0);
    let saved = output.map_or(true, |output| run.write_png(&output));
    exit.write(if saved { AppExit::Success } else { AppExit::error() });
}

/// Run every remaining sweep, write the PNG and exit.
#[allow(deprecated)]
fn headless_run_system(
    mut run: ResMut<SimulationRun>,
    output: Res<OutputConfig>,
    mut exit: EventWriter<AppExit>,
) {
    // Frames processed after the exit request find the run completed.
    if !run.sim.is_running() {
        return;
    }

    let iterations = run.sim.run();
    info!(
        "Headless run finished after {} iterations (seed {})",
        iterations, run.config.seed
    );

    if run.write_png(&output) {
        exit.write(AppExit::Success);
    } else {
        exit.write(AppExit::error());
    }
}
