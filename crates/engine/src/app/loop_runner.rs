use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::content::{AssetCatalog, AssetSource, CatalogError, DirAssetSource, Image};
use crate::world::{LevelError, LevelNaming, LevelSession, SessionStore};
use crate::{resolve_app_paths, StartupError};

use super::director::LevelDirector;
use super::rendering::{Renderer, SceneRenderer, BACKGROUND_LAYER_COUNT};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    /// Asset names of the parallax layers, far to near. Missing entries draw
    /// nothing and the screen is cleared to black instead.
    pub backgrounds: Vec<String>,
    pub level_naming: LevelNaming,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Tilegame".to_string(),
            window_width: 800,
            window_height: 600,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            backgrounds: Vec::new(),
            level_naming: LevelNaming::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load asset catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("failed to load first level: {0}")]
    Level(#[from] LevelError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig) -> Result<(), AppError> {
    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        assets_dir = %app_paths.assets_dir.display(),
        cache_dir = %app_paths.cache_dir.display(),
        "startup"
    );

    let source = DirAssetSource::new(&app_paths.assets_dir);
    let catalog = AssetCatalog::load(&source)?;
    let mut scene = SceneRenderer::new();
    let [far, middle, near] = load_backgrounds(&source, &config.backgrounds);
    scene.set_backgrounds(far, middle, near);

    let store = SessionStore::in_cache_dir(&app_paths.cache_dir);
    let session = match store.load() {
        Ok(saved) => saved.unwrap_or_default(),
        Err(error) => {
            warn!(error = %error, "session_load_failed");
            LevelSession::default()
        }
    };
    let mut director = LevelDirector::new(
        catalog,
        Box::new(source),
        config.level_naming.clone(),
        session,
        Some(store),
    );
    director.start()?;

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_ms = fixed_dt.as_millis().max(1) as u64;
    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        "loop_config"
    );

    let mut keys = KeyCommands::default();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    keys.handle_keyboard_input(&event);
                    if keys.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    match keys.take_command() {
                        Some(LevelCommand::Next) => {
                            if let Err(error) = director.next_level() {
                                warn!(error = %error, "level_advance_failed");
                            }
                        }
                        Some(LevelCommand::Reload) => {
                            if let Err(error) = director.reload_level() {
                                debug!(error = %error, "level_reload_skipped");
                            }
                        }
                        None => {}
                    }

                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;
                    accumulator =
                        accumulator.saturating_add(clamp_frame_delta(raw_frame_dt, max_frame_delta));

                    let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                    accumulator = step_plan.remaining_accumulator;
                    if step_plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame, "sim_clamp_triggered"
                        );
                    }

                    let Some(level) = director.level_mut() else {
                        return;
                    };
                    for _ in 0..step_plan.ticks_to_run {
                        level.update(fixed_dt_ms);
                    }
                    if let Err(error) = renderer.render(&scene, level) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!(
                    level_index = director.session().current_index(),
                    "shutdown"
                );
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn load_backgrounds(
    source: &dyn AssetSource,
    names: &[String],
) -> [Option<Image>; BACKGROUND_LAYER_COUNT] {
    if names.len() > BACKGROUND_LAYER_COUNT {
        warn!(
            configured = names.len(),
            used = BACKGROUND_LAYER_COUNT,
            "extra_backgrounds_ignored"
        );
    }
    std::array::from_fn(|slot| {
        let name = names.get(slot)?;
        match source.load_image(name) {
            Ok(image) => Some(image),
            Err(error) => {
                warn!(name = name.as_str(), error = %error, "background_missing");
                None
            }
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelCommand {
    Next,
    Reload,
}

/// Developer keys. `N` and `R` fire once per press; holding them does not
/// repeat.
#[derive(Debug, Default)]
struct KeyCommands {
    quit_requested: bool,
    next_is_down: bool,
    reload_is_down: bool,
    pending: Option<LevelCommand>,
}

impl KeyCommands {
    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        self.handle_key(key_event.physical_key, key_event.state);
    }

    fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        let is_pressed = state == ElementState::Pressed;
        match key {
            PhysicalKey::Code(KeyCode::Escape) => {
                if is_pressed {
                    self.quit_requested = true;
                }
            }
            PhysicalKey::Code(KeyCode::KeyN) => {
                if is_pressed && !self.next_is_down {
                    self.pending = Some(LevelCommand::Next);
                }
                self.next_is_down = is_pressed;
            }
            PhysicalKey::Code(KeyCode::KeyR) => {
                if is_pressed && !self.reload_is_down {
                    self.pending = Some(LevelCommand::Reload);
                }
                self.reload_is_down = is_pressed;
            }
            _ => {}
        }
    }

    fn take_command(&mut self) -> Option<LevelCommand> {
        self.pending.take()
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;
    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
