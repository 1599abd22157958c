use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::{ActionStates, InputAction};
use super::metrics::MetricsWindow;
use super::rendering::{Frame, Renderer};
use super::scene::{InputSnapshot, Layer, LayerStacks};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    /// Logical frame size in pixels; the window scales it up.
    pub logical_width: u32,
    pub logical_height: u32,
    pub window_scale: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "engine".to_string(),
            logical_width: 128,
            logical_height: 128,
            window_scale: 6,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Runs the fixed-timestep loop until the stacks drain, a layer commands a
/// quit, or the window closes. `ctx` is the game-shared state handed to
/// every layer.
pub fn run_app<C: 'static>(
    config: LoopConfig,
    mut ctx: C,
    root_scene: Box<dyn Layer<C>>,
) -> Result<(), AppError> {
    let mut stacks = LayerStacks::new(root_scene, &mut ctx);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                (config.logical_width * config.window_scale.max(1)) as f64,
                (config.logical_height * config.window_scale.max(1)) as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(
        Arc::clone(&window),
        config.logical_width,
        config.logical_height,
    )
    .map_err(AppError::CreateRenderer)?;
    let mut frame = Frame::new(config.logical_width, config.logical_height);

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        active_layer = stacks.active_layer_name().unwrap_or("none"),
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut metrics_window = MetricsWindow::new(metrics_log_interval);
    let window_for_loop = Arc::clone(&window);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
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
                        let size = window_for_loop.inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        input_collector.handle_keyboard_input(&event);
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                        last_frame_instant = now;

                        accumulator =
                            accumulator.saturating_add(raw_frame_dt.min(max_frame_delta));
                        let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                        for _ in 0..step_plan.ticks_to_run {
                            let input_snapshot = input_collector.snapshot_for_tick();
                            let done = stacks.update(&input_snapshot, &mut ctx);
                            metrics_window.note_tick();
                            if done {
                                info!(reason = "stacks_done", "shutdown_requested");
                                window_target.exit();
                                return;
                            }
                        }
                        accumulator = step_plan.remaining_accumulator;

                        if step_plan.dropped_backlog > Duration::ZERO {
                            warn!(
                                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                                max_ticks_per_frame, "sim_clamp_triggered"
                            );
                        }

                        frame.clear(0);
                        stacks.draw(&mut frame, &ctx);
                        if let Err(error) = renderer.present(&frame) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                        metrics_window.note_frame(raw_frame_dt);

                        if let Some(snapshot) = metrics_window.close_if_elapsed(now) {
                            info!(
                                fps = snapshot.fps,
                                tps = snapshot.tps,
                                frame_time_ms = snapshot.frame_time_ms,
                                active_layer = stacks.active_layer_name().unwrap_or("none"),
                                "loop_metrics"
                            );
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window_for_loop.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Folds window keyboard events into per-tick snapshots. Confirm and pause
/// are edge-triggered so menus react once per press; movement keys expose
/// their held state only.
#[derive(Debug, Default)]
struct InputCollector {
    action_states: ActionStates,
    confirm_is_down: bool,
    confirm_pressed_edge: bool,
    pause_is_down: bool,
    pause_pressed_edge: bool,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        let Some(action) = action_for_key(key_event.physical_key) else {
            return;
        };
        self.action_states.set(action, is_pressed);
        match action {
            InputAction::Confirm => {
                self.track_edge_confirm(is_pressed);
            }
            InputAction::Pause => {
                self.track_edge_pause(is_pressed);
            }
            InputAction::Up | InputAction::Down | InputAction::Left | InputAction::Right => {}
        }
    }

    fn track_edge_confirm(&mut self, is_pressed: bool) {
        if is_pressed && !self.confirm_is_down {
            self.confirm_pressed_edge = true;
        }
        self.confirm_is_down = is_pressed;
    }

    fn track_edge_pause(&mut self, is_pressed: bool) {
        if is_pressed && !self.pause_is_down {
            self.pause_pressed_edge = true;
        }
        self.pause_is_down = is_pressed;
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(
            self.action_states,
            self.confirm_pressed_edge,
            self.pause_pressed_edge,
        );
        self.confirm_pressed_edge = false;
        self.pause_pressed_edge = false;
        snapshot
    }
}

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    match key {
        PhysicalKey::Code(KeyCode::ArrowUp) | PhysicalKey::Code(KeyCode::KeyW) => {
            Some(InputAction::Up)
        }
        PhysicalKey::Code(KeyCode::ArrowDown) | PhysicalKey::Code(KeyCode::KeyS) => {
            Some(InputAction::Down)
        }
        PhysicalKey::Code(KeyCode::ArrowLeft) | PhysicalKey::Code(KeyCode::KeyA) => {
            Some(InputAction::Left)
        }
        PhysicalKey::Code(KeyCode::ArrowRight) | PhysicalKey::Code(KeyCode::KeyD) => {
            Some(InputAction::Right)
        }
        PhysicalKey::Code(KeyCode::KeyZ)
        | PhysicalKey::Code(KeyCode::Enter)
        | PhysicalKey::Code(KeyCode::Space) => Some(InputAction::Confirm),
        PhysicalKey::Code(KeyCode::Escape) | PhysicalKey::Code(KeyCode::KeyP) => {
            Some(InputAction::Pause)
        }
        _ => None,
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

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
