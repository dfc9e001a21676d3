use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use snowrunner::catalog::Catalog;
use snowrunner::config::GameConfig;
use snowrunner::level::load_level;
use snowrunner::math::{Rect, Vector2};
use snowrunner::session::{GameEvent, GameSession, GameState};
use snowrunner::systems::{DrawList, InputCommand, InputSystem, PhysicsSystem, Renderer, TimeSystem};
use snowrunner::world::{FrameContext, ObjectManager};
use snowrunner::GameError;

#[derive(Parser)]
#[command(name = "snowrunner")]
#[command(about = "Run, jump and collect gems across the snowy hills")]
struct Args {
    /// Path to the INI configuration file
    #[arg(short, long, default_value = "./config.ini")]
    config: PathBuf,

    /// Draw collision bounds
    #[arg(long)]
    debug: bool,
}

struct App {
    // Systems
    renderer: Option<Renderer>,
    timing: TimeSystem,
    physics: PhysicsSystem,
    input: InputSystem,

    // Game state
    config: GameConfig,
    manager: ObjectManager,
    session: GameSession,
    draw_list: DrawList,
    debug: bool,
}

impl App {
    fn new(config: GameConfig, manager: ObjectManager) -> Self {
        Self {
            renderer: None,
            timing: TimeSystem::new(config.sim_hz),
            physics: PhysicsSystem::with_constants(config.gravity, config.friction),
            input: InputSystem::new(),
            session: GameSession::new(config.lives, config.target_score),
            debug: config.debug,
            config,
            manager,
            draw_list: DrawList::new(),
        }
    }

    fn screen(&self) -> Rect {
        let (width, height) = self.config.window_size();
        Rect::new(0.0, 0.0, width as f32, height as f32)
    }

    fn handle_input_command(&mut self, event_loop: &ActiveEventLoop, command: InputCommand) {
        match command {
            InputCommand::Exit => {
                info!("Exiting application");
                event_loop.exit();
            }
            InputCommand::StartGame => self.session.start(&mut self.manager),
            InputCommand::TogglePause => {
                self.session.toggle_pause(&mut self.manager);
                let paused = self.session.state() == GameState::Paused;
                if paused != self.timing.is_paused() {
                    self.timing.toggle_pause(Instant::now());
                }
            }
            InputCommand::ToggleDebug => {
                self.debug = !self.debug;
                info!("Collision bounds overlay: {}", self.debug);
            }
        }
        self.request_redraw();
    }

    /// Runs `steps` fixed updates; stops at the first error.
    fn simulate(&mut self, steps: u32) -> Result<(), GameError> {
        for _ in 0..steps {
            let ctx = FrameContext {
                time: self.timing.game_time(),
                input: &self.input.keyboard,
                physics: &self.physics,
            };
            self.manager.update(&ctx, &mut self.session)?;
            self.timing.advance_step();
        }
        Ok(())
    }

    fn log_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                GameEvent::PickupCollected { id, value } => {
                    info!("Collected {id} (+{value}), score {}", self.session.score())
                }
                GameEvent::PlayerHit { lives_left } => info!("Player hit, {lives_left} lives left"),
                GameEvent::Won { score } => info!("Won with {score} points"),
                GameEvent::Lost { score } => info!("Lost with {score} points"),
                other => log::debug!("{other:?}"),
            }
        }
    }

    fn request_redraw(&self) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window.request_redraw();
        }
    }

    fn redraw(&mut self) {
        let screen = self.screen();
        self.draw_list.clear();
        self.manager.draw(&mut self.draw_list, &screen);
        let bounds = if self.debug {
            self.manager.debug_bounds()
        } else {
            Vec::new()
        };
        let hud = self.session.hud_text();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&self.draw_list, &bounds, &hud);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        let (width, height) = self.config.window_size();
        let attributes = Window::default_attributes()
            .with_title("Snowrunner")
            .with_inner_size(LogicalSize::new(width, height));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let logical = Vector2::new(width as f32, height as f32);
        match pollster::block_on(Renderer::new(window.clone(), logical)) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(err) => {
                error!("Failed to initialise renderer: {err}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window close requested");
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                    renderer.window.request_redraw();
                }
            }

            WindowEvent::Focused(false) => self.input.focus_lost(),

            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.input.update_modifiers(new_modifiers.state());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let command =
                        self.input
                            .handle_key(keycode, event.state.is_pressed(), event.repeat);
                    if let Some(command) = command {
                        self.handle_input_command(event_loop, command);
                    }
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let tick = self.timing.tick(Instant::now());

        if let Err(err) = self.simulate(tick.steps) {
            error!("Frame update failed: {err}");
            event_loop.exit();
            return;
        }
        self.log_events();

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.frame_stats.sim_steps_accum += tick.steps;
        }
        if tick.needs_redraw {
            self.request_redraw();
        }

        let next = self.timing.next_wakeup();
        event_loop.set_control_flow(ControlFlow::WaitUntil(next));
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut config = GameConfig::with_path(&args.config);
    if let Err(err) = config.load_from_file() {
        warn!("{err}; using default configuration");
    }
    config.debug |= args.debug;

    let manager = match Catalog::embedded().and_then(|catalog| load_level(&catalog, &config)) {
        Ok(manager) => manager,
        Err(err) => {
            error!("Failed to load level: {err}");
            std::process::exit(1);
        }
    };
    info!("Level loaded with {} sprites; press Enter to start", manager.len());

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!("Failed to create event loop: {err}");
            std::process::exit(1);
        }
    };
    let mut app = App::new(config, manager);
    if let Err(err) = event_loop.run_app(&mut app) {
        error!("Event loop error: {err}");
    }
}
