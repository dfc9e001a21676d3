//! Game configuration loaded from an INI file.
//!
//! Missing keys keep their defaults, so a partial file is fine.
//!
//! ```ini
//! [window]
//! width = 1056
//! height = 808
//!
//! [game]
//! lives = 2
//! target_score = 50
//! debug = false
//! sim_hz = 125
//!
//! [physics]
//! gravity = 1500.0
//! friction = 0.8
//!
//! [player]
//! run_velocity = 250.0
//! jump_velocity = 600.0
//! max_speed = 700.0
//! ```

use std::path::PathBuf;

use configparser::ini::Ini;
use log::info;

use crate::systems::physics::{DEFAULT_FRICTION, DEFAULT_GRAVITY};

const DEFAULT_WINDOW_WIDTH: u32 = 1056;
const DEFAULT_WINDOW_HEIGHT: u32 = 808;
const DEFAULT_LIVES: u32 = 2;
const DEFAULT_TARGET_SCORE: u32 = 50;
const DEFAULT_SIM_HZ: u32 = 125;
const DEFAULT_RUN_VELOCITY: f32 = 250.0;
const DEFAULT_JUMP_VELOCITY: f32 = 600.0;
const DEFAULT_MAX_SPEED: f32 = 700.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Logical screen size in pixels; also the window's initial inner size.
    pub window_width: u32,
    pub window_height: u32,
    pub lives: u32,
    /// Score that wins the game. 0 disables winning.
    pub target_score: u32,
    /// Draw collision bounds.
    pub debug: bool,
    /// Fixed simulation rate.
    pub sim_hz: u32,
    pub gravity: f32,
    pub friction: f32,
    pub run_velocity: f32,
    pub jump_velocity: f32,
    pub max_speed: f32,
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            lives: DEFAULT_LIVES,
            target_score: DEFAULT_TARGET_SCORE,
            debug: false,
            sim_hz: DEFAULT_SIM_HZ,
            gravity: DEFAULT_GRAVITY,
            friction: DEFAULT_FRICTION,
            run_velocity: DEFAULT_RUN_VELOCITY,
            jump_velocity: DEFAULT_JUMP_VELOCITY,
            max_speed: DEFAULT_MAX_SPEED,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Reads `config_path`. Values absent from the file are left untouched;
    /// fails only if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window]
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }

        // [game]
        if let Some(lives) = config.getuint("game", "lives").ok().flatten() {
            self.lives = lives as u32;
        }
        if let Some(target) = config.getuint("game", "target_score").ok().flatten() {
            self.target_score = target as u32;
        }
        if let Some(debug) = config.getbool("game", "debug").ok().flatten() {
            self.debug = debug;
        }
        if let Some(hz) = config.getuint("game", "sim_hz").ok().flatten() {
            if hz > 0 {
                self.sim_hz = hz as u32;
            }
        }

        // [physics]
        if let Some(gravity) = config.getfloat("physics", "gravity").ok().flatten() {
            self.gravity = gravity as f32;
        }
        if let Some(friction) = config.getfloat("physics", "friction").ok().flatten() {
            self.friction = (friction as f32).clamp(0.0, 1.0);
        }

        // [player]
        if let Some(run) = config.getfloat("player", "run_velocity").ok().flatten() {
            self.run_velocity = run as f32;
        }
        if let Some(jump) = config.getfloat("player", "jump_velocity").ok().flatten() {
            self.jump_velocity = jump as f32;
        }
        if let Some(max) = config.getfloat("player", "max_speed").ok().flatten() {
            self.max_speed = max as f32;
        }

        info!(
            "Loaded config: {}x{} window, lives={}, target={}, sim_hz={}, gravity={}, friction={}",
            self.window_width,
            self.window_height,
            self.lives,
            self.target_score,
            self.sim_hz,
            self.gravity,
            self.friction
        );
        Ok(())
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}
