//! Controllers steer a sprite's body before physics integration.

use winit::keyboard::KeyCode;

use crate::components::{Body, Transform2D};
use crate::math::Vector2;
use crate::systems::KeyboardState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerKeys {
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
}

impl Default for PlayerKeys {
    fn default() -> Self {
        Self {
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            jump: KeyCode::Space,
        }
    }
}

/// Something a controller did this frame that the session cares about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerAction {
    None,
    Jumped,
}

/// Animation takes played while running in each direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunTakes {
    pub left: String,
    pub right: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerController {
    pub keys: PlayerKeys,
    pub run_takes: Option<RunTakes>,
    pub run_velocity: f32,
    pub jump_velocity: f32,
    /// Set by the most recent platform collision pass.
    pub grounded: bool,
    /// Where the player reappears after being hit.
    pub spawn: Vector2,
}

impl PlayerController {
    pub fn new(keys: PlayerKeys, run_velocity: f32, jump_velocity: f32, spawn: Vector2) -> Self {
        Self {
            keys,
            run_takes: None,
            run_velocity,
            jump_velocity,
            grounded: false,
            spawn,
        }
    }

    pub fn with_run_takes(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.run_takes = Some(RunTakes {
            left: left.into(),
            right: right.into(),
        });
        self
    }

    /// The take matching the direction of travel; `None` while standing still.
    pub fn desired_take(&self, body: &Body) -> Option<&str> {
        let takes = self.run_takes.as_ref()?;
        if body.velocity.x < 0.0 {
            Some(&takes.left)
        } else if body.velocity.x > 0.0 {
            Some(&takes.right)
        } else {
            None
        }
    }

    pub fn update(&mut self, input: &KeyboardState, body: &mut Body) -> ControllerAction {
        let left = input.is_key_down(self.keys.left);
        let right = input.is_key_down(self.keys.right);
        if left && !right {
            body.velocity.x = -self.run_velocity;
        } else if right && !left {
            body.velocity.x = self.run_velocity;
        }

        if self.grounded && input.is_key_down(self.keys.jump) {
            body.velocity.y = -self.jump_velocity;
            self.grounded = false;
            return ControllerAction::Jumped;
        }
        ControllerAction::None
    }
}

/// Flies back and forth between two x positions
#[derive(Clone, Debug, PartialEq)]
pub struct PatrolController {
    pub min_x: f32,
    pub max_x: f32,
    pub speed: f32,
}

impl PatrolController {
    pub fn new(min_x: f32, max_x: f32, speed: f32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: min_x.max(max_x),
            speed: speed.abs(),
        }
    }

    pub fn update(&mut self, body: &mut Body, transform: &Transform2D) -> ControllerAction {
        let x = transform.translation.x;
        if x <= self.min_x {
            body.velocity.x = self.speed;
        } else if x >= self.max_x {
            body.velocity.x = -self.speed;
        } else if body.velocity.x == 0.0 {
            body.velocity.x = self.speed;
        }
        ControllerAction::None
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Controller {
    Player(PlayerController),
    Patrol(PatrolController),
}

impl Controller {
    pub fn update(
        &mut self,
        input: &KeyboardState,
        body: &mut Body,
        transform: &Transform2D,
    ) -> ControllerAction {
        match self {
            Controller::Player(player) => player.update(input, body),
            Controller::Patrol(patrol) => patrol.update(body, transform),
        }
    }

    pub fn desired_take(&self, body: &Body) -> Option<&str> {
        match self {
            Controller::Player(player) => player.desired_take(body),
            Controller::Patrol(_) => None,
        }
    }

    pub fn player(&self) -> Option<&PlayerController> {
        match self {
            Controller::Player(player) => Some(player),
            Controller::Patrol(_) => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerController> {
        match self {
            Controller::Player(player) => Some(player),
            Controller::Patrol(_) => None,
        }
    }
}
