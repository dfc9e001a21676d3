use crate::components::{Body, FrictionType, GravityType, Transform2D};
use crate::math::Vector2;

pub const DEFAULT_GRAVITY: f32 = 1500.0; // px/s², downward
pub const DEFAULT_FRICTION: f32 = 0.8; // horizontal damping per tick

pub struct PhysicsSystem {
    gravity: Vector2,
    friction: f32,
}

impl PhysicsSystem {
    pub fn new() -> Self {
        Self::with_constants(DEFAULT_GRAVITY, DEFAULT_FRICTION)
    }

    pub fn with_constants(gravity: f32, friction: f32) -> Self {
        Self {
            gravity: Vector2::new(0.0, gravity),
            friction: friction.clamp(0.0, 1.0),
        }
    }

    pub fn gravity(&self) -> Vector2 {
        self.gravity
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Integrate one step of `dt_secs` for a single body.
    ///
    /// Friction is a fixed per-tick factor on the horizontal component only, so
    /// jumps are shaped by gravity alone.
    pub fn integrate(&self, body: &mut Body, transform: &mut Transform2D, dt_secs: f32) {
        if body.gravity == GravityType::Normal {
            body.velocity += self.gravity * dt_secs;
        }

        if body.friction == FrictionType::Normal {
            body.velocity.x *= self.friction;
        }

        let max = body.maximum_speed.max(0.0);
        body.velocity.x = body.velocity.x.clamp(-max, max);
        body.velocity.y = body.velocity.y.clamp(-max, max);

        transform.translate_by(body.velocity * dt_secs);
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new()
    }
}
