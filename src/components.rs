use std::fmt;

use serde::Deserialize;

use crate::math::{Rect, Vector2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub translation: Vector2, // world pixels
    pub rotation: f32,        // radians
    pub scale: Vector2,
    pub origin: Vector2,     // pivot, local unscaled pixels
    pub dimensions: Vector2, // local unscaled bounding size
    pub layer_depth: f32,
}

impl Transform2D {
    pub fn new(translation: Vector2, dimensions: Vector2) -> Self {
        Self {
            translation,
            rotation: 0.0,
            scale: Vector2::ONE,
            origin: Vector2::ZERO,
            dimensions,
            layer_depth: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vector2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_origin(mut self, origin: Vector2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_layer_depth(mut self, layer_depth: f32) -> Self {
        self.layer_depth = layer_depth;
        self
    }

    /// World-space bounding rectangle: `translation - origin*scale`, sized `dimensions*scale`.
    pub fn bounds(&self) -> Rect {
        Rect::from_position_size(
            self.translation - self.origin.multiply(self.scale),
            self.dimensions.multiply(self.scale),
        )
    }

    pub fn translate_by(&mut self, delta: Vector2) {
        self.translation += delta;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum GravityType {
    #[default]
    None,
    Normal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum FrictionType {
    #[default]
    None,
    Normal,
}

/// Per-sprite physical state; integrated by [`crate::systems::PhysicsSystem`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub velocity: Vector2, // pixels per second
    pub gravity: GravityType,
    pub friction: FrictionType,
    pub maximum_speed: f32,
}

impl Body {
    pub fn new(maximum_speed: f32) -> Self {
        Self {
            velocity: Vector2::ZERO,
            gravity: GravityType::None,
            friction: FrictionType::None,
            maximum_speed,
        }
    }

    pub fn with_gravity(mut self, gravity: GravityType) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_friction(mut self, friction: FrictionType) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn stop(&mut self) {
        self.velocity = Vector2::ZERO;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum ActorType {
    Player,
    Enemy,
    Pickup,
    Platform,
    Background,
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "player",
            Self::Enemy => "enemy",
            Self::Pickup => "pickup",
            Self::Platform => "platform",
            Self::Background => "background",
        };
        f.write_str(name)
    }
}

/// Bitmask gating update and draw for a sprite or the whole manager
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusFlags(u8);

impl StatusFlags {
    pub const NONE: StatusFlags = StatusFlags(0);
    pub const UPDATED: StatusFlags = StatusFlags(1);
    pub const DRAWN: StatusFlags = StatusFlags(1 << 1);
    pub const OFF: StatusFlags = StatusFlags(1 << 2);
    pub const PAUSED: StatusFlags = StatusFlags(1 << 3);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: StatusFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: StatusFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: StatusFlags) {
        self.0 &= !other.0;
    }

    pub fn toggle(&mut self, other: StatusFlags) {
        self.0 ^= other.0;
    }

    /// `UPDATED` set, `PAUSED` and `OFF` clear.
    pub const fn runs_update(self) -> bool {
        self.contains(Self::UPDATED) && !self.contains(Self::PAUSED) && !self.contains(Self::OFF)
    }

    /// `DRAWN` set, `OFF` clear.
    pub const fn runs_draw(self) -> bool {
        self.contains(Self::DRAWN) && !self.contains(Self::OFF)
    }
}

impl std::ops::BitOr for StatusFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        StatusFlags(self.0 | rhs.0)
    }
}

impl fmt::Debug for StatusFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        for (flag, name) in [
            (Self::UPDATED, "UPDATED"),
            (Self::DRAWN, "DRAWN"),
            (Self::OFF, "OFF"),
            (Self::PAUSED, "PAUSED"),
        ] {
            if self.contains(flag) {
                names.push(name);
            }
        }
        if names.is_empty() {
            write!(f, "StatusFlags(NONE)")
        } else {
            write!(f, "StatusFlags({})", names.join(" | "))
        }
    }
}
