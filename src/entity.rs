use crate::animation::Artist;
use crate::collision::{BoundPrimitive, CollisionPrimitive};
use crate::components::{ActorType, Body, StatusFlags, Transform2D};
use crate::controller::{Controller, ControllerAction, PlayerController};
use crate::error::GameError;
use crate::systems::{GameTime, KeyboardState, PhysicsSystem, RenderTarget};

/// A drawable game object. Optional capabilities decide whether it moves,
/// collides, or is steered; a sprite with a collision primitive is "collidable".
#[derive(Debug)]
pub struct Sprite {
    pub id: String,
    pub actor_type: ActorType,
    pub status: StatusFlags,
    pub transform: Transform2D,
    pub artist: Artist,
    pub body: Option<Body>,
    pub collision_primitive: Option<CollisionPrimitive>,
    pub controller: Option<Controller>,
    /// Score awarded when a pickup is collected.
    pub value: u32,
}

impl Sprite {
    pub fn new(
        id: impl Into<String>,
        actor_type: ActorType,
        status: StatusFlags,
        transform: Transform2D,
        artist: impl Into<Artist>,
    ) -> Self {
        Self {
            id: id.into(),
            actor_type,
            status,
            transform,
            artist: artist.into(),
            body: None,
            collision_primitive: None,
            controller: None,
            value: 0,
        }
    }

    // Builder-style methods for adding capabilities
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_collision_primitive(mut self, primitive: CollisionPrimitive) -> Self {
        self.collision_primitive = Some(primitive);
        self
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn attach_collision_primitive(&mut self, primitive: CollisionPrimitive) {
        self.collision_primitive = Some(primitive);
    }

    pub fn attach_controller(&mut self, controller: Controller) {
        self.controller = Some(controller);
    }

    /// Copies transform, artist, body and controller by value. The copy has no
    /// collision primitive; the caller must attach a fresh one before adding it.
    pub fn clone_archetype(&self) -> Sprite {
        Sprite {
            id: self.id.clone(),
            actor_type: self.actor_type,
            status: self.status,
            transform: self.transform,
            artist: self.artist.clone(),
            body: self.body,
            collision_primitive: None,
            controller: self.controller.clone(),
            value: self.value,
        }
    }

    pub fn is_collidable(&self) -> bool {
        self.collision_primitive.is_some()
    }

    /// The live world-space bound, derived from the current transform.
    pub fn bound(&self) -> Result<BoundPrimitive, GameError> {
        self.collision_primitive
            .map(|primitive| primitive.bound(&self.transform))
            .ok_or_else(|| GameError::MissingCollisionPrimitive {
                id: self.id.clone(),
            })
    }

    pub fn intersects(&self, other: &Sprite) -> Result<bool, GameError> {
        Ok(self.bound()?.intersects(&other.bound()?))
    }

    pub fn player_controller(&self) -> Option<&PlayerController> {
        self.controller.as_ref().and_then(Controller::player)
    }

    pub fn player_controller_mut(&mut self) -> Option<&mut PlayerController> {
        self.controller.as_mut().and_then(Controller::player_mut)
    }

    /// Controller, then body integration, then animation.
    pub fn update(
        &mut self,
        time: &GameTime,
        input: &KeyboardState,
        physics: &PhysicsSystem,
    ) -> Result<ControllerAction, GameError> {
        let mut action = ControllerAction::None;
        if let Some(body) = self.body.as_mut() {
            if let Some(controller) = self.controller.as_mut() {
                action = controller.update(input, body, &self.transform);
                if let (Some(take), Some(animated)) =
                    (controller.desired_take(body), self.artist.animated_mut())
                {
                    if animated.take_name() != take {
                        animated.set_take(take)?;
                    }
                }
            }
            physics.integrate(body, &mut self.transform, time.elapsed_secs());
        }
        self.artist.update(time.elapsed_ms());
        Ok(action)
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        self.artist.draw(&self.transform, target);
    }
}
