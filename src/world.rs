//! The object manager: owner of every sprite in the level.
//!
//! Sprites live in per-category lists kept in registration order. One
//! [`ObjectManager::update`] runs controllers, physics and animation for every
//! live sprite, then checks the configured category pairs for collisions and
//! resolves them against the [`GameSession`]. Additions and removals requested
//! while that pass runs are buffered and applied once it completes.

use log::debug;

use crate::collision::{BoundPrimitive, ContactSide, contact_side};
use crate::components::{ActorType, StatusFlags};
use crate::controller::ControllerAction;
use crate::entity::Sprite;
use crate::error::GameError;
use crate::math::{Rect, Vector2};
use crate::session::GameSession;
use crate::systems::{GameTime, KeyboardState, PhysicsSystem, RenderTarget};

/// Stable handle to a sprite owned by the manager
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteKey(u32);

/// What happens when a subject sprite overlaps a sprite of the other category
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionResponse {
    /// Stand on / bump into solid geometry.
    Land,
    /// Remove the other sprite and award its value.
    Collect,
    /// Cost the subject a life and send it back to its spawn point.
    Damage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionRule {
    pub subject: ActorType,
    pub other: ActorType,
    pub response: CollisionResponse,
}

impl CollisionRule {
    pub fn new(subject: ActorType, other: ActorType, response: CollisionResponse) -> Self {
        Self {
            subject,
            other,
            response,
        }
    }
}

/// Everything a sprite may read while it updates
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    pub time: GameTime,
    pub input: &'a KeyboardState,
    pub physics: &'a PhysicsSystem,
}

#[derive(Debug)]
struct Slot {
    key: SpriteKey,
    sprite: Sprite,
}

#[derive(Debug)]
struct Category {
    actor_type: ActorType,
    slots: Vec<Slot>,
}

#[derive(Debug)]
pub struct ObjectManager {
    status: StatusFlags,
    categories: Vec<Category>,
    rules: Vec<CollisionRule>,
    next_key: u32,
    pending_add: Vec<Slot>,
    pending_remove: Vec<SpriteKey>,
}

impl ObjectManager {
    pub fn new(status: StatusFlags) -> Self {
        Self {
            status,
            categories: Vec::new(),
            rules: Vec::new(),
            next_key: 0,
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusFlags {
        self.status
    }

    pub fn set_status(&mut self, status: StatusFlags) {
        self.status = status;
    }

    /// Registers a category at the end of the update order. Returns false if
    /// it was already registered.
    pub fn register_category(&mut self, actor_type: ActorType) -> bool {
        if self.category_index(actor_type).is_some() {
            return false;
        }
        self.categories.push(Category {
            actor_type,
            slots: Vec::new(),
        });
        true
    }

    pub fn is_registered(&self, actor_type: ActorType) -> bool {
        self.category_index(actor_type).is_some()
    }

    /// Registered categories in update order.
    pub fn categories(&self) -> impl Iterator<Item = ActorType> + '_ {
        self.categories.iter().map(|category| category.actor_type)
    }

    pub fn add_collision_rule(&mut self, rule: CollisionRule) {
        if rule.subject == rule.other {
            debug!("Ignoring collision rule within one category: {}", rule.subject);
            return;
        }
        self.rules.push(rule);
    }

    pub fn collision_rules(&self) -> &[CollisionRule] {
        &self.rules
    }

    /// Inserts immediately under the sprite's actor type, registering the
    /// category on first use. Not for use while an update pass is running;
    /// see [`ObjectManager::queue_add`].
    pub fn add(&mut self, sprite: Sprite) -> SpriteKey {
        let key = self.allocate_key();
        self.insert(Slot { key, sprite });
        key
    }

    /// Buffers an addition until the end of the current (or next) update.
    pub fn queue_add(&mut self, sprite: Sprite) -> SpriteKey {
        let key = self.allocate_key();
        self.pending_add.push(Slot { key, sprite });
        key
    }

    /// Drops a sprite immediately.
    pub fn remove(&mut self, key: SpriteKey) -> Option<Sprite> {
        if let Some(index) = self.pending_add.iter().position(|slot| slot.key == key) {
            return Some(self.pending_add.remove(index).sprite);
        }
        for category in &mut self.categories {
            if let Some(index) = category.slots.iter().position(|slot| slot.key == key) {
                return Some(category.slots.remove(index).sprite);
            }
        }
        None
    }

    /// Buffers a removal until the end of the current (or next) update.
    pub fn queue_remove(&mut self, key: SpriteKey) {
        if !self.pending_remove.contains(&key) {
            self.pending_remove.push(key);
        }
    }

    pub fn is_queued_for_removal(&self, key: SpriteKey) -> bool {
        self.pending_remove.contains(&key)
    }

    /// Applies buffered additions and removals.
    pub fn flush_pending(&mut self) {
        let removed = std::mem::take(&mut self.pending_remove);
        if !removed.is_empty() {
            for category in &mut self.categories {
                category.slots.retain(|slot| !removed.contains(&slot.key));
            }
            self.pending_add.retain(|slot| !removed.contains(&slot.key));
        }
        for slot in std::mem::take(&mut self.pending_add) {
            self.insert(slot);
        }
    }

    pub fn get(&self, key: SpriteKey) -> Option<&Sprite> {
        self.slots()
            .find(|slot| slot.key == key)
            .map(|slot| &slot.sprite)
    }

    pub fn get_mut(&mut self, key: SpriteKey) -> Option<&mut Sprite> {
        self.categories
            .iter_mut()
            .flat_map(|category| category.slots.iter_mut())
            .find(|slot| slot.key == key)
            .map(|slot| &mut slot.sprite)
    }

    /// First sprite with the given id, in update order.
    pub fn find(&self, id: &str) -> Option<(SpriteKey, &Sprite)> {
        self.slots()
            .find(|slot| slot.sprite.id == id)
            .map(|slot| (slot.key, &slot.sprite))
    }

    pub fn sprites(
        &self,
        actor_type: ActorType,
    ) -> Result<impl Iterator<Item = &Sprite> + '_, GameError> {
        let index = self
            .category_index(actor_type)
            .ok_or(GameError::InvalidCategory(actor_type))?;
        Ok(self.categories[index].slots.iter().map(|slot| &slot.sprite))
    }

    pub fn count(&self, actor_type: ActorType) -> Result<usize, GameError> {
        Ok(self.sprites(actor_type)?.count())
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|category| category.slots.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One update pass: sprite updates in category then insertion order,
    /// collision resolution, then buffered additions/removals.
    pub fn update(
        &mut self,
        ctx: &FrameContext<'_>,
        session: &mut GameSession,
    ) -> Result<(), GameError> {
        if !self.status.runs_update() {
            return Ok(());
        }

        for index in 0..self.categories.len() {
            self.update_sprites(index, ctx, session)?;
        }

        self.resolve_collisions(session)?;
        self.flush_pending();

        if session.is_over() {
            self.status.remove(StatusFlags::UPDATED);
        }
        Ok(())
    }

    /// Updates one category's sprites only, without collision checks.
    pub fn update_category(
        &mut self,
        actor_type: ActorType,
        ctx: &FrameContext<'_>,
        session: &mut GameSession,
    ) -> Result<(), GameError> {
        let index = self
            .category_index(actor_type)
            .ok_or(GameError::InvalidCategory(actor_type))?;
        if self.status.runs_update() {
            self.update_sprites(index, ctx, session)?;
        }
        Ok(())
    }

    /// Draws every visible sprite overlapping `screen`, background first
    /// (ascending layer depth; ties keep update order). Returns the number drawn.
    pub fn draw(&self, target: &mut dyn RenderTarget, screen: &Rect) -> usize {
        if !self.status.contains(StatusFlags::DRAWN) {
            return 0;
        }
        let visible = visible(self.slots().map(|slot| &slot.sprite), screen);
        for sprite in &visible {
            sprite.draw(target);
        }
        visible.len()
    }

    pub fn draw_category(
        &self,
        actor_type: ActorType,
        target: &mut dyn RenderTarget,
        screen: &Rect,
    ) -> Result<usize, GameError> {
        let sprites = self.sprites(actor_type)?;
        if !self.status.contains(StatusFlags::DRAWN) {
            return Ok(0);
        }
        let visible = visible(sprites, screen);
        for sprite in &visible {
            sprite.draw(target);
        }
        Ok(visible.len())
    }

    /// Live bounds of every drawn collidable sprite, for the debug overlay.
    pub fn debug_bounds(&self) -> Vec<BoundPrimitive> {
        self.slots()
            .map(|slot| &slot.sprite)
            .filter(|sprite| sprite.status.runs_draw())
            .filter_map(|sprite| sprite.bound().ok())
            .collect()
    }

    fn allocate_key(&mut self) -> SpriteKey {
        let key = SpriteKey(self.next_key);
        self.next_key += 1;
        key
    }

    fn insert(&mut self, slot: Slot) {
        let actor_type = slot.sprite.actor_type;
        let index = match self.category_index(actor_type) {
            Some(index) => index,
            None => {
                self.register_category(actor_type);
                self.categories.len() - 1
            }
        };
        self.categories[index].slots.push(slot);
    }

    fn category_index(&self, actor_type: ActorType) -> Option<usize> {
        self.categories
            .iter()
            .position(|category| category.actor_type == actor_type)
    }

    fn slots(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.categories
            .iter()
            .flat_map(|category| category.slots.iter())
    }

    fn update_sprites(
        &mut self,
        index: usize,
        ctx: &FrameContext<'_>,
        session: &mut GameSession,
    ) -> Result<(), GameError> {
        for slot in &mut self.categories[index].slots {
            if !slot.sprite.status.runs_update() {
                continue;
            }
            if slot.sprite.update(&ctx.time, ctx.input, ctx.physics)? == ControllerAction::Jumped {
                session.jumped();
            }
        }
        Ok(())
    }

    fn resolve_collisions(&mut self, session: &mut GameSession) -> Result<(), GameError> {
        for rule_index in 0..self.rules.len() {
            let rule = self.rules[rule_index];
            let (Some(subject_index), Some(other_index)) = (
                self.category_index(rule.subject),
                self.category_index(rule.other),
            ) else {
                continue;
            };

            let pending_remove = &mut self.pending_remove;
            let (subjects, others) = pair_mut(&mut self.categories, subject_index, other_index);

            for subject in subjects.slots.iter_mut() {
                if !subject.sprite.status.runs_update() || pending_remove.contains(&subject.key) {
                    continue;
                }
                match rule.response {
                    CollisionResponse::Land => land(&mut subject.sprite, &others.slots)?,
                    CollisionResponse::Collect => {
                        collect(&subject.sprite, &others.slots, pending_remove, session)?
                    }
                    CollisionResponse::Damage => damage(&mut subject.sprite, &others.slots, session)?,
                }
            }
        }
        Ok(())
    }
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (head, tail) = items.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

/// Drawable sprites overlapping `screen`, stably sorted by layer depth.
fn visible<'s>(sprites: impl Iterator<Item = &'s Sprite>, screen: &Rect) -> Vec<&'s Sprite> {
    let mut visible: Vec<&Sprite> = sprites
        .filter(|sprite| sprite.status.runs_draw())
        .filter(|sprite| sprite.transform.bounds().intersects(screen))
        .collect();
    visible.sort_by(|a, b| a.transform.layer_depth.total_cmp(&b.transform.layer_depth));
    visible
}

fn is_solid(sprite: &Sprite) -> bool {
    !sprite.status.contains(StatusFlags::OFF)
}

/// A falling mover whose centre is still above the obstacle's top edge is
/// landing, whatever the penetration depths say; this keeps tile seams from
/// reading as walls.
fn platform_contact(mover: &Rect, obstacle: &Rect, velocity: Vector2) -> Option<ContactSide> {
    if !mover.intersects(obstacle) {
        return None;
    }
    if velocity.y >= 0.0 && mover.center().y < obstacle.top() {
        return Some(ContactSide::Top);
    }
    contact_side(mover, obstacle)
}

fn land(subject: &mut Sprite, platforms: &[Slot]) -> Result<(), GameError> {
    let mut grounded = false;

    for platform in platforms.iter().filter(|slot| is_solid(&slot.sprite)) {
        if !subject.intersects(&platform.sprite)? {
            continue;
        }
        let mover = subject.bound()?.bounding_rect();
        let obstacle = platform.sprite.bound()?.bounding_rect();
        let velocity = subject.body.map(|body| body.velocity).unwrap_or_default();

        let Some(side) = platform_contact(&mover, &obstacle, velocity) else {
            continue;
        };
        let (push, stop_x, stop_y) = match side {
            ContactSide::Top => (
                Vector2::new(0.0, obstacle.top() - mover.bottom()),
                false,
                velocity.y > 0.0,
            ),
            ContactSide::Bottom => (
                Vector2::new(0.0, obstacle.bottom() - mover.top()),
                false,
                velocity.y < 0.0,
            ),
            ContactSide::Left => (
                Vector2::new(obstacle.left() - mover.right(), 0.0),
                velocity.x > 0.0,
                false,
            ),
            ContactSide::Right => (
                Vector2::new(obstacle.right() - mover.left(), 0.0),
                velocity.x < 0.0,
                false,
            ),
        };

        subject.transform.translate_by(push);
        if let Some(body) = subject.body.as_mut() {
            if stop_x {
                body.velocity.x = 0.0;
            }
            if stop_y {
                body.velocity.y = 0.0;
            }
        }
        grounded |= side == ContactSide::Top;
    }

    if let Some(player) = subject.player_controller_mut() {
        player.grounded = grounded;
    }
    Ok(())
}

fn collect(
    subject: &Sprite,
    pickups: &[Slot],
    pending_remove: &mut Vec<SpriteKey>,
    session: &mut GameSession,
) -> Result<(), GameError> {
    for pickup in pickups.iter().filter(|slot| is_solid(&slot.sprite)) {
        if pending_remove.contains(&pickup.key) {
            continue;
        }
        if subject.intersects(&pickup.sprite)? {
            session.collect(&pickup.sprite.id, pickup.sprite.value);
            pending_remove.push(pickup.key);
        }
    }
    Ok(())
}

fn damage(
    subject: &mut Sprite,
    enemies: &[Slot],
    session: &mut GameSession,
) -> Result<(), GameError> {
    for enemy in enemies.iter().filter(|slot| is_solid(&slot.sprite)) {
        if !subject.intersects(&enemy.sprite)? {
            continue;
        }
        session.lose_life();
        if let Some(player) = subject.player_controller_mut() {
            player.grounded = false;
            let spawn = player.spawn;
            subject.transform.translation = spawn;
        }
        if let Some(body) = subject.body.as_mut() {
            body.stop();
        }
        break;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::animation::SpriteArtist;
    use crate::collision::CollisionPrimitive;
    use crate::components::Transform2D;
    use crate::systems::DrawList;

    fn sprite(id: &str, actor_type: ActorType, x: f32, y: f32) -> Sprite {
        Sprite::new(
            id,
            actor_type,
            StatusFlags::UPDATED | StatusFlags::DRAWN,
            Transform2D::new(Vector2::new(x, y), Vector2::new(10.0, 10.0)),
            SpriteArtist::new(Arc::from(id), 1.0, Rect::new(0.0, 0.0, 10.0, 10.0)),
        )
    }

    fn live_manager() -> ObjectManager {
        ObjectManager::new(StatusFlags::UPDATED | StatusFlags::DRAWN)
    }

    fn step(manager: &mut ObjectManager, session: &mut GameSession) -> Result<(), GameError> {
        step_with(manager, session, &KeyboardState::new())
    }

    fn step_with(
        manager: &mut ObjectManager,
        session: &mut GameSession,
        input: &KeyboardState,
    ) -> Result<(), GameError> {
        let physics = PhysicsSystem::new();
        let ctx = FrameContext {
            time: GameTime::new(Duration::from_millis(8), Duration::ZERO),
            input,
            physics: &physics,
        };
        manager.update(&ctx, session)
    }

    #[test]
    fn categories_register_in_first_add_order() {
        let mut manager = live_manager();
        manager.add(sprite("p", ActorType::Platform, 0.0, 0.0));
        manager.add(sprite("a", ActorType::Player, 0.0, 0.0));
        manager.add(sprite("q", ActorType::Platform, 0.0, 0.0));
        assert_eq!(
            manager.categories().collect::<Vec<_>>(),
            vec![ActorType::Platform, ActorType::Player]
        );
        assert_eq!(manager.count(ActorType::Platform).unwrap(), 2);
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn unregistered_category_is_an_error() {
        let manager = live_manager();
        assert!(matches!(
            manager.count(ActorType::Enemy),
            Err(GameError::InvalidCategory(ActorType::Enemy))
        ));
        let mut list = DrawList::new();
        let screen = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(manager
            .draw_category(ActorType::Enemy, &mut list, &screen)
            .is_err());
    }

    #[test]
    fn updating_unregistered_category_is_an_error() {
        let mut manager = live_manager();
        manager.add(sprite("tile", ActorType::Platform, 0.0, 0.0));
        let input = KeyboardState::new();
        let physics = PhysicsSystem::new();
        let ctx = FrameContext {
            time: GameTime::new(Duration::from_millis(8), Duration::ZERO),
            input: &input,
            physics: &physics,
        };
        let mut session = GameSession::new(3, 0);
        assert!(matches!(
            manager.update_category(ActorType::Enemy, &ctx, &mut session),
            Err(GameError::InvalidCategory(ActorType::Enemy))
        ));
        assert!(manager
            .update_category(ActorType::Platform, &ctx, &mut session)
            .is_ok());
    }

    #[test]
    fn keys_are_unique_across_clones() {
        let mut manager = live_manager();
        let archetype = sprite("tile", ActorType::Platform, 0.0, 0.0);
        let a = manager.add(archetype.clone_archetype());
        let b = manager.add(archetype.clone_archetype());
        assert_ne!(a, b);
        manager.remove(a);
        assert!(manager.get(a).is_none());
        assert!(manager.get(b).is_some());
    }

    #[test]
    fn queued_changes_apply_on_flush() {
        let mut manager = live_manager();
        let keep = manager.add(sprite("keep", ActorType::Pickup, 0.0, 0.0));
        let drop = manager.add(sprite("drop", ActorType::Pickup, 0.0, 0.0));
        let added = manager.queue_add(sprite("late", ActorType::Enemy, 0.0, 0.0));
        manager.queue_remove(drop);

        assert!(manager.get(drop).is_some());
        assert!(manager.get(added).is_none());
        assert!(manager.is_queued_for_removal(drop));

        manager.flush_pending();
        assert!(manager.get(drop).is_none());
        assert!(manager.get(keep).is_some());
        assert_eq!(manager.find("late").map(|(key, _)| key), Some(added));
    }

    #[test]
    fn collision_with_missing_primitive_fails() {
        let mut manager = live_manager();
        manager.add(
            sprite("player", ActorType::Player, 0.0, 0.0)
                .with_collision_primitive(CollisionPrimitive::rect()),
        );
        manager.add(sprite("tile", ActorType::Platform, 0.0, 0.0));
        manager.add_collision_rule(CollisionRule::new(
            ActorType::Player,
            ActorType::Platform,
            CollisionResponse::Land,
        ));
        let mut session = GameSession::new(3, 0);
        let err = step(&mut manager, &mut session).unwrap_err();
        assert!(matches!(err, GameError::MissingCollisionPrimitive { ref id } if id == "tile"));
    }

    #[test]
    fn manager_status_gates_update_and_draw() {
        let mut manager = ObjectManager::new(StatusFlags::DRAWN);
        let key = manager.add(
            sprite("mover", ActorType::Enemy, 10.0, 10.0)
                .with_body(crate::components::Body::new(100.0).with_velocity(Vector2::new(100.0, 0.0))),
        );
        let mut session = GameSession::new(3, 0);
        step(&mut manager, &mut session).unwrap();
        assert_eq!(manager.get(key).unwrap().transform.translation.x, 10.0);

        manager.set_status(StatusFlags::UPDATED | StatusFlags::DRAWN);
        step(&mut manager, &mut session).unwrap();
        assert!(manager.get(key).unwrap().transform.translation.x > 10.0);

        manager.set_status(StatusFlags::UPDATED);
        let mut list = DrawList::new();
        assert_eq!(manager.draw(&mut list, &Rect::new(0.0, 0.0, 100.0, 100.0)), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn sprite_flags_gate_individually() {
        let mut manager = live_manager();
        let moving = |id: &str| {
            sprite(id, ActorType::Enemy, 10.0, 10.0)
                .with_body(crate::components::Body::new(100.0).with_velocity(Vector2::new(100.0, 0.0)))
        };
        let mut paused = moving("paused");
        paused.status.insert(StatusFlags::PAUSED);
        let mut off = moving("off");
        off.status.insert(StatusFlags::OFF);
        let mut hidden = moving("hidden");
        hidden.status.remove(StatusFlags::DRAWN);

        let paused = manager.add(paused);
        let off = manager.add(off);
        let hidden = manager.add(hidden);
        let mut session = GameSession::new(3, 0);
        step(&mut manager, &mut session).unwrap();

        assert_eq!(manager.get(paused).unwrap().transform.translation.x, 10.0);
        assert_eq!(manager.get(off).unwrap().transform.translation.x, 10.0);
        assert!(manager.get(hidden).unwrap().transform.translation.x > 10.0);

        let mut list = DrawList::new();
        let drawn = manager.draw(&mut list, &Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(drawn, 1);
        assert_eq!(&*list.calls()[0].sheet, "paused");
    }

    #[test]
    fn draw_culls_offscreen_and_orders_by_depth() {
        let mut manager = live_manager();
        let mut front = sprite("front", ActorType::Player, 10.0, 10.0);
        front.transform.layer_depth = 5.0;
        let mut back = sprite("back", ActorType::Background, 0.0, 0.0);
        back.transform.layer_depth = 0.0;
        let mut middle_a = sprite("middle_a", ActorType::Platform, 20.0, 20.0);
        middle_a.transform.layer_depth = 1.0;
        let mut middle_b = sprite("middle_b", ActorType::Platform, 30.0, 20.0);
        middle_b.transform.layer_depth = 1.0;
        let offscreen = sprite("offscreen", ActorType::Platform, 500.0, 20.0);
        let edge = sprite("edge", ActorType::Platform, 100.0, 20.0);

        for s in [front, back, middle_a, middle_b, offscreen, edge] {
            manager.add(s);
        }

        let mut list = DrawList::new();
        manager.draw(&mut list, &Rect::new(0.0, 0.0, 100.0, 100.0));
        let order: Vec<&str> = list.calls().iter().map(|call| &*call.sheet).collect();
        assert_eq!(order, vec!["back", "middle_a", "middle_b", "front"]);
    }

    #[test]
    fn damage_respawns_and_costs_a_life() {
        use crate::controller::{Controller, PlayerController, PlayerKeys};

        let mut manager = live_manager();
        let player = manager.add(
            sprite("player", ActorType::Player, 50.0, 50.0)
                .with_body(crate::components::Body::new(1000.0))
                .with_collision_primitive(CollisionPrimitive::rect())
                .with_controller(Controller::Player(PlayerController::new(
                    PlayerKeys::default(),
                    100.0,
                    100.0,
                    Vector2::new(5.0, 5.0),
                ))),
        );
        manager.add(
            sprite("wasp", ActorType::Enemy, 55.0, 55.0)
                .with_collision_primitive(CollisionPrimitive::rect()),
        );
        manager.add_collision_rule(CollisionRule::new(
            ActorType::Player,
            ActorType::Enemy,
            CollisionResponse::Damage,
        ));

        let mut session = GameSession::new(2, 0);
        step(&mut manager, &mut session).unwrap();
        assert_eq!(session.lives(), 1);
        assert_eq!(
            manager.get(player).unwrap().transform.translation,
            Vector2::new(5.0, 5.0)
        );

        step(&mut manager, &mut session).unwrap();
        assert_eq!(session.lives(), 1);
    }

    #[test]
    fn respawn_after_hit_cannot_jump_midair() {
        use crate::controller::{Controller, PlayerController, PlayerKeys};
        use crate::session::GameEvent;

        let mut manager = live_manager();
        let mut floor = sprite("floor", ActorType::Platform, 40.0, 50.0);
        floor.transform.dimensions = Vector2::new(30.0, 10.0);
        manager.add(floor.with_collision_primitive(CollisionPrimitive::rect()));
        let player = manager.add(
            sprite("player", ActorType::Player, 50.0, 42.0)
                .with_body(crate::components::Body::new(1000.0))
                .with_collision_primitive(CollisionPrimitive::rect())
                .with_controller(Controller::Player(PlayerController::new(
                    PlayerKeys::default(),
                    100.0,
                    300.0,
                    Vector2::new(5.0, 5.0),
                ))),
        );
        manager.add(
            sprite("wasp", ActorType::Enemy, 52.0, 44.0)
                .with_collision_primitive(CollisionPrimitive::rect()),
        );
        manager.add_collision_rule(CollisionRule::new(
            ActorType::Player,
            ActorType::Platform,
            CollisionResponse::Land,
        ));
        manager.add_collision_rule(CollisionRule::new(
            ActorType::Player,
            ActorType::Enemy,
            CollisionResponse::Damage,
        ));

        let mut session = GameSession::new(3, 0);
        step(&mut manager, &mut session).unwrap();
        let runner = manager.get(player).unwrap();
        assert_eq!(runner.transform.translation, Vector2::new(5.0, 5.0));
        assert!(!runner.player_controller().unwrap().grounded);

        let mut input = KeyboardState::new();
        input.set(winit::keyboard::KeyCode::Space, true);
        step_with(&mut manager, &mut session, &input).unwrap();

        assert!(!session.drain_events().contains(&GameEvent::Jumped));
        assert_eq!(manager.get(player).unwrap().body.unwrap().velocity.y, 0.0);
    }

    #[test]
    fn finished_session_stops_updates() {
        let mut manager = live_manager();
        manager.add(
            sprite("player", ActorType::Player, 0.0, 0.0)
                .with_collision_primitive(CollisionPrimitive::rect()),
        );
        manager.add(
            sprite("wasp", ActorType::Enemy, 0.0, 0.0)
                .with_collision_primitive(CollisionPrimitive::rect()),
        );
        manager.add_collision_rule(CollisionRule::new(
            ActorType::Player,
            ActorType::Enemy,
            CollisionResponse::Damage,
        ));
        let mut session = GameSession::new(1, 0);
        step(&mut manager, &mut session).unwrap();
        assert!(session.is_over());
        assert!(!manager.status().runs_update());
        assert!(manager.status().runs_draw());
    }

    #[test]
    fn same_category_rules_are_ignored() {
        let mut manager = live_manager();
        manager.add_collision_rule(CollisionRule::new(
            ActorType::Enemy,
            ActorType::Enemy,
            CollisionResponse::Damage,
        ));
        assert!(manager.collision_rules().is_empty());
    }
}
