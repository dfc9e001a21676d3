//! Builds the object manager for the snowy level from the catalog.

use std::sync::Arc;

use log::debug;

use crate::animation::{AnimatedSpriteArtist, SpriteArtist};
use crate::catalog::{BackgroundData, Catalog, PickupData};
use crate::collision::CollisionPrimitive;
use crate::components::{ActorType, Body, FrictionType, GravityType, StatusFlags, Transform2D};
use crate::config::GameConfig;
use crate::controller::{Controller, PatrolController, PlayerController, PlayerKeys};
use crate::entity::Sprite;
use crate::error::GameError;
use crate::math::Vector2;
use crate::world::{CollisionResponse, CollisionRule, ObjectManager};

fn live() -> StatusFlags {
    StatusFlags::UPDATED | StatusFlags::DRAWN
}

/// A drawn but not yet updating manager holding the whole level.
pub fn load_level(catalog: &Catalog, config: &GameConfig) -> Result<ObjectManager, GameError> {
    let mut manager = ObjectManager::new(StatusFlags::DRAWN);

    // registration fixes update order: scenery first, player after the things it lands on
    for actor_type in [
        ActorType::Background,
        ActorType::Platform,
        ActorType::Pickup,
        ActorType::Enemy,
        ActorType::Player,
    ] {
        manager.register_category(actor_type);
    }

    load_backgrounds(&mut manager, &catalog.backgrounds, config);
    load_platforms(&mut manager, catalog);
    load_pickups(&mut manager, catalog)?;
    load_enemy(&mut manager, catalog)?;
    load_player(&mut manager, catalog, config)?;

    for (other, response) in [
        (ActorType::Platform, CollisionResponse::Land),
        (ActorType::Pickup, CollisionResponse::Collect),
        (ActorType::Enemy, CollisionResponse::Damage),
    ] {
        manager.add_collision_rule(CollisionRule::new(ActorType::Player, other, response));
    }

    for actor_type in manager.categories().collect::<Vec<_>>() {
        debug!("{}: {} sprites", actor_type, manager.count(actor_type)?);
    }
    Ok(manager)
}

pub fn load_player(
    manager: &mut ObjectManager,
    catalog: &Catalog,
    config: &GameConfig,
) -> Result<(), GameError> {
    let runner = &catalog.runner;
    // both run takes must exist before the first key press
    for take in ["run_left", "run_right"] {
        runner.animation.take(take)?;
    }
    let artist = AnimatedSpriteArtist::new(Arc::clone(&runner.animation), &runner.start_take)?;
    let dimensions = artist.single_frame_dimensions(&runner.start_take)?;

    let controller = PlayerController::new(
        PlayerKeys::default(),
        config.run_velocity,
        config.jump_velocity,
        runner.start_position,
    )
    .with_run_takes("run_left", "run_right");

    let sprite = Sprite::new(
        "runner",
        ActorType::Player,
        live(),
        Transform2D::new(runner.start_position, dimensions).with_layer_depth(runner.layer_depth),
        artist,
    )
    .with_body(
        Body::new(config.max_speed)
            .with_gravity(GravityType::Normal)
            .with_friction(FrictionType::Normal),
    )
    .with_collision_primitive(CollisionPrimitive::Rect {
        inflate: runner.collision_inflate,
    })
    .with_controller(Controller::Player(controller));

    manager.add(sprite);
    debug!("Player placed at {:?}", runner.start_position);
    Ok(())
}

pub fn load_enemy(manager: &mut ObjectManager, catalog: &Catalog) -> Result<(), GameError> {
    let enemy = &catalog.enemy;
    let artist = AnimatedSpriteArtist::new(Arc::clone(&enemy.animation), &enemy.take)?;
    let dimensions = artist.single_frame_dimensions(&enemy.take)?;

    let sprite = Sprite::new(
        "wasp",
        ActorType::Enemy,
        live(),
        Transform2D::new(enemy.start_position, dimensions).with_layer_depth(enemy.layer_depth),
        artist,
    )
    .with_body(Body::new(enemy.speed))
    .with_collision_primitive(CollisionPrimitive::rect())
    .with_controller(Controller::Patrol(PatrolController::new(
        enemy.patrol_min_x,
        enemy.patrol_max_x,
        enemy.speed,
    )));

    manager.add(sprite);
    Ok(())
}

/// One archetype tile, cloned once per placement. Each clone gets its own
/// rectangle primitive since cloning drops it.
pub fn load_platforms(manager: &mut ObjectManager, catalog: &Catalog) {
    let platform = &catalog.platform;
    let archetype = Sprite::new(
        platform.id.clone(),
        ActorType::Platform,
        live(),
        Transform2D::new(Vector2::ZERO, platform.source.size())
            .with_scale(platform.scale)
            .with_origin(platform.origin)
            .with_layer_depth(platform.layer_depth),
        SpriteArtist::new(Arc::clone(&platform.sprite_sheet), platform.alpha, platform.source),
    );

    for &translation in &platform.translations {
        let mut tile = archetype.clone_archetype();
        tile.transform.translation = translation;
        tile.attach_collision_primitive(CollisionPrimitive::rect());
        manager.add(tile);
    }
}

/// Backgrounds without explicit dimensions fill the screen.
pub fn load_backgrounds(
    manager: &mut ObjectManager,
    backgrounds: &[BackgroundData],
    config: &GameConfig,
) {
    let screen = Vector2::new(config.window_width as f32, config.window_height as f32);
    for background in backgrounds {
        let sprite = Sprite::new(
            background.id.clone(),
            ActorType::Background,
            StatusFlags::DRAWN,
            Transform2D::new(background.translation, background.dimensions.unwrap_or(screen))
                .with_scale(background.scale)
                .with_origin(background.origin)
                .with_layer_depth(background.layer_depth),
            SpriteArtist::new(
                Arc::clone(&background.sprite_sheet),
                background.alpha,
                background.source,
            ),
        );
        manager.add(sprite);
    }
}

pub fn load_pickups(manager: &mut ObjectManager, catalog: &Catalog) -> Result<(), GameError> {
    for pickup in &catalog.pickups {
        manager.add(pickup_sprite(catalog, pickup)?);
    }
    Ok(())
}

fn pickup_sprite(catalog: &Catalog, pickup: &PickupData) -> Result<Sprite, GameError> {
    let artist = AnimatedSpriteArtist::new(Arc::clone(&catalog.collectibles), &pickup.take)?;
    let dimensions = artist.single_frame_dimensions(&pickup.take)?;

    // translation is the gem's centre
    Ok(Sprite::new(
        pickup.id.clone(),
        ActorType::Pickup,
        live(),
        Transform2D::new(pickup.translation, dimensions)
            .with_origin(dimensions.scale(0.5))
            .with_layer_depth(catalog.pickup_layer_depth),
        artist,
    )
    .with_collision_primitive(CollisionPrimitive::circle(pickup.radius))
    .with_value(pickup.value))
}
