//! End-to-end gameplay tests driving the object manager through fixed steps.
//!
//! ```sh
//! cargo test --test gameplay_integration
//! ```

use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;

use snowrunner::animation::{AnimatedSpriteArtist, AnimationSet, AnimationTake, SpriteArtist};
use snowrunner::catalog::Catalog;
use snowrunner::collision::CollisionPrimitive;
use snowrunner::components::{ActorType, Body, GravityType, StatusFlags, Transform2D};
use snowrunner::config::GameConfig;
use snowrunner::controller::{Controller, PlayerController, PlayerKeys};
use snowrunner::entity::Sprite;
use snowrunner::level::load_level;
use snowrunner::math::{Rect, Vector2};
use snowrunner::session::{GameEvent, GameSession, GameState};
use snowrunner::systems::{GameTime, KeyboardState, PhysicsSystem};
use snowrunner::world::{CollisionResponse, CollisionRule, FrameContext, ObjectManager};
use snowrunner::GameError;

const EPSILON: f32 = 1e-3;
const STEP: Duration = Duration::from_millis(8);

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn live() -> StatusFlags {
    StatusFlags::UPDATED | StatusFlags::DRAWN
}

fn run(
    manager: &mut ObjectManager,
    session: &mut GameSession,
    input: &KeyboardState,
    steps: u32,
) -> Result<(), GameError> {
    let physics = PhysicsSystem::new();
    for step in 0..steps {
        let ctx = FrameContext {
            time: GameTime::new(STEP, STEP * step),
            input,
            physics: &physics,
        };
        manager.update(&ctx, session)?;
    }
    Ok(())
}

fn block(id: &str, actor_type: ActorType, position: Vector2, size: Vector2) -> Sprite {
    Sprite::new(
        id,
        actor_type,
        live(),
        Transform2D::new(position, size),
        SpriteArtist::new(Arc::from(id), 1.0, Rect::from_position_size(Vector2::ZERO, size)),
    )
}

fn falling_player(position: Vector2) -> Sprite {
    block("runner", ActorType::Player, position, Vector2::new(49.0, 54.0))
        .with_body(Body::new(700.0).with_gravity(GravityType::Normal))
        .with_collision_primitive(CollisionPrimitive::rect())
        .with_controller(Controller::Player(PlayerController::new(
            PlayerKeys::default(),
            250.0,
            600.0,
            position,
        )))
}

#[test]
fn player_lands_on_platform_and_stays() {
    let mut manager = ObjectManager::new(live());
    manager.add(
        block("platform", ActorType::Platform, Vector2::new(100.0, 725.0), Vector2::new(39.0, 39.0))
            .with_collision_primitive(CollisionPrimitive::rect()),
    );
    let player = manager.add(falling_player(Vector2::new(100.0, 575.0)));
    manager.add_collision_rule(CollisionRule::new(
        ActorType::Player,
        ActorType::Platform,
        CollisionResponse::Land,
    ));

    let mut session = GameSession::new(2, 0);
    let input = KeyboardState::new();
    run(&mut manager, &mut session, &input, 150).unwrap();

    let runner = manager.get(player).unwrap();
    let bound = runner.bound().unwrap().bounding_rect();
    assert!(approx_eq(bound.bottom(), 725.0), "bottom was {}", bound.bottom());
    assert!(approx_eq(runner.body.unwrap().velocity.y, 0.0));
    assert!(runner.player_controller().unwrap().grounded);

    // standing still for another second does not sink or drift
    run(&mut manager, &mut session, &input, 125).unwrap();
    let bound = manager.get(player).unwrap().bound().unwrap().bounding_rect();
    assert!(approx_eq(bound.bottom(), 725.0));
    assert!(approx_eq(bound.left(), 100.0));
}

#[test]
fn grounded_player_can_jump() {
    let mut manager = ObjectManager::new(live());
    manager.add(
        block("platform", ActorType::Platform, Vector2::new(0.0, 300.0), Vector2::new(400.0, 40.0))
            .with_collision_primitive(CollisionPrimitive::rect()),
    );
    let player = manager.add(falling_player(Vector2::new(100.0, 200.0)));
    manager.add_collision_rule(CollisionRule::new(
        ActorType::Player,
        ActorType::Platform,
        CollisionResponse::Land,
    ));

    let mut session = GameSession::new(2, 0);
    let mut input = KeyboardState::new();
    run(&mut manager, &mut session, &input, 100).unwrap();
    session.drain_events();

    input.set(winit::keyboard::KeyCode::Space, true);
    run(&mut manager, &mut session, &input, 5).unwrap();

    let runner = manager.get(player).unwrap();
    assert!(runner.transform.translation.y < 246.0 - 1.0);
    assert_eq!(
        session
            .drain_events()
            .iter()
            .filter(|event| **event == GameEvent::Jumped)
            .count(),
        1
    );
}

#[test]
fn pickup_is_collected_exactly_once() {
    let mut manager = ObjectManager::new(live());
    // two overlapping subjects and a pickup that stays in reach for several frames
    for x in [0.0, 5.0] {
        manager.add(
            block("runner", ActorType::Player, Vector2::new(x, 0.0), Vector2::new(40.0, 40.0))
                .with_collision_primitive(CollisionPrimitive::rect()),
        );
    }
    manager.add(
        block("ruby", ActorType::Pickup, Vector2::new(10.0, 10.0), Vector2::new(20.0, 20.0))
            .with_collision_primitive(CollisionPrimitive::circle(10.0))
            .with_value(20),
    );
    manager.add_collision_rule(CollisionRule::new(
        ActorType::Player,
        ActorType::Pickup,
        CollisionResponse::Collect,
    ));

    let mut session = GameSession::new(2, 0);
    run(&mut manager, &mut session, &KeyboardState::new(), 3).unwrap();

    assert_eq!(session.score(), 20);
    assert_eq!(manager.count(ActorType::Pickup).unwrap(), 0);
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::PickupCollected {
            id: "ruby".to_string(),
            value: 20
        }]
    );
}

#[test]
fn clone_without_primitive_fails_collision_checks() {
    let mut manager = ObjectManager::new(live());
    let archetype = block("platform", ActorType::Platform, Vector2::ZERO, Vector2::new(39.0, 39.0))
        .with_collision_primitive(CollisionPrimitive::rect());
    let mut clone = archetype.clone_archetype();
    clone.transform.translation = Vector2::new(100.0, 640.0);
    manager.add(clone);
    manager.add(falling_player(Vector2::new(100.0, 600.0)));
    manager.add_collision_rule(CollisionRule::new(
        ActorType::Player,
        ActorType::Platform,
        CollisionResponse::Land,
    ));

    let mut session = GameSession::new(2, 0);
    let err = run(&mut manager, &mut session, &KeyboardState::new(), 1).unwrap_err();
    assert!(matches!(err, GameError::MissingCollisionPrimitive { ref id } if id == "platform"));
}

#[test]
fn play_once_take_stops_on_last_frame() {
    let mut takes = FxHashMap::default();
    takes.insert(
        "sting".to_string(),
        AnimationTake {
            fps: 10.0,
            max_loop_count: 0,
            start_cell_index: 4,
            end_cell_index: 6,
            bounding_box_dimensions: Vector2::new(35.0, 50.0),
            cell_data: (0..3)
                .map(|i| Rect::new(i as f32 * 35.0, 0.0, 35.0, 50.0))
                .collect(),
        },
    );
    let set = Arc::new(AnimationSet {
        id: "wasp".to_string(),
        sprite_sheet: Arc::from("wasp"),
        alpha: 1.0,
        takes,
    });

    let mut artist = AnimatedSpriteArtist::new(set, "sting").unwrap();
    artist.update(350.0);
    assert_eq!(artist.current_cell_index(), 6);
    assert!(artist.is_finished());
    artist.update(1000.0);
    assert_eq!(artist.current_cell_index(), 6);
    assert_eq!(artist.loop_count(), 0);
    assert_eq!(artist.current_cell(), Some(Rect::new(70.0, 0.0, 35.0, 50.0)));
}

#[test]
fn catalog_level_player_settles_on_a_tile() {
    let catalog = Catalog::embedded().unwrap();
    let mut manager = load_level(&catalog, &GameConfig::new()).unwrap();
    let mut session = GameSession::new(2, 50);
    session.start(&mut manager);

    run(&mut manager, &mut session, &KeyboardState::new(), 250).unwrap();
    assert_eq!(session.state(), GameState::Playing);

    let (_, runner) = manager.find("runner").unwrap();
    assert!(runner.player_controller().unwrap().grounded);
    let feet = runner.bound().unwrap().bounding_rect();

    let supported = manager
        .sprites(ActorType::Platform)
        .unwrap()
        .map(|tile| tile.transform.bounds())
        .any(|tile| {
            approx_eq(tile.top(), feet.bottom())
                && tile.left() < feet.right()
                && feet.left() < tile.right()
        });
    assert!(supported, "runner resting at {:?}", feet);
}

#[test]
fn collecting_every_gem_wins() {
    let catalog = Catalog::embedded().unwrap();
    let mut manager = load_level(&catalog, &GameConfig::new()).unwrap();
    let mut session = GameSession::new(2, catalog.total_pickup_value());
    session.start(&mut manager);

    // teleport the runner onto each gem in turn
    let gems: Vec<Vector2> = catalog.pickups.iter().map(|pickup| pickup.translation).collect();
    let runner = manager.find("runner").map(|(key, _)| key).unwrap();
    for gem in gems {
        let sprite = manager.get_mut(runner).unwrap();
        sprite.transform.translation = gem - Vector2::new(24.0, 27.0);
        run(&mut manager, &mut session, &KeyboardState::new(), 1).unwrap();
    }

    assert_eq!(session.state(), GameState::Won);
    assert_eq!(session.score(), catalog.total_pickup_value());
    assert!(!manager.status().runs_update());
    assert!(manager.status().runs_draw());
}
