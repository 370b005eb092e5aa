//! Match driver: arena layout, timed ball spawns and the per-frame tick

use rand::Rng;

use super::ball::align_to;
use super::body::{BodyOptions, CollisionType, PhysicsBody};
use super::context::SimContext;
use super::controller::{Controller, KeyBindings};
use super::entity::{Entity, EntityId, Image};
use super::input::Key;
use super::world::World;
use crate::consts::*;
use crate::fps::{Channel, FpsCounter};
use crate::renderer::{self, Frame, colors};
use crate::settings::{Opponent, Settings};

/// Adds a ball every spawn interval until the cap is reached
#[derive(Debug, Clone, Copy)]
pub struct BallSpawner {
    last_spawn_ms: f64,
}

impl BallSpawner {
    pub fn new(now_ms: f64) -> Self {
        Self {
            last_spawn_ms: now_ms,
        }
    }

    /// Spawn if the interval has passed and fewer than `MAX_BALL_COUNT` balls
    /// exist. Returns the new ball.
    pub fn poll(&mut self, world: &mut World, ctx: &mut SimContext) -> Option<EntityId> {
        let now = ctx.now_ms();
        if now - self.last_spawn_ms < BALL_SPAWN_INTERVAL_MS {
            return None;
        }
        self.last_spawn_ms = now;

        let balls = world.filter(CollisionType::Ball).count();
        if balls >= MAX_BALL_COUNT {
            return None;
        }
        let owner = if ctx.rng().random_bool(0.5) {
            ctx.player1
        } else {
            ctx.player2
        }?;
        let mut ball = Entity::ball(owner);
        if let Some(paddle) = world.get(owner) {
            align_to(&mut ball.body, &paddle.body, &ctx.arena);
        }
        let id = world.add_entity(ball);
        log::info!("Spawned ball {} for paddle {} ({} in play)", id.raw(), owner.raw(), balls + 1);
        Some(id)
    }
}

/// One running match
#[derive(Debug)]
pub struct Game {
    pub world: World,
    pub ctx: SimContext,
    spawner: BallSpawner,
    fps: FpsCounter,
}

impl Game {
    pub fn new(settings: &Settings) -> Self {
        let arena = settings.arena();
        let mut ctx = SimContext::new(arena, settings.seed);
        ctx.show_fps = settings.show_fps;
        let mut world = World::new();
        let (w, h) = (arena.width, arena.height);

        // Goals sit outside the visible walls
        world.add_entity(Entity::obstacle(-60.0, 0.0, 20.0, h, None));
        world.add_entity(Entity::obstacle(w + 40.0, 0.0, 20.0, h, None));
        world.add_entity(Entity::obstacle(-40.0, -20.0, w + 80.0, 20.0, None));
        world.add_entity(Entity::obstacle(-40.0, h, w + 80.0, 20.0, None));
        world.add_entity(Entity::obstacle(20.0, 10.0, w - 36.0, 10.0, Some(colors::BLACK)));
        world.add_entity(Entity::obstacle(20.0, h - 20.0, w - 36.0, 10.0, Some(colors::BLACK)));

        // Divider is decoration only
        world.add_entity(Entity::new(
            PhysicsBody::new(w / 2.0 - 3.0, 10.0, 6.0, h - 20.0, BodyOptions::default()),
            Some(Image::rectangle(colors::BLACK)),
            None,
        ));

        let player1 = world.add_entity(Entity::paddle(
            20.0,
            50.0,
            Some(Controller::Human(KeyBindings::ARROWS)),
        ));
        let opponent = match settings.opponent {
            Opponent::Computer => Controller::Computer,
            Opponent::Human => Controller::Human(KeyBindings::WASD),
        };
        let player2 = world.add_entity(Entity::paddle(w - 36.0, 50.0, Some(opponent)));
        ctx.player1 = Some(player1);
        ctx.player2 = Some(player2);

        let mut ball = Entity::ball(player1);
        if let Some(paddle) = world.get(player1) {
            align_to(&mut ball.body, &paddle.body, &arena);
        }
        world.add_entity(ball);

        log::info!(
            "Match started: arena {}x{}, seed {}, opponent {}",
            w,
            h,
            settings.seed,
            settings.opponent.as_str()
        );

        let now = ctx.now_ms();
        Self {
            world,
            ctx,
            spawner: BallSpawner::new(now),
            fps: FpsCounter::new(now),
        }
    }

    #[inline]
    pub fn player1(&self) -> Option<EntityId> {
        self.ctx.player1
    }

    #[inline]
    pub fn player2(&self) -> Option<EntityId> {
        self.ctx.player2
    }

    pub fn key_event(&mut self, key: Key, pressed: bool) {
        self.ctx.key_event(key, pressed);
    }

    /// Advance the match by `dt_ms`, clamped to `MAX_TICK_MS`
    pub fn tick(&mut self, dt_ms: f32) {
        let dt_ms = dt_ms.clamp(0.0, MAX_TICK_MS);
        self.spawner.poll(&mut self.world, &mut self.ctx);
        self.world.update(dt_ms, &mut self.ctx);
        self.fps.tick(Channel::Update, self.ctx.now_ms());
    }

    /// Describe the current state for painting. Counts as one rendered frame.
    pub fn frame(&mut self) -> Frame {
        self.fps.tick(Channel::Render, self.ctx.now_ms());
        renderer::frame(&self.world, &self.ctx, self.fps.rates())
    }

    pub fn ball_count(&self) -> usize {
        self.world.filter(CollisionType::Ball).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_order_and_owners() {
        let game = Game::new(&Settings::default());
        let entities = game.world.entities();
        assert_eq!(entities.len(), 10);

        assert_eq!(entities[0].body.position.x, -60.0);
        assert_eq!(entities[1].body.position.x, 840.0);
        assert_eq!(entities[6].collision_type(), CollisionType::None);
        assert_eq!(Some(entities[7].id()), game.player1());
        assert_eq!(Some(entities[8].id()), game.player2());
        assert_eq!(entities[8].body.position.x, 764.0);
        assert_eq!(entities[8].controller, Some(Controller::Computer));

        let ball = entities[9].as_ball().expect("ball state");
        assert_eq!(Some(ball.launch_entity), game.player1());
        assert!(!ball.launched);
        assert_eq!(entities[9].body.position, glam::Vec2::new(56.0, 95.0));
    }

    #[test]
    fn test_human_opponent_uses_wasd() {
        let settings = Settings {
            opponent: Opponent::Human,
            ..Settings::default()
        };
        let game = Game::new(&settings);
        let p2 = game.player2().and_then(|id| game.world.get(id)).expect("player2");
        assert_eq!(p2.controller, Some(Controller::Human(KeyBindings::WASD)));
    }

    #[test]
    fn test_tick_clamps_dt() {
        let mut game = Game::new(&Settings::default());
        game.tick(5_000.0);
        assert!((game.ctx.now_ms() - f64::from(MAX_TICK_MS)).abs() < 1e-9);
        game.tick(-10.0);
        assert!((game.ctx.now_ms() - f64::from(MAX_TICK_MS)).abs() < 1e-9);
    }

    #[test]
    fn test_spawner_caps_ball_count() {
        let mut game = Game::new(&Settings::default());
        let mut spawner = BallSpawner::new(0.0);
        assert!(spawner.poll(&mut game.world, &mut game.ctx).is_none());

        for expected in 2..=MAX_BALL_COUNT {
            game.ctx.advance(BALL_SPAWN_INTERVAL_MS as f32);
            let id = spawner.poll(&mut game.world, &mut game.ctx).expect("spawned");
            assert_eq!(game.ball_count(), expected);
            // Spawned beside its owner, not at the origin
            let ball = game.world.get(id).expect("ball");
            assert_eq!(ball.body.position.y, 95.0);
        }
        game.ctx.advance(BALL_SPAWN_INTERVAL_MS as f32);
        assert!(spawner.poll(&mut game.world, &mut game.ctx).is_none());
        assert_eq!(game.ball_count(), MAX_BALL_COUNT);
    }

    #[test]
    fn test_frame_lists_visible_entities() {
        let mut game = Game::new(&Settings::default());
        let frame = game.frame();
        // Every entity carries an image, transparent ones included
        assert_eq!(frame.drawables.len(), 10);
        assert_eq!(frame.score.len(), 2);
    }
}
