//! Paddle controllers
//!
//! Controllers hold no state. Each tick, after its paddle has moved, the
//! controller sets the paddle's vertical velocity for the next tick and may
//! serve balls the paddle owns.

use serde::{Deserialize, Serialize};

use super::body::CollisionType;
use super::context::SimContext;
use super::entity::Entity;
use super::input::Key;
use crate::consts::*;

/// Keys driving one human paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub up: Key,
    pub down: Key,
    pub launch: Key,
}

impl KeyBindings {
    /// Player one: arrow keys, space to serve
    pub const ARROWS: Self = Self {
        up: Key::Up,
        down: Key::Down,
        launch: Key::Space,
    };

    /// Player two: W/S, shift to serve
    pub const WASD: Self = Self {
        up: Key::W,
        down: Key::S,
        launch: Key::Shift,
    };
}

/// Paddle behaviour source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    /// Keyboard-driven
    Human(KeyBindings),
    /// Tracks the nearest incoming ball
    Computer,
}

impl Controller {
    /// Drive the paddle at `index`. Runs after the paddle has moved.
    pub fn update(self, entities: &mut [Entity], index: usize, _dt_ms: f32, ctx: &mut SimContext) {
        match self {
            Controller::Human(keys) => update_human(keys, entities, index, ctx),
            Controller::Computer => update_computer(entities, index, ctx),
        }
    }
}

fn update_human(keys: KeyBindings, entities: &mut [Entity], index: usize, ctx: &SimContext) {
    let input = &ctx.input;
    entities[index].body.velocity.y = if input.is_held(keys.up) {
        -PADDLE_SPEED
    } else if input.is_held(keys.down) {
        PADDLE_SPEED
    } else {
        0.0
    };

    if input.is_held(keys.launch) {
        let me = entities[index].id();
        let now = ctx.now_ms();
        for ball in entities.iter_mut() {
            if let Some(state) = ball.as_ball_mut()
                && state.is_waiting_on(me)
            {
                state.schedule_launch(now);
                log::debug!("Paddle {} served ball {}", me.raw(), ball.id().raw());
            }
        }
    }
}

fn update_computer(entities: &mut [Entity], index: usize, ctx: &SimContext) {
    let me = entities[index].id();
    let now = ctx.now_ms();
    let paddle = entities[index].body.clone();
    let paddle_center = paddle.center();

    let mut closest: Option<(f32, f32)> = None;
    for ball in entities.iter_mut() {
        if ball.collision_type() != CollisionType::Ball {
            continue;
        }
        if let Some(state) = ball.as_ball_mut()
            && state.is_waiting_on(me)
        {
            state.schedule_launch(now + AI_LAUNCH_DELAY_MS);
            log::debug!("Computer paddle {} serving ball {}", me.raw(), ball.id().raw());
            continue;
        }

        let body = &ball.body;
        // Ignore balls heading away from this paddle
        if body.position.x < paddle.position.x + paddle.size.width && body.velocity.x < 0.0 {
            continue;
        }
        if body.position.x + body.size.width > paddle.position.x && body.velocity.x > 0.0 {
            continue;
        }

        let center = body.center();
        let distance = (paddle_center.x - center.x).abs();
        if closest.is_none_or(|(best, _)| distance < best) {
            closest = Some((distance, center.y));
        }
    }

    // No candidate: keep coasting at the current velocity
    if let Some((_, ball_y)) = closest {
        entities[index].body.velocity.y = if paddle_center.y - AI_DEAD_ZONE > ball_y {
            -PADDLE_SPEED
        } else if paddle_center.y + AI_DEAD_ZONE < ball_y {
            PADDLE_SPEED
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn setup(controller: Controller) -> (Vec<Entity>, SimContext) {
        let paddle = Entity::paddle(764.0, 200.0, Some(controller));
        let ball = Entity::ball(paddle.id());
        (vec![paddle, ball], SimContext::default())
    }

    #[test]
    fn test_human_keys_set_velocity() {
        let (mut entities, mut ctx) = setup(Controller::Human(KeyBindings::WASD));
        ctx.input.w = true;
        Controller::Human(KeyBindings::WASD).update(&mut entities, 0, 16.0, &mut ctx);
        assert_eq!(entities[0].body.velocity.y, -PADDLE_SPEED);

        ctx.input.w = false;
        ctx.input.s = true;
        Controller::Human(KeyBindings::WASD).update(&mut entities, 0, 16.0, &mut ctx);
        assert_eq!(entities[0].body.velocity.y, PADDLE_SPEED);

        ctx.input.s = false;
        Controller::Human(KeyBindings::WASD).update(&mut entities, 0, 16.0, &mut ctx);
        assert_eq!(entities[0].body.velocity.y, 0.0);
    }

    #[test]
    fn test_human_launch_key_serves_own_ball() {
        let (mut entities, mut ctx) = setup(Controller::Human(KeyBindings::WASD));
        ctx.input.space = true;
        Controller::Human(KeyBindings::WASD).update(&mut entities, 0, 16.0, &mut ctx);
        assert!(!entities[1].as_ball().is_some_and(|b| b.launched));

        ctx.input.shift = true;
        ctx.advance(40.0);
        Controller::Human(KeyBindings::WASD).update(&mut entities, 0, 16.0, &mut ctx);
        let state = entities[1].as_ball().expect("ball state");
        assert!(state.launched);
        assert_eq!(state.pending_launch(), Some(40.0));
    }

    #[test]
    fn test_computer_serves_after_delay() {
        let (mut entities, mut ctx) = setup(Controller::Computer);
        Controller::Computer.update(&mut entities, 0, 16.0, &mut ctx);
        let state = entities[1].as_ball().expect("ball state");
        assert!(state.launched);
        assert_eq!(state.pending_launch(), Some(AI_LAUNCH_DELAY_MS));
    }

    #[test]
    fn test_computer_tracks_incoming_ball() {
        let (mut entities, mut ctx) = setup(Controller::Computer);
        let other = Entity::paddle(20.0, 50.0, None);
        entities[1] = Entity::ball(other.id());
        if let Some(state) = entities[1].as_ball_mut() {
            state.launched = true;
        }
        // Paddle center y = 245
        entities[1].body.position = Vec2::new(400.0, 100.0);
        entities[1].body.velocity = Vec2::new(800.0, 0.0);
        Controller::Computer.update(&mut entities, 0, 16.0, &mut ctx);
        assert_eq!(entities[0].body.velocity.y, -PADDLE_SPEED);

        entities[1].body.position.y = 400.0;
        Controller::Computer.update(&mut entities, 0, 16.0, &mut ctx);
        assert_eq!(entities[0].body.velocity.y, PADDLE_SPEED);

        // Within the dead zone
        entities[1].body.position.y = 250.0;
        Controller::Computer.update(&mut entities, 0, 16.0, &mut ctx);
        assert_eq!(entities[0].body.velocity.y, 0.0);

        // Heading away: ignored, velocity left as is
        entities[0].body.velocity.y = -PADDLE_SPEED;
        entities[1].body.velocity = Vec2::new(-800.0, 0.0);
        Controller::Computer.update(&mut entities, 0, 16.0, &mut ctx);
        assert_eq!(entities[0].body.velocity.y, -PADDLE_SPEED);
    }

    #[test]
    fn test_computer_coasts_without_target() {
        let (mut entities, mut ctx) = setup(Controller::Computer);
        entities.truncate(1);
        entities[0].body.velocity.y = PADDLE_SPEED;
        Controller::Computer.update(&mut entities, 0, 16.0, &mut ctx);
        assert_eq!(entities[0].body.velocity.y, PADDLE_SPEED);
    }
}
