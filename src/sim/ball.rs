//! Ball behaviour: serving, launching, rebounds and goals
//!
//! Delayed resets and launches are stored on the ball as fire times and
//! resolved by the world at the start of a tick once the clock passes them.
//! A newer reset replaces a pending one.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{CollisionType, PhysicsBody, Side};
use super::context::{Arena, SimContext};
use super::entity::{Entity, EntityId, index_of};
use crate::consts::*;

/// Ball-specific state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    /// Free-moving (or about to be) rather than waiting on its owner
    pub launched: bool,
    /// Paddle the ball is served from
    pub launch_entity: EntityId,
    pending_reset: Option<f64>,
    pending_launch: Option<f64>,
}

impl BallState {
    pub fn new(launch_entity: EntityId) -> Self {
        Self {
            launched: false,
            launch_entity,
            pending_reset: None,
            pending_launch: None,
        }
    }

    /// Fire time of the pending reset
    pub fn pending_reset(&self) -> Option<f64> {
        self.pending_reset
    }

    /// Fire time of the pending launch
    pub fn pending_launch(&self) -> Option<f64> {
        self.pending_launch
    }

    #[inline]
    pub fn is_awaiting_reset(&self) -> bool {
        self.pending_reset.is_some()
    }

    /// Whether `paddle` may serve this ball now
    pub fn is_waiting_on(&self, paddle: EntityId) -> bool {
        !self.launched && self.launch_entity == paddle
    }

    /// Mark launched and arm the launch. No-op when already launched.
    pub fn schedule_launch(&mut self, fire_at: f64) -> bool {
        if self.launched {
            return false;
        }
        self.launched = true;
        self.pending_launch = Some(fire_at);
        true
    }

    fn take_due_reset(&mut self, now: f64) -> bool {
        match self.pending_reset {
            Some(at) if at <= now => {
                self.pending_reset = None;
                true
            }
            _ => false,
        }
    }

    fn take_due_launch(&mut self, now: f64) -> bool {
        match self.pending_launch {
            Some(at) if at <= now => {
                self.pending_launch = None;
                true
            }
            _ => false,
        }
    }
}

/// Stop the ball now and hand it to `target` at `fire_at`. Cancels a pending
/// launch and replaces a pending reset.
pub(crate) fn schedule_reset(ball: &mut Entity, target: EntityId, fire_at: f64) {
    ball.body.velocity = Vec2::ZERO;
    if let Some(state) = ball.as_ball_mut() {
        state.launch_entity = target;
        state.pending_reset = Some(fire_at);
        state.pending_launch = None;
    }
}

/// Park the ball beside `target`, on the arena-center side, with its top
/// edge at the target's vertical midpoint.
pub fn align_to(ball: &mut PhysicsBody, target: &PhysicsBody, arena: &Arena) {
    ball.position.x = if arena.is_left_half(target.position.x) {
        target.position.x + target.size.width + BALL_ALIGN_GAP
    } else {
        target.position.x - ball.size.width - BALL_ALIGN_GAP
    };
    ball.position.y = target.position.y + target.size.height / 2.0;
}

/// Serve velocity: `BALL_SPEED` within ±30° of horizontal, heading away
/// from the owner.
pub fn launch_velocity(ball_x: f32, owner_x: Option<f32>, rng: &mut impl Rng) -> Vec2 {
    let spread = rng.random_range(-LAUNCH_SPREAD..LAUNCH_SPREAD);
    let angle = match owner_x {
        Some(x) if x > ball_x => PI + spread,
        _ => spread,
    };
    Vec2::new(angle.cos(), angle.sin()) * BALL_SPEED
}

/// Waiting balls follow their owner every tick
pub(crate) fn pre_update(entities: &mut [Entity], index: usize, ctx: &SimContext) {
    let Some(state) = entities[index].as_ball() else {
        return;
    };
    if state.launched {
        return;
    }
    let Some(owner) = index_of(entities, state.launch_entity) else {
        return;
    };
    let target = entities[owner].body.clone();
    align_to(&mut entities[index].body, &target, &ctx.arena);
}

/// Apply every reset and launch whose time has come, in insertion order
pub(crate) fn resolve_pending(entities: &mut [Entity], ctx: &mut SimContext) {
    let now = ctx.now_ms();
    for index in 0..entities.len() {
        let Some(state) = entities[index].as_ball_mut() else {
            continue;
        };
        let reset_due = state.take_due_reset(now);
        let launch_due = state.take_due_launch(now);
        let owner_id = state.launch_entity;
        if reset_due {
            state.launched = false;
        }

        let owner = index_of(entities, owner_id);
        if reset_due {
            if let Some(owner) = owner {
                let target = entities[owner].body.clone();
                align_to(&mut entities[index].body, &target, &ctx.arena);
            }
            log::debug!("Ball {} returned to paddle {}", entities[index].id().raw(), owner_id.raw());
        }

        if launch_due {
            if owner.is_none() {
                log::warn!("Ball {} launching without its paddle", entities[index].id().raw());
            }
            let owner_x = owner.map(|i| entities[i].body.position.x);
            let ball_x = entities[index].body.position.x;
            let velocity = launch_velocity(ball_x, owner_x, ctx.rng());
            entities[index].body.velocity = velocity;
            log::debug!(
                "Ball {} launched at ({:.1}, {:.1})",
                entities[index].id().raw(),
                velocity.x,
                velocity.y
            );
        }
    }
}

/// Ball response: paddle rebounds and goal scoring
pub(crate) fn handle_collision(ball: &mut Entity, other: &mut Entity, side: Side, ctx: &mut SimContext) {
    match other.collision_type() {
        CollisionType::Paddle if side.is_horizontal() => {
            let velocity = ball.body.velocity;
            other.body.velocity.x = if velocity.x < 0.0 {
                -PADDLE_BOUNCE_SPEED
            } else {
                PADDLE_BOUNCE_SPEED
            };

            // Speed up only while the result stays under the cap
            let boosted = Vec2::new(velocity.x * -REBOUND_MULTIPLIER, velocity.y);
            ball.body.velocity.x = if boosted.length_squared() < BALL_MAX_SPEED * BALL_MAX_SPEED {
                boosted.x
            } else {
                -velocity.x
            };
        }
        CollisionType::Paddle => {
            ball.body.velocity.y *= -1.0;
        }
        CollisionType::Obstacle if side.is_horizontal() => {
            if ball.as_ball().is_some_and(BallState::is_awaiting_reset) {
                return;
            }
            let serve_to = if side == Side::Left {
                ctx.score.increment_player2();
                ctx.player1
            } else {
                ctx.score.increment_player1();
                ctx.player2
            };
            log::debug!(
                "Goal on the {:?}, score {}-{}",
                side,
                ctx.score.player1,
                ctx.score.player2
            );

            match serve_to {
                Some(target) => {
                    schedule_reset(ball, target, ctx.now_ms() + SCORE_RESET_DELAY_MS);
                }
                None => {
                    log::warn!("No paddle to serve ball {} after a goal", ball.id().raw());
                    ball.body.velocity = Vec2::ZERO;
                }
            }
        }
        _ => {}
    }
}
