//! Paddle behaviour: horizontal spring-return and ball repositioning

use serde::{Deserialize, Serialize};

use super::body::{CollisionType, Side};
use super::entity::Entity;
use crate::consts::*;

/// Paddle-specific state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleState {
    /// x-coordinate the paddle springs back to
    pub rest_position: f32,
}

impl PaddleState {
    pub fn new(rest_position: f32) -> Self {
        Self { rest_position }
    }
}

/// Spring the paddle's x-velocity toward its rest position, damp it, and
/// snap onto rest once close and slow.
pub(crate) fn pre_update(paddle: &mut Entity, dt_ms: f32) {
    let Some(state) = paddle.as_paddle().copied() else {
        return;
    };
    let body = &mut paddle.body;
    let displacement = (state.rest_position - body.position.x).abs();
    let sign = if body.position.x > state.rest_position { -1.0 } else { 1.0 };

    body.velocity.x += PADDLE_SPRING * dt_ms * displacement * displacement * sign;
    body.velocity.x *= PADDLE_DAMPING;

    if displacement < PADDLE_SNAP_DISTANCE && body.velocity.x.abs() < PADDLE_SNAP_SPEED {
        body.position.x = state.rest_position;
        body.velocity.x = 0.0;
    }
}

/// Put a ball that touched the paddle's top or bottom flush against that edge
pub(crate) fn handle_collision(paddle: &mut Entity, other: &mut Entity, side: Side) {
    if other.collision_type() != CollisionType::Ball {
        return;
    }
    let top = paddle.body.position.y;
    let bottom = top + paddle.body.size.height;
    match side {
        Side::Top => other.body.position.y = top - other.body.size.height - 1.0,
        Side::Bottom => other.body.position.y = bottom + 1.0,
        Side::Left | Side::Right => {}
    }
}
