//! Physics bodies and collision classification
//!
//! A body is an axis-aligned box in arena coordinates (origin top-left,
//! y grows downward). Bodies carry no behaviour of their own.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision classification of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionType {
    /// Never matched by any mask (decoration)
    #[default]
    None,
    Obstacle,
    Paddle,
    Ball,
}

impl CollisionType {
    /// The mask bit for this type (`None` has no bit)
    pub fn mask_bit(self) -> Option<CollisionMask> {
        match self {
            CollisionType::None => None,
            CollisionType::Obstacle => Some(CollisionMask::OBSTACLE),
            CollisionType::Paddle => Some(CollisionMask::PADDLE),
            CollisionType::Ball => Some(CollisionMask::BALL),
        }
    }
}

bitflags! {
    /// Set of collision types a body tests against
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct CollisionMask: u8 {
        const OBSTACLE = 1 << 0;
        const PADDLE = 1 << 1;
        const BALL = 1 << 2;
    }
}

impl CollisionMask {
    /// Whether a body of type `ty` is tested against
    pub fn accepts(self, ty: CollisionType) -> bool {
        ty.mask_bit().is_some_and(|bit| self.contains(bit))
    }
}

impl From<CollisionType> for CollisionMask {
    fn from(ty: CollisionType) -> Self {
        ty.mask_bit().unwrap_or_default()
    }
}

impl<const N: usize> From<[CollisionType; N]> for CollisionMask {
    fn from(types: [CollisionType; N]) -> Self {
        types.into_iter().map(CollisionMask::from).collect()
    }
}

/// Movement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// Side of the moving body that made contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Contact side for motion along `axis` with direction `sign`
    pub fn of_motion(axis: Axis, sign: f32) -> Self {
        match (axis, sign < 0.0) {
            (Axis::X, true) => Side::Left,
            (Axis::X, false) => Side::Right,
            (Axis::Y, true) => Side::Top,
            (Axis::Y, false) => Side::Bottom,
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Box extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }
}

/// Construction options for a body
#[derive(Debug, Clone, Copy)]
pub struct BodyOptions {
    pub collision_type: CollisionType,
    pub collision_mask: CollisionMask,
    pub is_solid: bool,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            collision_type: CollisionType::None,
            collision_mask: CollisionMask::empty(),
            is_solid: true,
        }
    }
}

impl BodyOptions {
    pub fn typed(collision_type: CollisionType) -> Self {
        Self {
            collision_type,
            ..Default::default()
        }
    }

    pub fn with_mask(mut self, mask: impl Into<CollisionMask>) -> Self {
        self.collision_mask = mask.into();
        self
    }

    pub fn solid(mut self, is_solid: bool) -> Self {
        self.is_solid = is_solid;
        self
    }
}

/// Position, velocity and size of one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsBody {
    /// Top-left corner
    pub position: Vec2,
    /// Units per second
    pub velocity: Vec2,
    pub size: Size,
    collision_type: CollisionType,
    collision_mask: CollisionMask,
    is_solid: bool,
}

impl PhysicsBody {
    pub fn new(x: f32, y: f32, width: f32, height: f32, options: BodyOptions) -> Self {
        Self {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            size: Size::new(width, height),
            collision_type: options.collision_type,
            collision_mask: options.collision_mask,
            is_solid: options.is_solid,
        }
    }

    #[inline]
    pub fn collision_type(&self) -> CollisionType {
        self.collision_type
    }

    #[inline]
    pub fn collision_mask(&self) -> CollisionMask {
        self.collision_mask
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.is_solid
    }

    /// Center of the box
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(self.size.width, self.size.height) / 2.0
    }

    /// Separating-axis test of this body moved to `at` against `other` where
    /// it currently stands. Touching edges count as overlap.
    pub fn overlaps_at(&self, at: Vec2, other: &PhysicsBody) -> bool {
        let e = other.position;
        !(at.x + self.size.width < e.x
            || at.x > e.x + other.size.width
            || at.y + self.size.height < e.y
            || at.y > e.y + other.size.height)
    }
}

/// Direction of travel along one axis; zero counts as positive
#[inline]
pub fn axis_sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_from_single_and_list() {
        let single = CollisionMask::from(CollisionType::Obstacle);
        assert!(single.accepts(CollisionType::Obstacle));
        assert!(!single.accepts(CollisionType::Paddle));

        let list = CollisionMask::from([CollisionType::Obstacle, CollisionType::Paddle]);
        assert!(list.accepts(CollisionType::Obstacle));
        assert!(list.accepts(CollisionType::Paddle));
        assert!(!list.accepts(CollisionType::Ball));
    }

    #[test]
    fn test_untyped_never_accepted() {
        let all = CollisionMask::all();
        assert!(!all.accepts(CollisionType::None));
        assert_eq!(CollisionMask::from(CollisionType::None), CollisionMask::empty());
    }

    #[test]
    fn test_overlap_touching_counts() {
        let a = PhysicsBody::new(0.0, 0.0, 10.0, 10.0, BodyOptions::default());
        let b = PhysicsBody::new(10.0, 0.0, 10.0, 10.0, BodyOptions::default());
        assert!(a.overlaps_at(a.position, &b));
        assert!(!a.overlaps_at(Vec2::new(-0.5, 0.0), &b));
        assert!(!a.overlaps_at(Vec2::new(0.0, 10.5), &b));
    }

    #[test]
    fn test_side_of_motion() {
        assert_eq!(Side::of_motion(Axis::X, -1.0), Side::Left);
        assert_eq!(Side::of_motion(Axis::X, 1.0), Side::Right);
        assert_eq!(Side::of_motion(Axis::Y, -1.0), Side::Top);
        assert_eq!(Side::of_motion(Axis::Y, 1.0), Side::Bottom);
        assert_eq!(axis_sign(0.0), 1.0);
    }

    #[test]
    fn test_bodies_solid_by_default() {
        let body = PhysicsBody::new(1.0, 2.0, 3.0, 4.0, BodyOptions::typed(CollisionType::Ball));
        assert!(body.is_solid());
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.center(), Vec2::new(2.5, 4.0));
    }
}
