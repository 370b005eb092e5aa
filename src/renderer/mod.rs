//! Render-facing frame description
//!
//! The simulation never draws. Each frame the host asks for a [`Frame`] and
//! paints it however it likes: entity shapes, the score labels and the
//! optional FPS overlay.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::fps::Rates;
use crate::sim::{Entity, Shape, SimContext, World};

/// RGBA colour constants
pub mod colors {
    pub type Color = [f32; 4];

    pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const TRANSPARENT: Color = [0.0, 0.0, 0.0, 0.0];
}

use colors::Color;

/// One shape to paint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Drawable {
    Rect { position: Vec2, size: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
}

impl Drawable {
    /// Shape for an entity, if it has an image
    pub fn of(entity: &Entity) -> Option<Self> {
        let image = entity.image?;
        let body = &entity.body;
        Some(match image.shape {
            Shape::Rectangle => Drawable::Rect {
                position: body.position,
                size: Vec2::new(body.size.width, body.size.height),
                color: image.color,
            },
            // Radius follows the box width
            Shape::Circle => Drawable::Circle {
                center: body.position,
                radius: body.size.width,
                color: image.color,
            },
        })
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Start,
    End,
}

/// A line of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub position: Vec2,
    pub align: Align,
}

impl Label {
    fn new(text: impl Into<String>, x: f32, y: f32, align: Align) -> Self {
        Self {
            text: text.into(),
            position: Vec2::new(x, y),
            align,
        }
    }
}

/// Everything to paint for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub drawables: Vec<Drawable>,
    /// Player one then player two
    pub score: Vec<Label>,
    /// Empty unless the overlay is on
    pub overlay: Vec<Label>,
}

/// Describe the current state of `world`
pub fn frame(world: &World, ctx: &SimContext, rates: Rates) -> Frame {
    let drawables = world.entities().iter().filter_map(Drawable::of).collect();

    let arena = ctx.arena;
    let half = arena.width / 2.0;
    let score = vec![
        Label::new(ctx.score.player1.to_string(), half - 20.0, arena.height - 35.0, Align::End),
        Label::new(ctx.score.player2.to_string(), half + 20.0, arena.height - 35.0, Align::Start),
    ];

    let overlay = if ctx.show_fps {
        vec![
            Label::new("Framerate:", 35.0, 40.0, Align::Start),
            Label::new(format!("render: {} fps", rates.render), 35.0, 60.0, Align::Start),
            Label::new(format!("update: {} fps", rates.update), 35.0, 80.0, Align::Start),
        ]
    } else {
        Vec::new()
    };

    Frame {
        drawables,
        score,
        overlay,
    }
}
