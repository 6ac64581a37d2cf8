//! Drawing interface and the frame painter.
//!
//! A [`DrawSurface`] only knows pixel-space primitives. [`draw_frame`] turns a
//! [`Frame`] into those primitives; it never reads the skeleton directly.

use serde::{Deserialize, Serialize};

use crate::character::Frame;
use marionette_api_core::Vec2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

pub trait DrawSurface {
    fn clear(&mut self, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    /// Filled axis-aligned ellipse.
    fn ellipse(&mut self, center: Vec2, radii: Vec2, color: Color);
    /// `position` is the top-left corner; `size` the glyph height in pixels.
    fn text(&mut self, position: Vec2, text: &str, size: f32, color: Color);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillPolygon {
        points: Vec<Vec2>,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        color: Color,
    },
    Text {
        position: Vec2,
        text: String,
        size: f32,
        color: Color,
    },
}

/// Surface that keeps every call, for tests and for replaying onto another
/// surface.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replay(&self, target: &mut dyn DrawSurface) {
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Clear(c) => target.clear(*c),
                DrawCommand::FillPolygon { points, color } => target.fill_polygon(points, *color),
                DrawCommand::Line {
                    from,
                    to,
                    width,
                    color,
                } => target.line(*from, *to, *width, *color),
                DrawCommand::Ellipse {
                    center,
                    radii,
                    color,
                } => target.ellipse(*center, *radii, *color),
                DrawCommand::Text {
                    position,
                    text,
                    size,
                    color,
                } => target.text(*position, text, *size, *color),
            }
        }
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn ellipse(&mut self, center: Vec2, radii: Vec2, color: Color) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radii,
            color,
        });
    }

    fn text(&mut self, position: Vec2, text: &str, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            size,
            color,
        });
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawStyle {
    pub background: Color,
    pub body: Color,
    pub head: Color,
    pub hair: Color,
    pub label: Color,
    /// Limb thickness in head units.
    pub limb_width: f32,
    /// Hair strand thickness in head units.
    pub hair_width: f32,
    /// Draw the current mouth-shape code next to the head.
    pub mouth_label: bool,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            background: Color::rgb(245, 242, 235),
            body: Color::rgb(60, 64, 82),
            head: Color::rgb(232, 196, 168),
            hair: Color::rgb(90, 60, 40),
            label: Color::rgb(20, 20, 20),
            limb_width: 0.28,
            hair_width: 0.12,
            mouth_label: true,
        }
    }
}

/// Head ellipse narrowing at a full side view.
const PROFILE_NARROWING: f32 = 0.15;

/// Quad of width `width` around the segment `a`-`b`; `None` when degenerate.
pub(crate) fn segment_quad(a: Vec2, b: Vec2, width: f32) -> Option<[Vec2; 4]> {
    let dir = (b - a).normalize_or(Vec2::ZERO);
    if dir == Vec2::ZERO || width <= 0.0 {
        return None;
    }
    let n = Vec2::new(-dir.y, dir.x) * (0.5 * width);
    Some([a + n, b + n, b - n, a - n])
}

/// Paint `frame`: background, hair behind the body, limbs in skeleton order,
/// then the head and the mouth label.
pub fn draw_frame(frame: &Frame, surface: &mut dyn DrawSurface, style: &DrawStyle) {
    surface.clear(style.background);

    let hair_width = (style.hair_width * frame.unit).max(1.0);
    for chain in &frame.chains {
        for link in chain.windows(2) {
            surface.line(link[0], link[1], hair_width, style.hair);
        }
    }

    let limb_width = style.limb_width * frame.unit;
    for bone in frame.bones.iter().filter(|b| b.name != "head") {
        if let Some(quad) = segment_quad(bone.start, bone.end, limb_width) {
            surface.fill_polygon(&quad, style.body);
        }
    }

    let Some(head) = frame.bone("head") else {
        return;
    };
    let length = head.start.distance(head.end);
    let narrowing = 1.0 - PROFILE_NARROWING * frame.view_angle.clamp(0.0, 90.0).to_radians().sin();
    let center = head.start.lerp(head.end, 0.5);
    let radii = Vec2::new(0.42 * length * narrowing, 0.5 * length);
    surface.ellipse(center, radii, style.head);

    if style.mouth_label {
        if let Some(mouth) = frame.mouth() {
            let size = 0.3 * frame.unit;
            let at = center + Vec2::new(radii.x + 0.2 * frame.unit, -0.5 * size);
            surface.text(at, mouth, size, style.label);
        }
    }
}
