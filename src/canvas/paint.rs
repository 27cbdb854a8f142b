//! Paint primitives: colors, stroke styles and the commands the raster executes

use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba(r, g, b, 255)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.0, self.1, self.2, self.3]
    }
}

/// Stroke ink. Segment ends are always round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
}

impl StrokeStyle {
    pub fn radius(&self) -> f32 {
        (self.width / 2.0).max(0.5)
    }
}

/// A surface-local coordinate in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Immediate-mode paint commands. Nothing keeps these around after they have
/// been applied to the raster.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Fill {
        rgba: Rgba,
    },
    Segment {
        from: Point,
        to: Point,
        style: StrokeStyle,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_half_width() {
        let style = StrokeStyle {
            color: Rgba::opaque(0, 0, 0),
            width: 10.0,
        };
        assert_eq!(style.radius(), 5.0);
    }
}
