//! Drawing surface: a fixed-size raster plus the stroke session that decides
//! when pointer motion paints.

pub mod encode;
pub mod paint;
pub mod raster;

pub use encode::ImagePayload;
pub use paint::{PaintCommand, Point, Rgba, StrokeStyle};
pub use raster::Raster;

use log::debug;
use sha2::{Digest, Sha256};

use crate::Result;

pub const CANVAS_WIDTH: u32 = 280;
pub const CANVAS_HEIGHT: u32 = 280;

/// Purple background fill
pub const BACKGROUND: Rgba = Rgba::opaque(0x4b, 0x00, 0x6e);

/// Yellow, 10px, round-capped ink
pub const STROKE: StrokeStyle = StrokeStyle {
    color: Rgba::opaque(0xff, 0xff, 0x00),
    width: 10.0,
};

/// Whether a pointer button is currently held on the surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Drawing {
        /// End of the last rendered segment, or the pointer-down point
        last: Point,
    },
}

impl StrokeState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, StrokeState::Drawing { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Canvas {
    raster: Raster,
    background: Rgba,
    style: StrokeStyle,
    state: StrokeState,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// A 280x280 canvas filled with the background color
    pub fn new() -> Self {
        Self {
            raster: Raster::filled(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND),
            background: BACKGROUND,
            style: STROKE,
            state: StrokeState::Idle,
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Erase every stroke and refill with the background. Also drops any
    /// stroke in progress.
    pub fn clear(&mut self) {
        self.raster.apply(&PaintCommand::Fill {
            rgba: self.background,
        });
        self.state = StrokeState::Idle;
        debug!("canvas cleared");
    }

    /// Start a path at `(x, y)`. Called while already drawing, the path
    /// restarts at the new point. Nothing is painted until the first extend.
    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        if self.state.is_drawing() {
            debug!("stroke restarted at ({}, {})", x, y);
        }
        self.state = StrokeState::Drawing {
            last: Point::new(x, y),
        };
    }

    /// Paint a segment from the last point to `(x, y)`. Ignored when idle.
    /// Returns whether the raster changed.
    pub fn extend_stroke(&mut self, x: f32, y: f32) -> bool {
        let StrokeState::Drawing { last } = self.state else {
            return false;
        };
        let to = Point::new(x, y);
        let changed = self.raster.apply(&PaintCommand::Segment {
            from: last,
            to,
            style: self.style,
        });
        self.state = StrokeState::Drawing { last: to };
        changed
    }

    pub fn end_stroke(&mut self) {
        self.state = StrokeState::Idle;
    }

    /// Encode the current raster as PNG
    pub fn export_image(&self) -> Result<ImagePayload> {
        encode::encode_png(&self.raster)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.raster.pixel(x, y)
    }

    /// True when every pixel is background
    pub fn is_blank(&self) -> bool {
        self.stroke_pixel_count() == 0
    }

    /// Number of pixels that differ from the background
    pub fn stroke_pixel_count(&self) -> usize {
        let total = (self.raster.width() * self.raster.height()) as usize;
        total - self.raster.count(self.background)
    }

    /// SHA-256 of the raw RGBA buffer, hex encoded
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.raster.as_bytes()))
    }
}
