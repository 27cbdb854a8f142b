//! RGBA raster backing the drawing surface

use super::paint::{PaintCommand, Point, Rgba, StrokeStyle};

/// A row-major, tightly packed RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn filled(width: u32, height: u32, rgba: Rgba) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        let mut raster = Self {
            width,
            height,
            pixels: vec![0; len],
        };
        raster.fill(rgba);
        raster
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let p = &self.pixels[idx..idx + 4];
        Some(Rgba(p[0], p[1], p[2], p[3]))
    }

    /// Number of pixels exactly equal to `rgba`
    pub fn count(&self, rgba: Rgba) -> usize {
        let target = rgba.to_array();
        self.pixels.chunks_exact(4).filter(|p| *p == target).count()
    }

    pub fn fill(&mut self, rgba: Rgba) {
        let value = rgba.to_array();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&value);
        }
    }

    /// Execute a paint command. Returns true when any pixel changed.
    pub fn apply(&mut self, cmd: &PaintCommand) -> bool {
        match cmd {
            PaintCommand::Fill { rgba } => {
                let changed = self.count(*rgba) != (self.width * self.height) as usize;
                self.fill(*rgba);
                changed
            }
            PaintCommand::Segment { from, to, style } => self.draw_segment(*from, *to, style),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    fn put(&mut self, x: u32, y: u32, rgba: Rgba) -> bool {
        let idx = self.index(x, y);
        let value = rgba.to_array();
        let px = &mut self.pixels[idx..idx + 4];
        if px == value {
            return false;
        }
        px.copy_from_slice(&value);
        true
    }

    /// Rasterize a round-capped segment. A pixel is painted when its center
    /// lies within the stroke radius of the segment; no anti-aliasing.
    fn draw_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) -> bool {
        let radius = style.radius();
        let pad = radius + 1.0;
        let min_x = from.x.min(to.x) - pad;
        let max_x = from.x.max(to.x) + pad;
        let min_y = from.y.min(to.y) - pad;
        let max_y = from.y.max(to.y) + pad;
        let Some((x0, x1)) = clamp_span(min_x, max_x, self.width) else {
            return false;
        };
        let Some((y0, y1)) = clamp_span(min_y, max_y, self.height) else {
            return false;
        };

        let radius_sq = radius * radius;
        let mut changed = false;
        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_sq_to_segment(center, from, to) <= radius_sq {
                    changed |= self.put(x, y, style.color);
                }
            }
        }
        changed
    }
}

fn clamp_span(min: f32, max: f32, limit: u32) -> Option<(u32, u32)> {
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let lo = min.floor().max(0.0);
    let hi = max.ceil().min(limit as f32);
    if hi <= lo {
        return None;
    }
    Some((lo as u32, hi as u32))
}

fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let wx = p.x - a.x;
    let wy = p.y - a.y;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        return wx * wx + wy * wy;
    }

    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let dx = p.x - (a.x + vx * t);
    let dy = p.y - (a.y + vy * t);
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgba = Rgba(0, 0, 0, 255);
    const INK: Rgba = Rgba(255, 255, 255, 255);

    fn segment(from: (f32, f32), to: (f32, f32)) -> PaintCommand {
        PaintCommand::Segment {
            from: Point::new(from.0, from.1),
            to: Point::new(to.0, to.1),
            style: StrokeStyle {
                color: INK,
                width: 10.0,
            },
        }
    }

    #[test]
    fn filled_raster_has_uniform_color() {
        let r = Raster::filled(16, 8, BG);
        assert_eq!(r.as_bytes().len(), 16 * 8 * 4);
        assert_eq!(r.count(BG), 128);
        assert_eq!(r.pixel(15, 7), Some(BG));
        assert_eq!(r.pixel(16, 0), None);
    }

    #[test]
    fn round_cap_reaches_past_endpoints() {
        let mut r = Raster::filled(64, 64, BG);
        assert!(r.apply(&segment((20.0, 32.0), (40.0, 32.0))));
        // cap pixels left of the start point
        assert_eq!(r.pixel(16, 32), Some(INK));
        assert_eq!(r.pixel(14, 32), Some(BG));
        // body
        assert_eq!(r.pixel(30, 28), Some(INK));
        assert_eq!(r.pixel(30, 38), Some(BG));
    }

    #[test]
    fn zero_length_segment_is_a_dot() {
        let mut r = Raster::filled(32, 32, BG);
        assert!(r.apply(&segment((16.0, 16.0), (16.0, 16.0))));
        assert_eq!(r.pixel(16, 16), Some(INK));
        assert_eq!(r.pixel(16, 25), Some(BG));
    }

    #[test]
    fn segments_are_clipped_to_bounds() {
        let mut r = Raster::filled(32, 32, BG);
        assert!(r.apply(&segment((-50.0, 16.0), (100.0, 16.0))));
        assert_eq!(r.pixel(0, 16), Some(INK));
        assert_eq!(r.pixel(31, 16), Some(INK));

        let mut r = Raster::filled(32, 32, BG);
        assert!(!r.apply(&segment((-50.0, -50.0), (-40.0, -40.0))));
    }

    #[test]
    fn repainting_same_segment_reports_no_change() {
        let mut r = Raster::filled(32, 32, BG);
        let cmd = segment((4.0, 4.0), (20.0, 20.0));
        assert!(r.apply(&cmd));
        assert!(!r.apply(&cmd));
    }

    #[test]
    fn fill_reports_change_only_when_needed() {
        let mut r = Raster::filled(8, 8, BG);
        assert!(!r.apply(&PaintCommand::Fill { rgba: BG }));
        assert!(r.apply(&PaintCommand::Fill { rgba: INK }));
        assert_eq!(r.count(INK), 64);
    }
}
