use crate::pad::model::{Color, Point};

/// Pixel coordinates are clamped to this magnitude before integer math so
/// far-away pointer positions clip instead of overflowing.
const COORD_LIMIT: f32 = (1 << 20) as f32;

fn to_pixel(value: f32) -> i32 {
    value.clamp(-COORD_LIMIT, COORD_LIMIT) as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DirtyRect {
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: width as i32,
            height: height as i32,
        }
    }

    pub fn from_segment(a: Point, b: Point, pad: f32) -> Self {
        let min_x = to_pixel((a.x.min(b.x) - pad).floor());
        let max_x = to_pixel((a.x.max(b.x) + pad).ceil());
        let min_y = to_pixel((a.y.min(b.y) - pad).floor());
        let max_y = to_pixel((a.y.max(b.y) + pad).ceil());
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1).max(1),
            height: (max_y - min_y + 1).max(1),
        }
    }

    pub fn union(self, other: DirtyRect) -> DirtyRect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        DirtyRect {
            x: min_x,
            y: min_y,
            width: (max_x - min_x).max(1),
            height: (max_y - min_y).max(1),
        }
    }

    pub fn clamp(self, width: u32, height: u32) -> Option<DirtyRect> {
        let max_w = width as i32;
        let max_h = height as i32;
        let x0 = self.x.clamp(0, max_w);
        let y0 = self.y.clamp(0, max_h);
        let x1 = self.x.saturating_add(self.width).clamp(0, max_w);
        let y1 = self.y.saturating_add(self.height).clamp(0, max_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(DirtyRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Row-major RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let mut raster = Self {
            width,
            height,
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
        };
        raster.fill(fill);
        raster
    }

    /// Wraps an RGBA8 buffer, or `None` when its length does not match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn fill(&mut self, color: Color) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = ((y * self.width + x) * 4) as usize;
        Color {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        }
    }

    pub fn is_uniform(&self, color: Color) -> bool {
        self.pixels
            .chunks_exact(4)
            .all(|px| px == [color.r, color.g, color.b, color.a])
    }

    /// Copies the pixels of `rect` into a tightly packed buffer.
    pub fn region_rgba(&self, rect: DirtyRect) -> Vec<u8> {
        let mut out = Vec::with_capacity((rect.width * rect.height * 4) as usize);
        for y in rect.y..(rect.y + rect.height) {
            let start = ((y as u32 * self.width + rect.x as u32) * 4) as usize;
            let end = start + (rect.width as usize) * 4;
            out.extend_from_slice(&self.pixels[start..end]);
        }
        out
    }

    /// Renders a straight segment with round caps. Edge pixels get coverage
    /// blended over what is already there. Returns the touched region.
    pub fn draw_segment(
        &mut self,
        start: Point,
        end: Point,
        color: Color,
        stroke_width: u32,
    ) -> Option<DirtyRect> {
        let radius = stroke_width.max(1) as f32 / 2.0;
        let bounds = DirtyRect::from_segment(start, end, radius + 1.0);
        let clip = bounds.clamp(self.width, self.height)?;

        for y in clip.y..(clip.y + clip.height) {
            for x in clip.x..(clip.x + clip.width) {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let distance = point_segment_distance_sq(center, start, end).sqrt();
                let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_pixel(x as u32, y as u32, color, coverage);
                }
            }
        }
        Some(clip)
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        let idx = ((y * self.width + x) * 4) as usize;
        let dst = &mut self.pixels[idx..idx + 4];
        let mix = |d: u8, s: u8| -> u8 {
            (d as f32 + (s as f32 - d as f32) * coverage).round() as u8
        };
        dst[0] = mix(dst[0], color.r);
        dst[1] = mix(dst[1], color.g);
        dst[2] = mix(dst[2], color.b);
        dst[3] = mix(dst[3], color.a);
    }
}

fn point_segment_distance_sq(point: Point, start: Point, end: Point) -> f32 {
    let vx = end.x - start.x;
    let vy = end.y - start.y;
    let wx = point.x - start.x;
    let wy = point.y - start.y;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        return wx * wx + wy * wy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let px = start.x + vx * t - point.x;
    let py = start.y + vy * t - point.y;
    px * px + py * py
}
