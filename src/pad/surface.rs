use crate::pad::model::{
    clamp_brush_width, Color, Point, Stroke, StrokeStyle, SURFACE_HEIGHT, SURFACE_WIDTH,
};
use crate::pad::raster::{DirtyRect, Raster};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    ContentsChanged,
    Cleared,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("capture surface size {width}x{height} is empty")]
    EmptySize { width: u32, height: u32 },
}

/// Drawable raster plus the open stroke, if any.
#[derive(Debug, Clone)]
pub struct CaptureSurface {
    size: (u32, u32),
    style: StrokeStyle,
    raster: Option<Raster>,
    active: Option<Stroke>,
    dirty: Option<DirtyRect>,
    revision: u64,
}

impl Default for CaptureSurface {
    fn default() -> Self {
        Self::new(SURFACE_WIDTH, SURFACE_HEIGHT, StrokeStyle::default())
    }
}

impl CaptureSurface {
    pub fn new(width: u32, height: u32, style: StrokeStyle) -> Self {
        Self {
            size: (width, height),
            style: StrokeStyle {
                width: clamp_brush_width(style.width),
                color: style.color,
            },
            raster: None,
            active: None,
            dirty: None,
            revision: 0,
        }
    }

    pub fn initialize(&mut self) -> Result<(), SurfaceError> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Err(SurfaceError::EmptySize { width, height });
        }
        self.raster = Some(Raster::new(width, height, Color::WHITE));
        self.active = None;
        self.mark_dirty(DirtyRect::full(width, height));
        tracing::debug!(width, height, "capture surface initialized");
        Ok(())
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn brush_width(&self) -> u32 {
        self.style.width
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    /// Bumped on every pixel mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn begin_stroke(&mut self, point: Point) {
        if self.raster.is_none() {
            return;
        }
        if self.active.is_some() {
            tracing::debug!("stroke began while another was open; closing previous");
        }
        self.active = Some(Stroke::begin(point, self.style.width));
    }

    pub fn extend_stroke(&mut self, point: Point) -> Option<SurfaceEvent> {
        let stroke = self.active.as_mut()?;
        let raster = self.raster.as_mut()?;
        let last = stroke.last_point().unwrap_or(point);
        stroke.points.push(point);
        if let Some(rect) = raster.draw_segment(last, point, self.style.color, self.style.width) {
            self.mark_dirty(rect);
        }
        Some(SurfaceEvent::ContentsChanged)
    }

    pub fn end_stroke(&mut self) -> Option<SurfaceEvent> {
        let stroke = self.active.take()?;
        tracing::debug!(points = stroke.points.len(), width = stroke.start_width, "stroke closed");
        Some(SurfaceEvent::ContentsChanged)
    }

    pub fn set_brush_width(&mut self, width: u32) {
        self.style.width = clamp_brush_width(width);
    }

    pub fn clear(&mut self) -> Option<SurfaceEvent> {
        let raster = self.raster.as_mut()?;
        raster.fill(Color::WHITE);
        let (width, height) = (raster.width, raster.height);
        self.active = None;
        self.mark_dirty(DirtyRect::full(width, height));
        Some(SurfaceEvent::Cleared)
    }

    /// Returns and resets the region changed since the last call.
    pub fn take_dirty(&mut self) -> Option<DirtyRect> {
        let (width, height) = self.size;
        self.dirty.take().and_then(|rect| rect.clamp(width, height))
    }

    fn mark_dirty(&mut self, rect: DirtyRect) {
        self.dirty = Some(match self.dirty {
            Some(existing) => existing.union(rect),
            None => rect,
        });
        self.revision = self.revision.wrapping_add(1);
    }
}
