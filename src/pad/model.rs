pub const SURFACE_WIDTH: u32 = 280;
pub const SURFACE_HEIGHT: u32 = 280;
pub const CLASSIFIER_SIZE: u32 = 28;

pub const MIN_BRUSH_WIDTH: u32 = 4;
pub const MAX_BRUSH_WIDTH: u32 = 30;
pub const DEFAULT_BRUSH_WIDTH: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub width: u32,
    pub color: Color,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_BRUSH_WIDTH,
            color: Color::BLACK,
        }
    }
}

pub fn clamp_brush_width(width: u32) -> u32 {
    width.clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH)
}

/// An open path between a pointer-down and the next pointer-up or leave.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub start_width: u32,
}

impl Stroke {
    pub fn begin(point: Point, width: u32) -> Self {
        Self {
            points: vec![point],
            start_width: width,
        }
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Latest classifier answer. `label` is the index of the highest score.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: usize,
    pub scores: Vec<f64>,
}

impl Prediction {
    pub fn from_scores(scores: Vec<f64>) -> Option<Self> {
        let label = argmax_first(&scores)?;
        Some(Self { label, scores })
    }

    /// Score of the chosen label.
    pub fn confidence(&self) -> f64 {
        self.scores[self.label]
    }
}

/// Index of the largest score, ties resolved to the lowest index.
pub fn argmax_first(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, score) in scores.iter().copied().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if score <= current => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

pub const PREDICTION_PLACEHOLDER: &str = "...";

pub fn prediction_label(prediction: Option<&Prediction>) -> String {
    match prediction {
        Some(p) => p.label.to_string(),
        None => PREDICTION_PLACEHOLDER.to_string(),
    }
}
