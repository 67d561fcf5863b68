use crate::pad::controller::DigitPad;
use crate::pad::model::{Point, MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH};
use crate::pad::raster::DirtyRect;
use eframe::egui;
use std::time::{Duration, Instant};

const IN_FLIGHT_REPAINT: Duration = Duration::from_millis(50);
const CANVAS_TEXTURE_NAME: &str = "digit-pad-canvas";

pub struct DigitPadApp {
    pad: DigitPad,
    texture: Option<egui::TextureHandle>,
    brush_width: u32,
    last_pointer: Option<egui::Pos2>,
    canvas_rect: Option<egui::Rect>,
}

impl DigitPadApp {
    pub fn new(mut pad: DigitPad) -> Self {
        if let Err(err) = pad.initialize() {
            tracing::warn!(error = %err, "drawing surface unavailable");
        }
        let brush_width = pad.brush_width();
        Self {
            pad,
            texture: None,
            brush_width,
            last_pointer: None,
            canvas_rect: None,
        }
    }

    pub fn pad(&self) -> &DigitPad {
        &self.pad
    }

    /// Screen rectangle of the drawing area from the last frame.
    pub fn canvas_rect(&self) -> Option<egui::Rect> {
        self.canvas_rect
    }

    /// Draws one frame. Kept separate from [`eframe::App::update`] so it can be
    /// driven by a bare [`egui::Context`].
    pub fn ui(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.pad.tick(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Digit Doodle Pad");
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Prediction:").strong().size(18.0));
                    ui.label(
                        egui::RichText::new(self.pad.prediction_text())
                            .monospace()
                            .size(34.0),
                    );
                });
                ui.add_space(12.0);
                self.canvas(ui, now);
                ui.add_space(16.0);
                self.controls(ui);
            });
        });

        if let Some(remaining) = self.pad.next_deadline_in(now) {
            ctx.request_repaint_after(remaining);
        } else if self.pad.trigger_state().is_busy() {
            ctx.request_repaint_after(IN_FLIGHT_REPAINT);
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui, now: Instant) {
        let (width, height) = self.pad.surface().size();
        let (rect, _response) = ui.allocate_exact_size(
            egui::vec2(width as f32, height as f32),
            egui::Sense::click_and_drag(),
        );
        self.canvas_rect = Some(rect);

        self.handle_pointer(ui.ctx(), rect, now);
        self.upload_texture(ui.ctx());

        let painter = ui.painter_at(rect.expand(4.0));
        painter.rect_filled(rect, 4.0, egui::Color32::WHITE);
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        painter.rect_stroke(rect, 4.0, egui::Stroke::new(3.0, egui::Color32::BLACK));
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let slider = egui::Slider::new(&mut self.brush_width, MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH)
                .text("Brush Size");
            if ui.add(slider).changed() {
                self.pad.set_brush_width(self.brush_width);
            }
            if ui.button("Clear").clicked() {
                self.pad.clear();
                tracing::debug!("canvas cleared");
            }
        });
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, rect: egui::Rect, now: Instant) {
        let (pressed, down, released, hover) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.hover_pos(),
            )
        });
        let inside = hover.filter(|pos| rect.contains(*pos));
        let to_local = |pos: egui::Pos2| Point::new(pos.x - rect.min.x, pos.y - rect.min.y);

        if let Some(pos) = inside {
            if pressed {
                self.pad.pointer_down(to_local(pos));
                self.last_pointer = Some(pos);
            } else if down && self.pad.surface().is_drawing() && self.last_pointer != Some(pos) {
                self.pad.pointer_move(to_local(pos), now);
                self.last_pointer = Some(pos);
            }
        }

        if !self.pad.surface().is_drawing() {
            return;
        }
        if released {
            self.pad.pointer_up(now);
            self.last_pointer = None;
        } else if inside.is_none() {
            self.pad.pointer_leave(now);
            self.last_pointer = None;
        }
    }

    fn upload_texture(&mut self, ctx: &egui::Context) {
        let Some(dirty) = self.pad.surface_mut().take_dirty() else {
            return;
        };
        let Some(raster) = self.pad.raster() else {
            return;
        };

        match self.texture.as_mut() {
            Some(texture) => {
                let region = color_image(&raster.region_rgba(dirty), dirty);
                texture.set_partial(
                    [dirty.x as usize, dirty.y as usize],
                    region,
                    egui::TextureOptions::LINEAR,
                );
            }
            None => {
                let full = DirtyRect::full(raster.width, raster.height);
                self.texture = Some(ctx.load_texture(
                    CANVAS_TEXTURE_NAME,
                    color_image(&raster.pixels, full),
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
    }
}

fn color_image(rgba: &[u8], rect: DirtyRect) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied([rect.width as usize, rect.height as usize], rgba)
}

impl eframe::App for DigitPadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}
