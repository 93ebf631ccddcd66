use crate::camera::{Camera, Viewport};
use crate::config::ParticleFieldConfig;
use crate::driver::ParticleLayer;
use crate::graphics::Canvas;
use crate::math::{blend_over_black, multiply_matrix_vector, Rgb};
use crate::state::AppState;
use std::time::Instant;

const OVERLAY_COLOR: Rgb = Rgb::new(255, 255, 255);

/// Glyphs by apparent point size in cells, smallest first
const POINT_GLYPHS: [(f64, char); 3] = [(0.25, '.'), (0.6, '•'), (f64::INFINITY, '●')];

/// Draws a particle layer, plus the debug and pause overlays, onto a canvas
pub struct ParticleWidget {
    camera: Camera,
    color: Rgb,
    point_size: f64,
    size_attenuation: bool,
    cell_aspect: f64,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
}

impl ParticleWidget {
    pub fn new(config: &ParticleFieldConfig) -> Self {
        ParticleWidget {
            camera: Camera::new(&config.camera),
            color: blend_over_black(config.point_color(), config.points.opacity),
            point_size: config.points.size,
            size_attenuation: config.points.size_attenuation,
            cell_aspect: config.render.cell_aspect,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
        }
    }

    pub fn viewport(&self, canvas: &Canvas) -> Viewport {
        Viewport {
            cols: canvas.width(),
            rows: canvas.height(),
            cell_aspect: self.cell_aspect,
        }
    }

    /// Counts a presented frame, refreshing `state.fps` once per second
    pub fn count_frame(&mut self, state: &mut AppState) {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            state.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }

    /// Clears the canvas and draws the layer at its current rotation.
    /// Returns the number of points that landed on screen.
    pub fn paint_layer(&self, canvas: &mut Canvas, layer: &ParticleLayer) -> usize {
        canvas.clear();
        let viewport = self.viewport(canvas);
        let rotation = layer.rotation().matrix();
        let fixed_scale = self.camera.unit_scale(&viewport);

        let mut visible = 0;
        for [x, y, z] in layer.cloud().points() {
            let world = multiply_matrix_vector(&rotation, &[x as f64, y as f64, z as f64]);
            let Some(projected) = self.camera.project(world, &viewport) else {
                continue;
            };

            let scale = if self.size_attenuation {
                projected.cells_per_unit
            } else {
                fixed_scale
            };
            let glyph = point_glyph(self.point_size * scale);
            canvas.plot(projected.col, projected.row, projected.depth, glyph, self.color);
            visible += 1;
        }
        visible
    }

    /// Draws the debug and pause overlays above the particles
    pub fn paint_overlay(
        &self,
        canvas: &mut Canvas,
        layer: &ParticleLayer,
        state: &AppState,
        elapsed: f64,
        visible: usize,
    ) {
        if state.debug {
            let rotation = layer.rotation();
            let lines = [
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("Angle X: {:.2}, Angle Y: {:.2}", rotation.x, rotation.y),
                format!("Rates: {:.3}, {:.3} rad/s", layer.rates().x, layer.rates().y),
                format!("Elapsed: {elapsed:.2}s"),
                format!("Points: {} ({visible} visible)", layer.cloud().len()),
                format!("FPS: {:.2}", state.fps),
            ];
            for (row, line) in lines.iter().enumerate() {
                canvas.draw_text(1, row, line, OVERLAY_COLOR);
            }
        }

        if state.paused {
            canvas.draw_text_centered(canvas.height() / 2, "Paused", OVERLAY_COLOR);
        }
    }
}

/// Picks a glyph for a point covering `cells` cell heights
pub fn point_glyph(cells: f64) -> char {
    POINT_GLYPHS
        .iter()
        .find(|(limit, _)| cells < *limit)
        .map(|&(_, glyph)| glyph)
        .unwrap_or('●')
}
