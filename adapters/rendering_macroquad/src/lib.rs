#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the hex grid.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Macroquad redraws the window from scratch every frame while the grid
//! expects a canvas that keeps whatever was painted on it. The adapter
//! bridges the two with a [`RetainedCanvas`] that remembers every paint
//! operation and replays them each frame. A fill covering the whole surface
//! hides everything beneath it, so the log restarts there. An opaque
//! repaint of an already logged shape replaces the older entry, which keeps
//! the log bounded while cells are restyled over and over.

use anyhow::{Context, Result};
use glam::Vec2;
use hexgrid_rendering::{
    Color, DrawOp, DrawingSurface, FrameInput, Presentation, RecordingSurface, RenderingBackend,
};
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, mouse_wheel, KeyCode, MouseButton,
};
use macroquad::math::Vec2 as MacroquadVec2;

/// Drawing surface that keeps its paint history for per-frame replay.
#[derive(Clone, Debug)]
pub struct RetainedCanvas {
    recorder: RecordingSurface,
    ops: Vec<DrawOp>,
}

impl RetainedCanvas {
    /// Creates an empty canvas with the given extents.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            recorder: RecordingSurface::new(width, height),
            ops: Vec::new(),
        }
    }

    /// Changes the canvas extents after a window resize.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.recorder.resize(width, height);
    }

    /// Operations that together reproduce the current canvas contents.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    fn absorb(&mut self) {
        for op in self.recorder.take_ops() {
            if covers(&op, self.recorder.width(), self.recorder.height()) {
                self.ops.clear();
            } else {
                self.ops.retain(|earlier| !supersedes(&op, earlier));
            }
            self.ops.push(op);
        }
    }
}

fn covers(op: &DrawOp, width: f32, height: f32) -> bool {
    match *op {
        DrawOp::FillRect {
            x,
            y,
            width: rect_width,
            height: rect_height,
            color,
        } => {
            color.alpha() == u8::MAX
                && x <= 0.0
                && y <= 0.0
                && x + rect_width >= width
                && y + rect_height >= height
        }
        _ => false,
    }
}

/// Reports whether `op` paints over every pixel touched by `earlier`.
fn supersedes(op: &DrawOp, earlier: &DrawOp) -> bool {
    match (op, earlier) {
        (
            DrawOp::FillPath { points, color },
            DrawOp::FillPath {
                points: earlier_points,
                ..
            },
        ) => color.alpha() == u8::MAX && points == earlier_points,
        (
            DrawOp::StrokePath {
                points,
                color,
                line_width,
            },
            DrawOp::StrokePath {
                points: earlier_points,
                line_width: earlier_width,
                ..
            },
        ) => color.alpha() == u8::MAX && points == earlier_points && line_width >= earlier_width,
        (
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            },
            DrawOp::FillRect {
                x: earlier_x,
                y: earlier_y,
                width: earlier_width,
                height: earlier_height,
                ..
            },
        ) => {
            color.alpha() == u8::MAX
                && (x, y, width, height) == (earlier_x, earlier_y, earlier_width, earlier_height)
        }
        _ => false,
    }
}

impl DrawingSurface for RetainedCanvas {
    fn width(&self) -> f32 {
        self.recorder.width()
    }

    fn height(&self) -> f32 {
        self.recorder.height()
    }

    fn set_fill_style(&mut self, color: Color) {
        self.recorder.set_fill_style(color);
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.recorder.set_stroke_style(color);
    }

    fn set_line_width(&mut self, width: f32) {
        self.recorder.set_line_width(width);
    }

    fn begin_path(&mut self) {
        self.recorder.begin_path();
    }

    fn move_to(&mut self, point: Vec2) {
        self.recorder.move_to(point);
    }

    fn line_to(&mut self, point: Vec2) {
        self.recorder.line_to(point);
    }

    fn fill(&mut self) {
        self.recorder.fill();
        self.absorb();
    }

    fn stroke(&mut self) {
        self.recorder.stroke();
        self.absorb();
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.recorder.fill_rect(x, y, width, height);
        self.absorb();
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_frame: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut dyn DrawingSurface) + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            width,
            height,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(width).context("window width exceeds platform limits")?,
            window_height: i32::try_from(height)
                .context("window height exceeds platform limits")?,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let background = to_macroquad_color(clear_color);
            let mut canvas = RetainedCanvas::new(width as f32, height as f32);
            let mut last_size: Option<(f32, f32)> = None;

            loop {
                if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
                    break;
                }

                let size = (
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let resized = last_size != Some(size);
                if resized {
                    canvas.resize(size.0, size.1);
                    last_size = Some(size);
                }

                let (cursor_x, cursor_y) = mouse_position();
                let click = is_mouse_button_pressed(MouseButton::Left)
                    .then(|| Vec2::new(cursor_x, cursor_y));
                let (_, wheel_y) = mouse_wheel();

                let input = FrameInput {
                    click,
                    wheel_delta: wheel_delta(wheel_y),
                    resized,
                };
                update_frame(input, &mut canvas);

                macroquad::window::clear_background(background);
                for op in canvas.ops() {
                    paint(op);
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Converts macroquad's wheel reading into a signed delta where negative
/// values zoom in. Macroquad reports scrolling away from the user as
/// positive, the opposite of the delta convention used by the grid.
fn wheel_delta(wheel_y: f32) -> Option<f32> {
    (wheel_y != 0.0 && wheel_y.is_finite()).then_some(-wheel_y)
}

fn paint(op: &DrawOp) {
    match op {
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            if !color.is_transparent() {
                let color = to_macroquad_color(*color);
                macroquad::shapes::draw_rectangle(*x, *y, *width, *height, color);
            }
        }
        DrawOp::FillPath { points, color } => {
            if color.is_transparent() {
                return;
            }
            let color = to_macroquad_color(*color);
            for [a, b, c] in fan_triangles(points) {
                macroquad::shapes::draw_triangle(
                    to_macroquad_vec2(a),
                    to_macroquad_vec2(b),
                    to_macroquad_vec2(c),
                    color,
                );
            }
        }
        DrawOp::StrokePath {
            points,
            color,
            line_width,
        } => {
            if color.is_transparent() || *line_width <= 0.0 {
                return;
            }
            let color = to_macroquad_color(*color);
            for segment in points.windows(2) {
                macroquad::shapes::draw_line(
                    segment[0].x,
                    segment[0].y,
                    segment[1].x,
                    segment[1].y,
                    *line_width,
                    color,
                );
            }
        }
    }
}

/// Splits a convex path into triangles sharing its first vertex.
///
/// A trailing vertex equal to the first one only closes the outline and is
/// dropped before triangulating.
fn fan_triangles(points: &[Vec2]) -> Vec<[Vec2; 3]> {
    let open = match points {
        [first, .., last] if first == last => &points[..points.len() - 1],
        _ => points,
    };

    let Some((anchor, rest)) = open.split_first() else {
        return Vec::new();
    };

    rest.windows(2)
        .map(|pair| [*anchor, pair[0], pair[1]])
        .collect()
}

fn to_macroquad_vec2(point: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(point.x, point.y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::from_rgba(color.red(), color.green(), color.blue(), color.alpha())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_triangulation_skips_closing_vertex() {
        let square = [
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
            Vec2::ZERO,
        ];

        let triangles = fan_triangles(&square);

        assert_eq!(
            triangles,
            vec![
                [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
                [Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)],
            ]
        );
    }

    #[test]
    fn fan_triangulation_of_degenerate_paths_is_empty() {
        assert!(fan_triangles(&[]).is_empty());
        assert!(fan_triangles(&[Vec2::ONE]).is_empty());
        assert!(fan_triangles(&[Vec2::ZERO, Vec2::ONE, Vec2::ZERO]).is_empty());
    }

    #[test]
    fn hexagon_fan_has_four_triangles() {
        let hexagon: Vec<Vec2> = (0..6)
            .map(|step| Vec2::from_angle(step as f32 * std::f32::consts::FRAC_PI_3))
            .collect();

        assert_eq!(fan_triangles(&hexagon).len(), 4);
    }

    #[test]
    fn wheel_reading_is_inverted_and_zero_is_ignored() {
        assert_eq!(wheel_delta(1.0), Some(-1.0));
        assert_eq!(wheel_delta(-120.0), Some(120.0));
        assert_eq!(wheel_delta(0.0), None);
        assert_eq!(wheel_delta(f32::NAN), None);
    }

    #[test]
    fn colors_convert_channel_by_channel() {
        let converted = to_macroquad_color(Color::from_rgba(255, 0, 51, 0));

        assert!((converted.r - 1.0).abs() < 1e-6);
        assert!(converted.g.abs() < 1e-6);
        assert!((converted.b - 0.2).abs() < 1e-6);
        assert!(converted.a.abs() < 1e-6);
    }

    #[test]
    fn full_surface_fill_restarts_the_replay_log() {
        let mut canvas = RetainedCanvas::new(100.0, 50.0);

        canvas.begin_path();
        canvas.move_to(Vec2::ZERO);
        canvas.line_to(Vec2::ONE);
        canvas.stroke();
        canvas.set_fill_style(Color::WHITE);
        canvas.fill_rect(0.0, 0.0, 100.0, 50.0);
        canvas.fill_rect(10.0, 10.0, 5.0, 5.0);

        assert_eq!(canvas.ops().len(), 2, "strokes under an opaque cover are dropped");
        assert!(matches!(canvas.ops()[0], DrawOp::FillRect { width, .. } if width == 100.0));
    }

    #[test]
    fn partial_or_translucent_fills_keep_history() {
        let mut canvas = RetainedCanvas::new(100.0, 50.0);

        canvas.set_fill_style(Color::WHITE);
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0);
        canvas.set_fill_style(Color::from_rgba(0, 0, 0, 128));
        canvas.fill_rect(0.0, 0.0, 100.0, 50.0);

        assert_eq!(canvas.ops().len(), 2);
    }

    fn paint_square(canvas: &mut RetainedCanvas, fill: Color, stroke: Color, line_width: f32) {
        let square = [
            Vec2::new(10.0, 10.0),
            Vec2::new(20.0, 10.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(10.0, 20.0),
        ];
        canvas.set_fill_style(fill);
        canvas.set_stroke_style(stroke);
        canvas.set_line_width(line_width);
        hexgrid_rendering::trace_polygon(canvas, &square);
        canvas.fill();
        canvas.stroke();
    }

    #[test]
    fn repainting_the_same_shape_keeps_one_entry() {
        let mut canvas = RetainedCanvas::new(100.0, 50.0);

        for _ in 0..50 {
            paint_square(&mut canvas, Color::WHITE, Color::BLACK, 1.5);
            paint_square(&mut canvas, Color::BLACK, Color::WHITE, 1.5);
        }

        assert_eq!(canvas.ops().len(), 2);
        assert!(matches!(canvas.ops()[0], DrawOp::FillPath { color, .. } if color == Color::BLACK));
        assert!(
            matches!(canvas.ops()[1], DrawOp::StrokePath { color, .. } if color == Color::WHITE)
        );
    }

    #[test]
    fn translucent_or_thinner_repaints_keep_the_earlier_entry() {
        let mut canvas = RetainedCanvas::new(100.0, 50.0);

        paint_square(&mut canvas, Color::WHITE, Color::BLACK, 2.0);
        paint_square(&mut canvas, Color::from_rgba(0, 0, 0, 128), Color::BLACK, 1.0);

        assert_eq!(canvas.ops().len(), 4);
    }

    #[test]
    fn resize_moves_the_cover_threshold() {
        let mut canvas = RetainedCanvas::new(100.0, 50.0);
        canvas.set_fill_style(Color::BLACK);
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0);

        canvas.resize(200.0, 80.0);
        canvas.fill_rect(0.0, 0.0, 100.0, 50.0);
        assert_eq!(canvas.ops().len(), 2, "old extents no longer cover the canvas");

        canvas.fill_rect(0.0, 0.0, 200.0, 80.0);
        assert_eq!(canvas.ops().len(), 1);
        assert_eq!(canvas.center(), Vec2::new(100.0, 40.0));
    }
}
