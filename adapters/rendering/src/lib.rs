#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for hex grid adapters.
//!
//! The grid never owns a canvas. It paints through the [`DrawingSurface`]
//! capability handed to every draw call, which mirrors a stateful 2D path
//! builder: paint settings persist between calls and apply to the next
//! `fill`, `stroke` or `fill_rect`.

use anyhow::Result as AnyResult;
use glam::Vec2;

pub use hexgrid_core::Color;

/// Stateful 2D path/fill/stroke sink supplied by the host environment.
pub trait DrawingSurface {
    /// Width of the surface in device pixels.
    fn width(&self) -> f32;

    /// Height of the surface in device pixels.
    fn height(&self) -> f32;

    /// Sets the color used by subsequent fills.
    fn set_fill_style(&mut self, color: Color);

    /// Sets the color used by subsequent strokes.
    fn set_stroke_style(&mut self, color: Color);

    /// Sets the width used by subsequent strokes.
    fn set_line_width(&mut self, width: f32);

    /// Discards the current path and starts a new one.
    fn begin_path(&mut self);

    /// Starts a new sub-path at `point`.
    fn move_to(&mut self, point: Vec2);

    /// Extends the current sub-path with a straight segment to `point`.
    fn line_to(&mut self, point: Vec2);

    /// Fills the current path with the fill style.
    fn fill(&mut self);

    /// Outlines the current path with the stroke style and line width.
    fn stroke(&mut self);

    /// Fills an axis-aligned rectangle with the fill style.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Centre of the surface, used as the grid origin.
    fn center(&self) -> Vec2 {
        Vec2::new(self.width() / 2.0, self.height() / 2.0)
    }
}

/// Traces a closed polygon as the current path.
///
/// The path returns to the first vertex explicitly so strokes close the
/// outline on surfaces without an implicit close.
pub fn trace_polygon<S>(surface: &mut S, points: &[Vec2])
where
    S: DrawingSurface + ?Sized,
{
    surface.begin_path();
    let Some((first, rest)) = points.split_first() else {
        return;
    };

    surface.move_to(*first);
    for point in rest {
        surface.line_to(*point);
    }
    surface.line_to(*first);
}

/// Paint operation captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Axis-aligned rectangle fill.
    FillRect {
        /// Left edge of the rectangle.
        x: f32,
        /// Top edge of the rectangle.
        y: f32,
        /// Width of the rectangle.
        width: f32,
        /// Height of the rectangle.
        height: f32,
        /// Fill style active at the time of the call.
        color: Color,
    },
    /// Fill of the current path.
    FillPath {
        /// Vertices of the path in tracing order.
        points: Vec<Vec2>,
        /// Fill style active at the time of the call.
        color: Color,
    },
    /// Outline of the current path.
    StrokePath {
        /// Vertices of the path in tracing order.
        points: Vec<Vec2>,
        /// Stroke style active at the time of the call.
        color: Color,
        /// Line width active at the time of the call.
        line_width: f32,
    },
}

/// Headless surface that records every paint operation.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    fill_style: Color,
    stroke_style: Color,
    line_width: f32,
    path: Vec<Vec2>,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// Creates an empty recording surface with the given extents.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            fill_style: Color::BLACK,
            stroke_style: Color::BLACK,
            line_width: 1.0,
            path: Vec::new(),
            ops: Vec::new(),
        }
    }

    /// Changes the surface extents, as a host would on window resize.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Operations recorded so far, in call order.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Removes and returns the recorded operations.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl DrawingSurface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn set_fill_style(&mut self, color: Color) {
        self.fill_style = color;
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.stroke_style = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, point: Vec2) {
        self.path.push(point);
    }

    fn line_to(&mut self, point: Vec2) {
        self.path.push(point);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::FillPath {
            points: self.path.clone(),
            color: self.fill_style,
        });
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::StrokePath {
            points: self.path.clone(),
            color: self.stroke_style,
            line_width: self.line_width,
        });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color: self.fill_style,
        });
    }
}

/// Input snapshot gathered by adapters before updating the grid.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Surface position of a primary-button click on this frame.
    pub click: Option<Vec2>,
    /// Signed wheel delta observed on this frame; negative zooms in.
    pub wheel_delta: Option<f32>,
    /// Whether the surface was created or resized and needs a full redraw.
    pub resized: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear the window behind the surface.
    pub clear_color: Color,
    /// Initial surface width in pixels.
    pub width: u32,
    /// Initial surface height in pixels.
    pub height: u32,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, width: u32, height: u32) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            width,
            height,
        }
    }
}

/// Rendering backend capable of hosting an interactive grid.
pub trait RenderingBackend {
    /// Runs the backend until it is requested to exit.
    ///
    /// `update_frame` receives the input captured on each frame together with
    /// a retained drawing surface. Whatever it paints persists until painted
    /// over, so callers may redraw only the cells that changed.
    fn run<F>(self, presentation: Presentation, update_frame: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut dyn DrawingSurface) + 'static;
}
