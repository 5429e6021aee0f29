//! Headless drawing surface that serialises paint calls into an SVG document.

use glam::Vec2;
use hexgrid_rendering::{Color, DrawingSurface};

/// Retained SVG canvas; later elements paint over earlier ones.
#[derive(Clone, Debug)]
pub(crate) struct SvgSurface {
    width: f32,
    height: f32,
    fill_style: Color,
    stroke_style: Color,
    line_width: f32,
    path: Vec<Vec2>,
    elements: Vec<String>,
}

impl SvgSurface {
    pub(crate) fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            fill_style: Color::BLACK,
            stroke_style: Color::BLACK,
            line_width: 1.0,
            path: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Renders the accumulated elements as a standalone document.
    pub(crate) fn document(&self) -> String {
        let mut document = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height,
        );
        for element in &self.elements {
            document.push_str("  ");
            document.push_str(element);
            document.push('\n');
        }
        document.push_str("</svg>\n");
        document
    }

    fn path_data(&self) -> Option<String> {
        let (first, rest) = self.path.split_first()?;
        let mut data = format!("M{:.2} {:.2}", first.x, first.y);
        for point in rest {
            data.push_str(&format!(" L{:.2} {:.2}", point.x, point.y));
        }
        data.push_str(" Z");
        Some(data)
    }
}

/// SVG paint attribute for `color`, with a separate opacity when translucent.
fn paint(attribute: &str, color: Color) -> String {
    if color.is_transparent() {
        return format!("{attribute}=\"none\"");
    }

    let opaque = Color::from_rgb(color.red(), color.green(), color.blue());
    if color.alpha() == u8::MAX {
        format!("{attribute}=\"{opaque}\"")
    } else {
        let opacity = f32::from(color.alpha()) / 255.0;
        format!("{attribute}=\"{opaque}\" {attribute}-opacity=\"{opacity:.3}\"")
    }
}

impl DrawingSurface for SvgSurface {
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
        if self.fill_style.is_transparent() {
            return;
        }
        if let Some(data) = self.path_data() {
            self.elements.push(format!(
                "<path d=\"{data}\" {} stroke=\"none\"/>",
                paint("fill", self.fill_style)
            ));
        }
    }

    fn stroke(&mut self) {
        if self.stroke_style.is_transparent() || self.line_width <= 0.0 {
            return;
        }
        if let Some(data) = self.path_data() {
            self.elements.push(format!(
                "<path d=\"{data}\" fill=\"none\" {} stroke-width=\"{:.2}\" stroke-linejoin=\"round\"/>",
                paint("stroke", self.stroke_style),
                self.line_width
            ));
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if self.fill_style.is_transparent() {
            return;
        }
        self.elements.push(format!(
            "<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" {}/>",
            paint("fill", self.fill_style)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexgrid_rendering::trace_polygon;

    #[test]
    fn document_lists_elements_in_paint_order() {
        let mut surface = SvgSurface::new(40.0, 20.0);
        surface.set_fill_style(Color::WHITE);
        surface.fill_rect(0.0, 0.0, 40.0, 20.0);
        surface.set_stroke_style(Color::from_rgb(0x12, 0x34, 0x56));
        surface.set_line_width(1.5);
        trace_polygon(&mut surface, &[Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(5.0, 8.0)]);
        surface.stroke();

        let document = surface.document();
        let rect = document.find("<rect").expect("background rect present");
        let path = document.find("<path").expect("outline present");

        assert!(document.starts_with("<svg"));
        assert!(rect < path, "background must precede the outline");
        assert!(document.contains("fill=\"#ffffff\""));
        assert!(document.contains("stroke=\"#123456\" stroke-width=\"1.50\""));
        assert!(document.contains("d=\"M0.00 0.00 L10.00 0.00 L5.00 8.00 L0.00 0.00 Z\""));
    }

    #[test]
    fn transparent_paint_emits_nothing() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.set_fill_style(Color::TRANSPARENT);
        surface.set_stroke_style(Color::TRANSPARENT);
        trace_polygon(&mut surface, &[Vec2::ZERO, Vec2::ONE, Vec2::X]);
        surface.fill();
        surface.stroke();
        surface.fill_rect(0.0, 0.0, 10.0, 10.0);

        assert!(!surface.document().contains("<path"));
        assert!(!surface.document().contains("<rect"));
    }

    #[test]
    fn translucent_paint_carries_opacity() {
        assert_eq!(
            paint("fill", Color::from_rgba(255, 0, 0, 51)),
            "fill=\"#ff0000\" fill-opacity=\"0.200\""
        );
    }
}
