#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure geometry system that places hexagons on a drawing surface.
//!
//! The mapper converts integer [`CellIndex`] values into pixel centres and
//! derives the polygons the draw pipeline traces. Every measurement is
//! computed on demand from the cell diameter, skew and thickness so a
//! rescale never leaves stale geometry behind.
//!
//! There is no inverse transform: the interlocking skewed rows are not
//! uniquely invertible from a pixel alone, so pixel queries are answered by
//! hit testing the rendered centres instead.

use glam::Vec2;
use hexgrid_core::CellIndex;

/// Fraction of the diameter separating row centres before skew is applied.
const ROW_PITCH: f32 = 0.75;

/// Converts grid indices into surface pixels for a given cell size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    cell_diameter: f32,
    skew: f32,
    thickness: f32,
}

impl CoordinateMapper {
    /// Creates a mapper for cells of `cell_diameter` pixels.
    ///
    /// `skew` compresses the row spacing (`1.0` leaves rows regular) and
    /// `thickness` expresses the outline width as a fraction of the diameter.
    #[must_use]
    pub const fn new(cell_diameter: f32, skew: f32, thickness: f32) -> Self {
        Self {
            cell_diameter,
            skew,
            thickness,
        }
    }

    /// Corner-to-corner diameter of a cell.
    #[must_use]
    pub const fn cell_diameter(&self) -> f32 {
        self.cell_diameter
    }

    /// Vertical compression factor.
    #[must_use]
    pub const fn skew(&self) -> f32 {
        self.skew
    }

    /// Reports whether rows are compressed and background fill-in applies.
    #[must_use]
    pub fn is_skewed(&self) -> bool {
        self.skew < 1.0
    }

    /// Distance from the centre to a corner.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.cell_diameter / 2.0
    }

    /// Distance from the centre to the middle of a vertical edge.
    #[must_use]
    pub fn short_radius(&self) -> f32 {
        self.radius() * 3f32.sqrt() / 2.0
    }

    /// Distance between the centres of two cells sharing a row.
    #[must_use]
    pub fn horizontal_spacing(&self) -> f32 {
        2.0 * self.short_radius()
    }

    /// Distance between the centres of two adjacent rows.
    #[must_use]
    pub fn vertical_spacing(&self) -> f32 {
        ROW_PITCH * self.cell_diameter * self.skew
    }

    /// Amount by which the upper corners are lowered to flatten the top.
    #[must_use]
    pub fn vertical_compression(&self) -> f32 {
        ROW_PITCH * self.cell_diameter - self.vertical_spacing()
    }

    /// How far a background patch extends below the bottom edges.
    #[must_use]
    pub fn patch_depth(&self) -> f32 {
        self.cell_diameter / 4.0
    }

    /// Outline stroke width.
    #[must_use]
    pub fn line_width(&self) -> f32 {
        self.cell_diameter * self.thickness
    }

    /// Offset of the cell centre relative to the grid origin.
    #[must_use]
    pub fn offset(&self, index: CellIndex) -> Vec2 {
        let mut x = index.x() as f32 * self.horizontal_spacing();
        if index.is_odd_row() {
            x += self.short_radius();
        }
        let y = index.y() as f32 * self.vertical_spacing();
        Vec2::new(x, y)
    }

    /// Pixel centre of the cell for a grid whose origin sits at `origin`.
    #[must_use]
    pub fn center(&self, index: CellIndex, origin: Vec2) -> Vec2 {
        origin + self.offset(index)
    }

    /// Outline of the cell, clockwise from the top corner.
    ///
    /// The three upper corners are lowered by
    /// [`vertical_compression`](Self::vertical_compression) so the skewed cell
    /// keeps its full bottom half while its top flattens.
    #[must_use]
    pub fn hexagon(&self, center: Vec2) -> [Vec2; 6] {
        let radius = self.radius();
        let short = self.short_radius();
        let drop = self.vertical_compression();

        [
            Vec2::new(center.x, center.y - radius + drop),
            Vec2::new(center.x + short, center.y - radius / 2.0 + drop),
            Vec2::new(center.x + short, center.y + radius / 2.0),
            Vec2::new(center.x, center.y + radius),
            Vec2::new(center.x - short, center.y + radius / 2.0),
            Vec2::new(center.x - short, center.y - radius / 2.0 + drop),
        ]
    }

    /// Patch extending the bottom-left edge downwards.
    #[must_use]
    pub fn left_background_patch(&self, center: Vec2) -> [Vec2; 4] {
        self.background_patch(center, -self.short_radius())
    }

    /// Patch extending the bottom-right edge downwards.
    #[must_use]
    pub fn right_background_patch(&self, center: Vec2) -> [Vec2; 4] {
        self.background_patch(center, self.short_radius())
    }

    fn background_patch(&self, center: Vec2, side: f32) -> [Vec2; 4] {
        let radius = self.radius();
        let depth = self.patch_depth();
        let corner = Vec2::new(center.x + side, center.y + radius / 2.0);
        let bottom = Vec2::new(center.x, center.y + radius);
        let down = Vec2::new(0.0, depth);

        [corner, corner + down, bottom + down, bottom]
    }
}
