//! Layered draw pipeline.
//!
//! A full redraw paints in three passes: the surface background, the
//! background patches of skewed grids, and the foreground polygons layer by
//! layer so higher layers land on top. [`update_cell`] repaints a single cell
//! plus the neighbours whose appearance depends on it.

use glam::Vec2;
use hexgrid_core::{CellIndex, Direction, Style};
use hexgrid_rendering::{trace_polygon, DrawingSurface};
use hexgrid_system_coordinate_mapper::CoordinateMapper;

use crate::{query, Cell, Grid};

/// Repaints the whole surface and records every cell's rendered centre.
pub fn redraw<S>(grid: &mut Grid, surface: &mut S)
where
    S: DrawingSurface + ?Sized,
{
    let mapper = grid.mapper();
    let origin = surface.center();
    for cell in &mut grid.cells {
        let center = mapper.center(cell.index, origin);
        let _ = cell.record_render(center);
    }

    let grid = &*grid;
    fill_background(grid, surface);

    if grid.fill_in_enabled() {
        for cell in &grid.cells {
            let _ = draw_background_patches(grid, cell, &mapper, origin, surface);
        }
    }

    let max_layer = query::max_layer(grid);
    for layer in 0..=max_layer {
        for cell in grid.cells.iter().filter(|cell| cell.style.layer == layer) {
            draw_foreground(cell, &mapper, origin, surface);
        }
    }

    log::debug!(
        "redraw: {} cells over {} layers at diameter {:.2}",
        grid.cells.len(),
        max_layer + 1,
        mapper.cell_diameter()
    );
}

/// Repaints a single cell in place after its style changed.
///
/// Returns `false` when `index` is not part of the grid.
pub fn update_cell<S>(grid: &mut Grid, index: CellIndex, surface: &mut S) -> bool
where
    S: DrawingSurface + ?Sized,
{
    let Some(position) = grid.position(index) else {
        return false;
    };

    let mapper = grid.mapper();
    let origin = surface.center();
    let center = mapper.center(index, origin);
    let was_invisible = grid.cells[position].record_render(center);

    let grid = &*grid;
    let cell = &grid.cells[position];
    let visibility_changed = was_invisible.map_or(false, |was| was != cell.style.invisible);

    surface.set_fill_style(grid.config.background_color);
    trace_polygon(surface, &mapper.hexagon(center));
    surface.fill();

    let fill_in = grid.fill_in_enabled();
    let owns_patch = fill_in && draw_background_patches(grid, cell, &mapper, origin, surface);
    draw_foreground(cell, &mapper, origin, surface);

    // cells above use this one as their bottom-left/right neighbour
    if visibility_changed && fill_in {
        for direction in [Direction::TopLeft, Direction::TopRight] {
            if let Some(above) = query::neighbor(grid, index, direction) {
                let _ = draw_background_patches(grid, above, &mapper, origin, surface);
                draw_foreground(above, &mapper, origin, surface);
            }
        }
    }

    if owns_patch || visibility_changed {
        if let Some(below) = query::neighbor(grid, index, Direction::TwoRowsDown) {
            draw_foreground(below, &mapper, origin, surface);
        }
    }

    log::trace!(
        "updated cell {index} (patch: {owns_patch}, visibility changed: {visibility_changed})"
    );
    true
}

fn fill_background<S>(grid: &Grid, surface: &mut S)
where
    S: DrawingSurface + ?Sized,
{
    surface.set_fill_style(grid.config.background_color);
    surface.fill_rect(0.0, 0.0, surface.width(), surface.height());
}

fn neighbor_hidden(grid: &Grid, index: CellIndex, direction: Direction) -> bool {
    query::neighbor(grid, index, direction).map_or(true, |neighbor| neighbor.style.invisible)
}

fn apply_cell_paint<S>(style: Style, mapper: &CoordinateMapper, surface: &mut S)
where
    S: DrawingSurface + ?Sized,
{
    surface.set_fill_style(style.background_color);
    surface.set_stroke_style(style.color);
    surface.set_line_width(mapper.line_width());
}

fn paint_polygon<S>(surface: &mut S, points: &[Vec2])
where
    S: DrawingSurface + ?Sized,
{
    trace_polygon(surface, points);
    surface.fill();
    surface.stroke();
}

/// Draws the patches below `cell` whose bottom neighbours are hidden or
/// absent. Returns whether any patch was drawn.
fn draw_background_patches<S>(
    grid: &Grid,
    cell: &Cell,
    mapper: &CoordinateMapper,
    origin: Vec2,
    surface: &mut S,
) -> bool
where
    S: DrawingSurface + ?Sized,
{
    let left = neighbor_hidden(grid, cell.index, Direction::BottomLeft);
    let right = neighbor_hidden(grid, cell.index, Direction::BottomRight);
    if !left && !right {
        return false;
    }

    let center = mapper.center(cell.index, origin);
    apply_cell_paint(cell.style, mapper, surface);
    if left {
        paint_polygon(surface, &mapper.left_background_patch(center));
    }
    if right {
        paint_polygon(surface, &mapper.right_background_patch(center));
    }
    true
}

fn draw_foreground<S>(cell: &Cell, mapper: &CoordinateMapper, origin: Vec2, surface: &mut S)
where
    S: DrawingSurface + ?Sized,
{
    if cell.style.invisible {
        return;
    }

    let center = mapper.center(cell.index, origin);
    apply_cell_paint(cell.style, mapper, surface);
    paint_polygon(surface, &mapper.hexagon(center));
}
