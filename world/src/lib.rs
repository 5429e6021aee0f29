#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative hex grid state.
//!
//! A [`Grid`] owns every [`Cell`] produced by one sweep over its index range.
//! Mutations arrive as [`Command`] values through [`apply`], which reports
//! what changed as [`Event`] values. [`present`] turns those events into
//! paint calls on a [`DrawingSurface`]: a full [`draw::redraw`] when every
//! centre moved, a localized [`draw::update_cell`] when one style changed.

pub mod draw;

use std::collections::HashMap;

use glam::Vec2;
use hexgrid_core::{CellIndex, Color, Command, Direction, Event, Style, MIN_CELL_DIAMETER};
use hexgrid_rendering::DrawingSurface;
use hexgrid_system_coordinate_mapper::CoordinateMapper;
use hexgrid_system_style_rules::{CreationRule, RuleSetError, StyleRuleEngine};
use serde::{Deserialize, Serialize};

pub use hit_test::HitTestError;

const DEFAULT_CELL_DIAMETER: f32 = 30.0;
// rows advance 0.55 diameters instead of the regular 0.75
const DEFAULT_SKEW: f32 = 0.55 / 0.75;
const DEFAULT_THICKNESS: f32 = 1.0 / 20.0;
const DEFAULT_X_COUNT: u32 = 8;
const DEFAULT_Y_COUNT: u32 = 6;

/// Largest half-extent accepted along either axis.
pub const MAX_HALF_EXTENT: u32 = 512;

/// Construction-time settings of a grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Corner-to-corner diameter of a cell in surface pixels.
    pub cell_diameter: f32,
    /// Row compression factor in `(0, 1]`; `1.0` disables skew.
    pub skew: f32,
    /// Outline width as a fraction of the diameter.
    pub thickness: f32,
    /// Half-extent of the column range; columns span `1 - x_count..x_count`.
    pub x_count: u32,
    /// Half-extent of the row range; rows span `1 - y_count..y_count`.
    pub y_count: u32,
    /// Color filling the surface behind the cells.
    pub background_color: Color,
    /// Outline color of cells matched by no creation rule.
    pub foreground_color: Color,
    /// Whether skewed grids draw background patches under invisible cells.
    pub background_fill_in: bool,
    /// Directions reported by [`query::neighbors`].
    pub directions: Vec<Direction>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_diameter: DEFAULT_CELL_DIAMETER,
            skew: DEFAULT_SKEW,
            thickness: DEFAULT_THICKNESS,
            x_count: DEFAULT_X_COUNT,
            y_count: DEFAULT_Y_COUNT,
            background_color: Color::from_rgb(0xee, 0xee, 0xee),
            foreground_color: Color::from_rgb(0x66, 0x66, 0x66),
            background_fill_in: true,
            directions: Direction::HEXAGONAL.to_vec(),
        }
    }
}

impl GridConfig {
    /// Checks every numeric setting, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), GridConfigError> {
        if !self.cell_diameter.is_finite() || self.cell_diameter <= 0.0 {
            return Err(GridConfigError::InvalidCellDiameter {
                cell_diameter: self.cell_diameter,
            });
        }

        if !(self.skew > 0.0 && self.skew <= 1.0) {
            return Err(GridConfigError::InvalidSkew { skew: self.skew });
        }

        if !self.thickness.is_finite() || self.thickness < 0.0 {
            return Err(GridConfigError::InvalidThickness {
                thickness: self.thickness,
            });
        }

        let counts = [self.x_count, self.y_count];
        if counts
            .iter()
            .any(|count| *count == 0 || *count > MAX_HALF_EXTENT)
        {
            return Err(GridConfigError::InvalidCellCount {
                x_count: self.x_count,
                y_count: self.y_count,
            });
        }

        Ok(())
    }

    /// Style assigned to cells matched by no creation rule.
    #[must_use]
    pub const fn default_style(&self) -> Style {
        Style::new(self.foreground_color, self.background_color, 0)
    }
}

/// Errors reported when a grid cannot be constructed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GridConfigError {
    /// The diameter must be finite and positive.
    #[error("cell diameter must be finite and positive (received {cell_diameter})")]
    InvalidCellDiameter {
        /// Diameter that failed validation.
        cell_diameter: f32,
    },
    /// The skew must lie in `(0, 1]`.
    #[error("skew must lie in (0, 1] (received {skew})")]
    InvalidSkew {
        /// Skew that failed validation.
        skew: f32,
    },
    /// The thickness must be finite and non-negative.
    #[error("thickness must be finite and non-negative (received {thickness})")]
    InvalidThickness {
        /// Thickness that failed validation.
        thickness: f32,
    },
    /// Both half-extents must be positive and bounded.
    #[error(
        "cell counts must lie in 1..={max} (received x_count {x_count}, y_count {y_count})",
        max = MAX_HALF_EXTENT
    )]
    InvalidCellCount {
        /// Column half-extent provided.
        x_count: u32,
        /// Row half-extent provided.
        y_count: u32,
    },
    /// The creation rules were rejected.
    #[error("invalid creation rules: {0}")]
    Rules(#[from] RuleSetError),
}

/// A single hexagon of the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    index: CellIndex,
    style: Style,
    last_rendered_center: Option<Vec2>,
    last_rendered_invisible: Option<bool>,
}

impl Cell {
    pub(crate) const fn new(index: CellIndex, style: Style) -> Self {
        Self {
            index,
            style,
            last_rendered_center: None,
            last_rendered_invisible: None,
        }
    }

    /// Logical position of the cell.
    #[must_use]
    pub const fn index(&self) -> CellIndex {
        self.index
    }

    /// Current display style.
    #[must_use]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// Pixel centre at which the cell was last drawn, if it ever was.
    #[must_use]
    pub const fn last_rendered_center(&self) -> Option<Vec2> {
        self.last_rendered_center
    }

    pub(crate) fn record_render(&mut self, center: Vec2) -> Option<bool> {
        self.last_rendered_center = Some(center);
        self.last_rendered_invisible.replace(self.style.invisible)
    }
}

/// Represents the authoritative hex grid state.
#[derive(Debug)]
pub struct Grid {
    config: GridConfig,
    engine: StyleRuleEngine,
    cells: Vec<Cell>,
    lookup: HashMap<CellIndex, usize>,
}

impl Grid {
    /// Validates `config`, builds the rule engine and fills the grid.
    ///
    /// Nothing is drawn; call [`draw::redraw`] once a surface is available.
    pub fn new(config: GridConfig, rules: Vec<CreationRule>) -> Result<Self, GridConfigError> {
        config.validate()?;
        let engine = StyleRuleEngine::new(rules, config.default_style())?;

        let mut grid = Self {
            config,
            engine,
            cells: Vec::new(),
            lookup: HashMap::new(),
        };
        let _ = grid.fill();
        Ok(grid)
    }

    fn fill(&mut self) -> usize {
        // validated against MAX_HALF_EXTENT, so both fit in i32
        let x_count = self.config.x_count as i32;
        let y_count = self.config.y_count as i32;
        let capacity = (2 * self.config.x_count as usize - 1) * (2 * self.config.y_count as usize - 1);

        self.cells = Vec::with_capacity(capacity);
        self.lookup = HashMap::with_capacity(capacity);

        for y in 1 - y_count..y_count {
            for x in 1 - x_count..x_count {
                let index = CellIndex::new(x, y);
                let style = self.engine.classify(index);
                let _ = self.lookup.insert(index, self.cells.len());
                self.cells.push(Cell::new(index, style));
            }
        }

        log::info!(
            "filled grid with {} cells using {} creation rules",
            self.cells.len(),
            self.engine.rule_count()
        );
        self.cells.len()
    }

    fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(
            self.config.cell_diameter,
            self.config.skew,
            self.config.thickness,
        )
    }

    fn fill_in_enabled(&self) -> bool {
        self.config.background_fill_in && self.mapper().is_skewed()
    }

    fn position(&self, index: CellIndex) -> Option<usize> {
        self.lookup.get(&index).copied()
    }

    fn cell(&self, index: CellIndex) -> Option<&Cell> {
        self.position(index).and_then(|position| self.cells.get(position))
    }

    fn cell_mut(&mut self, index: CellIndex) -> Option<&mut Cell> {
        let position = self.position(index)?;
        self.cells.get_mut(position)
    }

    fn rescale(&mut self, factor: f32, out_events: &mut Vec<Event>) {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("ignoring rescale by invalid factor {factor}");
            return;
        }

        self.set_cell_diameter(self.config.cell_diameter * factor, out_events);
    }

    fn set_cell_diameter(&mut self, diameter: f32, out_events: &mut Vec<Event>) {
        if !diameter.is_finite() || diameter <= 0.0 {
            log::warn!("ignoring invalid cell diameter {diameter}");
            return;
        }

        let current = diameter.max(MIN_CELL_DIAMETER);
        if current > diameter {
            log::warn!("cell diameter {diameter} clamped to {MIN_CELL_DIAMETER}");
        }

        let previous = self.config.cell_diameter;
        if current == previous {
            return;
        }

        self.config.cell_diameter = current;
        out_events.push(Event::CellDiameterChanged { previous, current });
    }
}

/// Applies the provided command to the grid, mutating state deterministically.
pub fn apply(grid: &mut Grid, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::FillGrid => {
            let cell_count = grid.fill();
            out_events.push(Event::GridFilled { cell_count });
        }
        Command::Zoom { direction } => grid.rescale(direction.factor(), out_events),
        Command::ScaleCellDiameter { factor } => grid.rescale(factor, out_events),
        Command::SetCellDiameter { diameter } => grid.set_cell_diameter(diameter, out_events),
        Command::Restyle { cell, style } => match grid.cell_mut(cell) {
            Some(target) => {
                let previous = std::mem::replace(&mut target.style, style);
                out_events.push(Event::CellRestyled {
                    cell,
                    previous,
                    current: style,
                });
            }
            None => {
                log::debug!("restyle of {cell} rejected: no such cell");
                out_events.push(Event::RestyleRejected { cell });
            }
        },
    }
}

/// Paints the consequences of `events` onto `surface`.
///
/// Each regeneration or rescale triggers its own full redraw; restyles are
/// repainted locally.
pub fn present<S>(grid: &mut Grid, events: &[Event], surface: &mut S)
where
    S: DrawingSurface + ?Sized,
{
    for event in events {
        match event {
            Event::GridFilled { .. } | Event::CellDiameterChanged { .. } => {
                draw::redraw(grid, surface);
            }
            Event::CellRestyled { cell, .. } => {
                let _ = draw::update_cell(grid, *cell, surface);
            }
            Event::RestyleRejected { .. } => {}
        }
    }
}

/// Query functions that provide read-only access to the grid state.
pub mod query {
    use glam::Vec2;
    use hexgrid_core::{CellIndex, Direction};
    use hexgrid_system_coordinate_mapper::CoordinateMapper;

    use super::{hit_test, Cell, Grid, GridConfig, HitTestError};

    /// Provides read-only access to the grid configuration.
    #[must_use]
    pub fn config(grid: &Grid) -> &GridConfig {
        &grid.config
    }

    /// Current cell diameter in surface pixels.
    #[must_use]
    pub fn cell_diameter(grid: &Grid) -> f32 {
        grid.config.cell_diameter
    }

    /// Geometry helper matching the grid's current size and skew.
    #[must_use]
    pub fn mapper(grid: &Grid) -> CoordinateMapper {
        grid.mapper()
    }

    /// All cells in sweep order (rows top to bottom, columns left to right).
    #[must_use]
    pub fn cells(grid: &Grid) -> &[Cell] {
        &grid.cells
    }

    /// Looks up a cell by index.
    #[must_use]
    pub fn cell(grid: &Grid, index: CellIndex) -> Option<&Cell> {
        grid.cell(index)
    }

    /// Cell adjacent to `index` in `direction`, or `None` at the grid edge.
    #[must_use]
    pub fn neighbor(grid: &Grid, index: CellIndex, direction: Direction) -> Option<&Cell> {
        index
            .neighbor(direction)
            .and_then(|target| grid.cell(target))
    }

    /// Neighbours of `index` in the grid's active direction set.
    pub fn neighbors(grid: &Grid, index: CellIndex) -> impl Iterator<Item = &Cell> + '_ {
        grid.config
            .directions
            .iter()
            .filter_map(move |direction| neighbor(grid, index, *direction))
    }

    /// Highest layer held by any cell.
    #[must_use]
    pub fn max_layer(grid: &Grid) -> u32 {
        grid.cells
            .iter()
            .map(|cell| cell.style.layer)
            .max()
            .unwrap_or(0)
    }

    /// Cell whose last rendered centre lies closest to `point`.
    pub fn closest_cell(grid: &Grid, point: Vec2) -> Result<&Cell, HitTestError> {
        hit_test::closest_cell(&grid.cells, point, grid.config.skew)
    }
}
