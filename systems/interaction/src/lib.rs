#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure interaction system that turns pointer input into grid commands.
//!
//! A click highlights a neighbour of the clicked cell; a wheel gesture zooms
//! by one step per frame. The system never touches the grid directly: hit
//! testing and adjacency are supplied as closures mirroring the world's
//! `query::closest_cell` and `query::neighbor` helpers.

use glam::Vec2;
use hexgrid_core::{CellIndex, Color, Command, Direction, Style, ZoomDirection};
use serde::{Deserialize, Serialize};

/// Settings controlling how clicks are answered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionConfig {
    /// Style given to the cell selected by a click.
    pub highlight: Style,
    /// Direction from the clicked cell to the cell that gets highlighted.
    pub target: Direction,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            highlight: Style::new(Color::from_rgb(0, 132, 180), Color::from_rgb(0x33, 0, 0), 2),
            target: Direction::BottomLeft,
        }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionInput {
    /// Surface position of a click on this frame.
    pub click: Option<Vec2>,
    /// Signed wheel delta observed on this frame.
    pub wheel_delta: Option<f32>,
}

impl InteractionInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(click: Option<Vec2>, wheel_delta: Option<f32>) -> Self {
        Self { click, wheel_delta }
    }
}

/// Interaction system that translates pointer input into commands.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
    config: InteractionConfig,
}

impl Interaction {
    /// Creates a new interaction system.
    #[must_use]
    pub const fn new(config: InteractionConfig) -> Self {
        Self { config }
    }

    /// Settings the system was created with.
    #[must_use]
    pub const fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Consumes one frame of input and emits the resulting commands.
    ///
    /// `closest_cell` resolves a surface point to the nearest rendered cell
    /// and `neighbor` resolves a step from a cell, both returning `None` when
    /// nothing exists there. Clicks are handled before wheel input.
    pub fn handle<H, N>(
        &self,
        input: InteractionInput,
        mut closest_cell: H,
        mut neighbor: N,
        out: &mut Vec<Command>,
    ) where
        H: FnMut(Vec2) -> Option<CellIndex>,
        N: FnMut(CellIndex, Direction) -> Option<CellIndex>,
    {
        if let Some(point) = input.click {
            match closest_cell(point).and_then(|cell| neighbor(cell, self.config.target)) {
                Some(cell) => out.push(Command::Restyle {
                    cell,
                    style: self.config.highlight,
                }),
                None => log::debug!("click at {point} selected no cell"),
            }
        }

        if let Some(direction) = input.wheel_delta.and_then(ZoomDirection::from_wheel_delta) {
            out.push(Command::Zoom { direction });
        }
    }
}
