//! Per-frame glue between pointer input, the grid and a drawing surface.

use anyhow::{Context, Result};
use hexgrid_core::{Command, Event};
use hexgrid_rendering::{DrawingSurface, FrameInput};
use hexgrid_system_interaction::{Interaction, InteractionInput};
use hexgrid_system_style_rules::CreationRule;
use hexgrid_world::{apply, draw, present, query, Cell, Grid};

use crate::config::Settings;

/// Owns the grid and the systems that drive it.
#[derive(Debug)]
pub(crate) struct Session {
    grid: Grid,
    interaction: Interaction,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Session {
    pub(crate) fn new(settings: Settings) -> Result<Self> {
        let Settings {
            grid,
            rules,
            interaction,
        } = settings;
        let rules = rules.into_iter().map(CreationRule::from).collect();
        let grid = Grid::new(grid, rules).context("failed to build grid")?;

        Ok(Self {
            grid,
            interaction: Interaction::new(interaction),
            commands: Vec::new(),
            events: Vec::new(),
        })
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Processes one frame: interaction, then commands, then painting.
    pub(crate) fn frame(&mut self, input: FrameInput, surface: &mut dyn DrawingSurface) {
        let Self {
            grid,
            interaction,
            commands,
            events,
        } = self;

        if input.resized {
            draw::redraw(grid, &mut *surface);
        }

        {
            let grid = &*grid;
            interaction.handle(
                InteractionInput::new(input.click, input.wheel_delta),
                |point| match query::closest_cell(grid, point) {
                    Ok(cell) => Some(cell.index()),
                    Err(error) => {
                        log::warn!("click at {point} ignored: {error}");
                        None
                    }
                },
                |cell, direction| query::neighbor(grid, cell, direction).map(Cell::index),
                commands,
            );
        }

        for command in commands.drain(..) {
            apply(grid, command, events);
        }
        present(grid, events, &mut *surface);
        events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use hexgrid_core::CellIndex;
    use hexgrid_rendering::{DrawOp, RecordingSurface};

    fn session() -> Session {
        Session::new(Settings::load(None).expect("defaults load")).expect("defaults are valid")
    }

    fn resize() -> FrameInput {
        FrameInput {
            resized: true,
            ..FrameInput::default()
        }
    }

    #[test]
    fn resize_frame_paints_whole_grid() {
        let mut session = session();
        let mut surface = RecordingSurface::new(800.0, 600.0);

        session.frame(resize(), &mut surface);

        assert!(matches!(surface.ops()[0], DrawOp::FillRect { .. }));
        assert!(query::cells(session.grid())
            .iter()
            .all(|cell| cell.last_rendered_center().is_some()));
    }

    #[test]
    fn click_highlights_cell_below_left() {
        let mut session = session();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        session.frame(resize(), &mut surface);

        let origin = surface.center();
        let target = query::mapper(session.grid()).center(CellIndex::new(2, 2), origin);
        session.frame(
            FrameInput {
                click: Some(target + Vec2::new(1.0, 1.0)),
                ..FrameInput::default()
            },
            &mut surface,
        );

        let highlighted = query::cell(session.grid(), CellIndex::new(1, 3))
            .expect("neighbour inside grid")
            .style();
        assert_eq!(highlighted, session.interaction.config().highlight);
    }

    #[test]
    fn clicks_before_first_render_are_ignored() {
        let mut session = session();
        let mut surface = RecordingSurface::new(800.0, 600.0);

        session.frame(
            FrameInput {
                click: Some(Vec2::new(400.0, 300.0)),
                ..FrameInput::default()
            },
            &mut surface,
        );

        assert!(surface.ops().is_empty());
    }

    #[test]
    fn wheel_zooms_and_redraws() {
        let mut session = session();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        session.frame(resize(), &mut surface);
        let _ = surface.take_ops();

        session.frame(
            FrameInput {
                wheel_delta: Some(-1.0),
                ..FrameInput::default()
            },
            &mut surface,
        );

        assert!((query::cell_diameter(session.grid()) - 33.0).abs() < 1e-3);
        assert!(matches!(surface.ops()[0], DrawOp::FillRect { .. }));
    }
}
