#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for the hex grid engine.
//!
//! `render` drives a headless session and writes the result as SVG; `view`
//! opens an interactive macroquad window.

mod config;
mod session;
mod svg;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use hexgrid_rendering::{FrameInput, Presentation, RenderingBackend};
use hexgrid_rendering_macroquad::MacroquadBackend;
use hexgrid_world::query;

use crate::{config::Settings, session::Session, svg::SvgSurface};

const WINDOW_TITLE: &str = "Hex Grid";
const VIEW_WIDTH: u32 = 960;
const VIEW_HEIGHT: u32 = 720;

/// Command-line arguments accepted by the hex grid binary.
#[derive(Debug, Parser)]
#[command(name = "hexgrid", version, about = "Draws skewed hexagonal grids")]
struct CliArgs {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Renders the grid headlessly to an SVG document.
    Render(RenderArgs),
    /// Opens an interactive window; click to highlight, scroll to zoom.
    View(ViewArgs),
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// TOML settings file; built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Surface width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,
    /// Surface height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Surface point to click, as `X,Y`. May be repeated.
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    click: Vec<Vec2>,
    /// Number of zoom-in steps applied after the clicks.
    #[arg(long, default_value_t = 0)]
    zoom_in: u32,
    /// Number of zoom-out steps applied after the zoom-in steps.
    #[arg(long, default_value_t = 0)]
    zoom_out: u32,
    /// Destination file; the document is written to stdout when omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ViewArgs {
    /// TOML settings file; built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    vsync: bool,
}

fn parse_point(value: &str) -> Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but found {value:?}"))?;
    let coordinate = |part: &str| {
        part.trim()
            .parse::<f32>()
            .ok()
            .filter(|number| number.is_finite())
            .ok_or_else(|| format!("invalid coordinate {part:?}"))
    };
    Ok(Vec2::new(coordinate(x)?, coordinate(y)?))
}

/// Entry point for the hex grid command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match CliArgs::parse().command {
        CliCommand::Render(args) => render(args),
        CliCommand::View(args) => view(args),
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?;
    let mut session = Session::new(settings)?;
    let mut surface = SvgSurface::new(args.width as f32, args.height as f32);

    let steps = args
        .click
        .iter()
        .map(|point| FrameInput {
            click: Some(*point),
            ..FrameInput::default()
        })
        .chain((0..args.zoom_in).map(|_| wheel(-1.0)))
        .chain((0..args.zoom_out).map(|_| wheel(1.0)));

    session.frame(
        FrameInput {
            resized: true,
            ..FrameInput::default()
        },
        &mut surface,
    );
    for input in steps {
        session.frame(input, &mut surface);
    }

    let document = surface.document();
    match &args.output {
        Some(path) => fs::write(path, document)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(document.as_bytes())
            .context("failed to write document to stdout")?,
    }

    log::info!(
        "rendered {} cells at diameter {:.2}",
        query::cells(session.grid()).len(),
        query::cell_diameter(session.grid())
    );
    Ok(())
}

fn view(args: ViewArgs) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?;
    let clear_color = settings.grid.background_color;
    let mut session = Session::new(settings)?;

    let presentation = Presentation::new(WINDOW_TITLE, clear_color, VIEW_WIDTH, VIEW_HEIGHT);
    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .run(presentation, move |input, surface| session.frame(input, surface))
        .context("interactive view failed")
}

fn wheel(delta: f32) -> FrameInput {
    FrameInput {
        wheel_delta: Some(delta),
        ..FrameInput::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse_from_comma_separated_pairs() {
        assert_eq!(parse_point("12.5, 40"), Ok(Vec2::new(12.5, 40.0)));
        assert!(parse_point("12").is_err());
        assert!(parse_point("a,b").is_err());
        assert!(parse_point("inf,0").is_err());
    }

    #[test]
    fn render_arguments_accept_repeated_clicks() {
        let args = CliArgs::try_parse_from([
            "hexgrid", "render", "--click", "1,2", "--click", "3,4", "--zoom-in", "2",
        ])
        .expect("valid arguments");

        let CliCommand::Render(render) = args.command else {
            panic!("expected render subcommand");
        };
        assert_eq!(render.click, vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]);
        assert_eq!(render.zoom_in, 2);
        assert_eq!(render.width, 800);
    }

    #[test]
    fn view_vsync_can_be_disabled() {
        let args = CliArgs::try_parse_from(["hexgrid", "view", "--vsync", "false"])
            .expect("valid arguments");

        assert!(matches!(args.command, CliCommand::View(ViewArgs { vsync: false, .. })));
    }
}
