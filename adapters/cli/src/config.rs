//! TOML settings file for the CLI.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use hexgrid_core::{Color, Style};
use hexgrid_system_interaction::InteractionConfig;
use hexgrid_system_style_rules::{RuleShape, RuleSpec};
use hexgrid_world::GridConfig;
use serde::Deserialize;

/// Everything needed to build a session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) grid: GridConfig,
    pub(crate) rules: Vec<RuleSpec>,
    pub(crate) interaction: InteractionConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    grid: GridConfig,
    rules: Option<Vec<RuleSpec>>,
    interaction: InteractionConfig,
}

impl Settings {
    /// Reads settings from `path`, or returns the built-in defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            log::debug!("no settings file given, using defaults");
            return Ok(Self::from_file(SettingsFile::default()));
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings = Self::parse(&text)
            .with_context(|| format!("failed to parse settings from {}", path.display()))?;
        log::info!(
            "loaded {} creation rules from {}",
            settings.rules.len(),
            path.display()
        );
        Ok(settings)
    }

    fn parse(text: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(text)?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: SettingsFile) -> Self {
        let SettingsFile {
            grid,
            rules,
            interaction,
        } = file;
        let rules = rules.unwrap_or_else(|| default_rules(&grid));

        Self {
            grid,
            rules,
            interaction,
        }
    }
}

/// Demo rule set: a green field framed by an outlined border, highlighted
/// axes, and a hole punched at the origin.
fn default_rules(grid: &GridConfig) -> Vec<RuleSpec> {
    let outline = Color::from_rgb(0x12, 0x34, 0x56);
    let accent = Style::new(outline, Color::from_rgb(0xfe, 0xdc, 0xba), 1);
    let x_extent = i32::try_from(grid.x_count).unwrap_or(i32::MAX) - 1;
    let y_extent = i32::try_from(grid.y_count).unwrap_or(i32::MAX) - 1;

    vec![
        RuleSpec {
            priority: -1,
            shape: RuleShape::Everywhere,
            style: Style::new(outline, Color::from_rgb(0xaa, 0xfe, 0x96), 1),
        },
        RuleSpec {
            priority: 1,
            shape: RuleShape::Border { x_extent, y_extent },
            style: accent,
        },
        RuleSpec {
            priority: 0,
            shape: RuleShape::Axes,
            style: accent,
        },
        RuleSpec {
            priority: 2,
            shape: RuleShape::Cell { x: 0, y: 0 },
            style: Style::new(Color::TRANSPARENT, Color::TRANSPARENT, 1).with_invisible(true),
        },
    ]
}
