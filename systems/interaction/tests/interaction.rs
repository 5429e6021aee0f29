use glam::Vec2;
use hexgrid_core::{CellIndex, Color, Command, Direction, Style, ZoomDirection};
use hexgrid_system_interaction::{Interaction, InteractionConfig, InteractionInput};

fn step(cell: CellIndex, direction: Direction) -> Option<CellIndex> {
    cell.neighbor(direction)
}

#[test]
fn click_highlights_bottom_left_neighbour() {
    let interaction = Interaction::default();
    let mut commands = Vec::new();

    interaction.handle(
        InteractionInput::new(Some(Vec2::new(10.0, 20.0)), None),
        |_| Some(CellIndex::new(0, 0)),
        step,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::Restyle {
            cell: CellIndex::new(-1, 1),
            style: Style::new(Color::from_rgb(0, 132, 180), Color::from_rgb(0x33, 0, 0), 2),
        }],
        "a click should restyle the bottom-left neighbour with the highlight",
    );
}

#[test]
fn click_uses_configured_target_and_style() {
    let highlight = Style::new(Color::WHITE, Color::BLACK, 5);
    let interaction = Interaction::new(InteractionConfig {
        highlight,
        target: Direction::Right,
    });
    let mut commands = Vec::new();

    interaction.handle(
        InteractionInput::new(Some(Vec2::ZERO), None),
        |_| Some(CellIndex::new(3, 3)),
        step,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::Restyle {
            cell: CellIndex::new(4, 3),
            style: highlight,
        }]
    );
}

#[test]
fn click_without_hit_or_neighbour_is_ignored() {
    let interaction = Interaction::default();
    let mut commands = Vec::new();

    interaction.handle(
        InteractionInput::new(Some(Vec2::ZERO), None),
        |_| None,
        step,
        &mut commands,
    );
    interaction.handle(
        InteractionInput::new(Some(Vec2::ZERO), None),
        |_| Some(CellIndex::new(0, 5)),
        |_, _| None,
        &mut commands,
    );

    assert!(
        commands.is_empty(),
        "missing cells must not produce restyle commands"
    );
}

#[test]
fn wheel_sign_selects_zoom_direction() {
    let interaction = Interaction::default();
    let mut commands = Vec::new();

    for delta in [-3.0, 0.0, 120.0] {
        interaction.handle(
            InteractionInput::new(None, Some(delta)),
            |_| None,
            step,
            &mut commands,
        );
    }

    assert_eq!(
        commands,
        vec![
            Command::Zoom {
                direction: ZoomDirection::In
            },
            Command::Zoom {
                direction: ZoomDirection::Out
            },
        ],
        "zero deltas must be ignored",
    );
}

#[test]
fn click_is_handled_before_wheel() {
    let interaction = Interaction::default();
    let mut commands = Vec::new();

    interaction.handle(
        InteractionInput::new(Some(Vec2::ZERO), Some(-1.0)),
        |_| Some(CellIndex::new(1, 1)),
        step,
        &mut commands,
    );

    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[0], Command::Restyle { cell, .. } if cell == CellIndex::new(1, 2)));
    assert!(matches!(commands[1], Command::Zoom { .. }));
}

#[test]
fn config_deserializes_with_defaults() {
    let config: InteractionConfig =
        toml::from_str(r#"target = "top_right""#).expect("valid config");

    assert_eq!(config.target, Direction::TopRight);
    assert_eq!(config.highlight, InteractionConfig::default().highlight);
}
