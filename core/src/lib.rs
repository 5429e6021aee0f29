#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the hex grid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative grid, and pure systems. Adapters translate pointer input
//! into [`Command`] values, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that decide
//! whether a full redraw or a localized cell update is required.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Relative change applied to the cell diameter by a single zoom step.
pub const ZOOM_STEP: f32 = 0.1;

/// Smallest cell diameter the grid accepts, in surface pixels.
pub const MIN_CELL_DIAMETER: f32 = 2.0;

/// Commands that express all permissible grid mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the complete cell set by classifying every index in range.
    FillGrid,
    /// Rescales the cell diameter by one geometric zoom step.
    Zoom {
        /// Whether the grid grows or shrinks.
        direction: ZoomDirection,
    },
    /// Multiplies the cell diameter by an arbitrary factor.
    ScaleCellDiameter {
        /// Multiplier applied to the current diameter.
        factor: f32,
    },
    /// Replaces the cell diameter outright.
    SetCellDiameter {
        /// New diameter measured in surface pixels.
        diameter: f32,
    },
    /// Replaces the style of a single cell.
    Restyle {
        /// Index of the cell to restyle.
        cell: CellIndex,
        /// Style the cell should adopt.
        style: Style,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the cell set was regenerated.
    GridFilled {
        /// Number of cells produced by the sweep.
        cell_count: usize,
    },
    /// Reports that the cell diameter changed and every centre moved.
    CellDiameterChanged {
        /// Diameter before the command was applied.
        previous: f32,
        /// Diameter after the command was applied.
        current: f32,
    },
    /// Confirms that a single cell adopted a new style.
    CellRestyled {
        /// Index of the restyled cell.
        cell: CellIndex,
        /// Style the cell held before the command.
        previous: Style,
        /// Style the cell holds now.
        current: Style,
    },
    /// Reports that a restyle targeted an index outside the grid.
    RestyleRejected {
        /// Index that failed to resolve to a cell.
        cell: CellIndex,
    },
}

/// Direction of a single zoom step derived from a wheel gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZoomDirection {
    /// Grow the cells.
    In,
    /// Shrink the cells.
    Out,
}

impl ZoomDirection {
    /// Classifies a signed wheel delta. Only the sign is used: negative
    /// deltas zoom in, positive deltas zoom out and zero is ignored.
    #[must_use]
    pub fn from_wheel_delta(delta: f32) -> Option<Self> {
        if delta < 0.0 {
            Some(Self::In)
        } else if delta > 0.0 {
            Some(Self::Out)
        } else {
            None
        }
    }

    /// Multiplier applied to the cell diameter for this direction.
    #[must_use]
    pub fn factor(self) -> f32 {
        match self {
            Self::In => 1.0 + ZOOM_STEP,
            Self::Out => 1.0 - ZOOM_STEP,
        }
    }
}

/// RGBA color used for strokes and fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::from_rgba(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    /// Creates an opaque color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba(red, green, blue, 255)
    }

    /// Creates a color from byte RGBA components.
    #[must_use]
    pub const fn from_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Alpha component of the color.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Reports whether painting with this color leaves the surface unchanged.
    #[must_use]
    pub const fn is_transparent(&self) -> bool {
        self.alpha == 0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)?;
        if self.alpha != 255 {
            write!(f, "{:02x}", self.alpha)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let lowered = trimmed.to_ascii_lowercase();

        match lowered.as_str() {
            "transparent" => return Ok(Self::TRANSPARENT),
            "white" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            _ => {}
        }

        if let Some(hex) = lowered.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(trimmed.to_owned()));
        }

        if let Some(body) = lowered
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_channels(body, true);
        }

        if let Some(body) = lowered
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_channels(body, false);
        }

        Err(ColorParseError::Unrecognized(trimmed.to_owned()))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|digit| digit.is_ascii_hexdigit()) {
        return None;
    }

    let byte = |start: usize, len: usize| u8::from_str_radix(hex.get(start..start + len)?, 16).ok();

    match hex.len() {
        3 => Some(Color::from_rgb(
            byte(0, 1)? * 17,
            byte(1, 1)? * 17,
            byte(2, 1)? * 17,
        )),
        6 => Some(Color::from_rgb(byte(0, 2)?, byte(2, 2)?, byte(4, 2)?)),
        8 => Some(Color::from_rgba(
            byte(0, 2)?,
            byte(2, 2)?,
            byte(4, 2)?,
            byte(6, 2)?,
        )),
        _ => None,
    }
}

fn parse_channels(body: &str, with_alpha: bool) -> Result<Color, ColorParseError> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return Err(ColorParseError::ChannelCount {
            expected,
            found: parts.len(),
        });
    }

    let channel = |part: &str| {
        part.parse::<u8>()
            .map_err(|_| ColorParseError::InvalidChannel(part.to_owned()))
    };
    let red = channel(parts[0])?;
    let green = channel(parts[1])?;
    let blue = channel(parts[2])?;

    let alpha = if with_alpha {
        let raw = parts[3];
        let alpha: f32 = raw
            .parse()
            .map_err(|_| ColorParseError::InvalidChannel(raw.to_owned()))?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ColorParseError::InvalidChannel(raw.to_owned()));
        }
        (alpha * 255.0).round() as u8
    } else {
        255
    };

    Ok(Color::from_rgba(red, green, blue, alpha))
}

/// Errors produced when parsing a color string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    /// The value started with `#` but was not 3, 6 or 8 hex digits.
    #[error("invalid hex color {0:?}")]
    InvalidHex(String),
    /// A functional color listed the wrong number of channels.
    #[error("expected {expected} color channels, found {found}")]
    ChannelCount {
        /// Number of channels required by the notation.
        expected: usize,
        /// Number of channels present in the value.
        found: usize,
    },
    /// A channel was not a valid integer (or alpha fraction).
    #[error("invalid color channel {0:?}")]
    InvalidChannel(String),
    /// The value matched none of the supported notations.
    #[error("unrecognized color {0:?}")]
    Unrecognized(String),
}

/// Display attributes of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Style {
    /// Stroke color of the hexagon outline.
    pub color: Color,
    /// Fill color of the hexagon and of its background patches.
    pub background_color: Color,
    /// Foreground draw order; higher layers paint over lower ones.
    #[serde(default)]
    pub layer: u32,
    /// Invisible cells draw no foreground polygon.
    #[serde(default)]
    pub invisible: bool,
}

impl Style {
    /// Creates a visible style.
    #[must_use]
    pub const fn new(color: Color, background_color: Color, layer: u32) -> Self {
        Self {
            color,
            background_color,
            layer,
            invisible: false,
        }
    }

    /// Returns a copy of the style with the provided visibility.
    #[must_use]
    pub const fn with_invisible(self, invisible: bool) -> Self {
        Self { invisible, ..self }
    }
}

/// Logical position of a hexagon within the grid.
///
/// Rows with odd `y` are shifted right by half a cell so neighbouring rows
/// interlock. Ordering is lexicographic on `(x, y)`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellIndex {
    x: i32,
    y: i32,
}

impl CellIndex {
    /// Creates a new cell index.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell within its row.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Reports whether the cell lies on a row carrying the zigzag offset.
    #[must_use]
    pub const fn is_odd_row(&self) -> bool {
        self.y.rem_euclid(2) == 1
    }

    /// Column with the zigzag removed, used for diagonal lookups.
    ///
    /// Returns `None` when the shift leaves the `i32` range.
    #[must_use]
    pub const fn straightened_x(&self) -> Option<i32> {
        if self.is_odd_row() {
            Some(self.x)
        } else {
            self.x.checked_sub(1)
        }
    }

    /// Index reached by stepping once in `direction`.
    ///
    /// No grid bounds are applied; `None` means the step leaves the `i32`
    /// coordinate space.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<Self> {
        let (x, y) = match direction {
            Direction::Left => (self.x.checked_sub(1)?, self.y),
            Direction::Right => (self.x.checked_add(1)?, self.y),
            Direction::TopLeft => (self.straightened_x()?, self.y.checked_sub(1)?),
            Direction::TopRight => (
                self.straightened_x()?.checked_add(1)?,
                self.y.checked_sub(1)?,
            ),
            Direction::BottomLeft => (self.straightened_x()?, self.y.checked_add(1)?),
            Direction::BottomRight => (
                self.straightened_x()?.checked_add(1)?,
                self.y.checked_add(1)?,
            ),
            Direction::TwoRowsDown => (self.x, self.y.checked_add(2)?),
        };
        Some(Self::new(x, y))
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Directions used for neighbour lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Previous cell on the same row.
    Left,
    /// Next cell on the same row.
    Right,
    /// Upper-left diagonal neighbour.
    TopLeft,
    /// Upper-right diagonal neighbour.
    TopRight,
    /// Lower-left diagonal neighbour.
    BottomLeft,
    /// Lower-right diagonal neighbour.
    BottomRight,
    /// Cell directly below, two rows down on the same parity.
    TwoRowsDown,
}

impl Direction {
    /// The six directions sharing an edge with a hexagon, clockwise from `Right`.
    pub const HEXAGONAL: [Self; 6] = [
        Self::Right,
        Self::BottomRight,
        Self::BottomLeft,
        Self::Left,
        Self::TopLeft,
        Self::TopRight,
    ];

    /// Direction that undoes a step in this direction.
    ///
    /// `TwoRowsDown` has no counterpart in the direction set.
    #[must_use]
    pub const fn opposite(self) -> Option<Self> {
        match self {
            Self::Left => Some(Self::Right),
            Self::Right => Some(Self::Left),
            Self::TopLeft => Some(Self::BottomRight),
            Self::TopRight => Some(Self::BottomLeft),
            Self::BottomLeft => Some(Self::TopRight),
            Self::BottomRight => Some(Self::TopLeft),
            Self::TwoRowsDown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CellIndex, Color, ColorParseError, Direction, Style, ZoomDirection};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn hexagonal_steps_are_undone_by_their_opposites() {
        for y in -4..=4 {
            for x in -4..=4 {
                let cell = CellIndex::new(x, y);
                for direction in Direction::HEXAGONAL {
                    let opposite = direction.opposite().expect("hex directions have opposites");
                    assert_eq!(
                        cell.neighbor(direction)
                            .and_then(|next| next.neighbor(opposite)),
                        Some(cell),
                        "stepping {direction:?} then {opposite:?} from {cell} must return",
                    );
                }
            }
        }
    }

    #[test]
    fn bottom_diagonals_follow_straightened_column() {
        let even = CellIndex::new(3, 2);
        assert_eq!(even.straightened_x(), Some(2));
        assert_eq!(even.neighbor(Direction::BottomLeft), Some(CellIndex::new(2, 3)));
        assert_eq!(even.neighbor(Direction::BottomRight), Some(CellIndex::new(3, 3)));

        let odd = CellIndex::new(3, -1);
        assert!(odd.is_odd_row());
        assert_eq!(odd.neighbor(Direction::BottomLeft), Some(CellIndex::new(3, 0)));
        assert_eq!(odd.neighbor(Direction::BottomRight), Some(CellIndex::new(4, 0)));
    }

    #[test]
    fn two_rows_down_keeps_column() {
        let cell = CellIndex::new(-2, 1);
        assert_eq!(cell.neighbor(Direction::TwoRowsDown), Some(CellIndex::new(-2, 3)));
        assert_eq!(Direction::TwoRowsDown.opposite(), None);
    }

    #[test]
    fn steps_off_the_coordinate_space_yield_none() {
        let right_edge = CellIndex::new(i32::MAX, 1);
        assert_eq!(right_edge.neighbor(Direction::Right), None);
        assert_eq!(right_edge.neighbor(Direction::TopRight), None);
        assert_eq!(
            right_edge.neighbor(Direction::Left),
            Some(CellIndex::new(i32::MAX - 1, 1))
        );

        let left_edge = CellIndex::new(i32::MIN, 0);
        assert_eq!(left_edge.straightened_x(), None);
        assert_eq!(left_edge.neighbor(Direction::Left), None);
        assert_eq!(left_edge.neighbor(Direction::BottomLeft), None);
        assert_eq!(
            left_edge.neighbor(Direction::Right),
            Some(CellIndex::new(i32::MIN + 1, 0))
        );

        let bottom = CellIndex::new(0, i32::MAX - 1);
        assert_eq!(bottom.neighbor(Direction::TwoRowsDown), None);
        assert_eq!(
            bottom.neighbor(Direction::BottomLeft),
            Some(CellIndex::new(-1, i32::MAX))
        );
        assert_eq!(CellIndex::new(0, i32::MIN).neighbor(Direction::TopLeft), None);
    }

    #[test]
    fn cell_index_orders_lexicographically() {
        assert!(CellIndex::new(-1, 5) < CellIndex::new(0, -5));
        assert!(CellIndex::new(0, -5) < CellIndex::new(0, 4));
    }

    #[test]
    fn zoom_direction_uses_wheel_sign_only() {
        assert_eq!(ZoomDirection::from_wheel_delta(-120.0), Some(ZoomDirection::In));
        assert_eq!(ZoomDirection::from_wheel_delta(0.5), Some(ZoomDirection::Out));
        assert_eq!(ZoomDirection::from_wheel_delta(0.0), None);
        assert!((ZoomDirection::In.factor() - 1.1).abs() < f32::EPSILON);
        assert!((ZoomDirection::Out.factor() - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn colors_parse_from_css_notations() {
        assert_eq!("#eee".parse::<Color>(), Ok(Color::from_rgb(0xee, 0xee, 0xee)));
        assert_eq!("#AAFE96".parse::<Color>(), Ok(Color::from_rgb(0xaa, 0xfe, 0x96)));
        assert_eq!(
            "rgb(0, 132, 180)".parse::<Color>(),
            Ok(Color::from_rgb(0, 132, 180))
        );
        assert_eq!(
            "rgba(10, 20, 30, 0.5)".parse::<Color>(),
            Ok(Color::from_rgba(10, 20, 30, 128))
        );
        assert_eq!("transparent".parse::<Color>(), Ok(Color::TRANSPARENT));
        assert!(Color::TRANSPARENT.is_transparent());
    }

    #[test]
    fn colors_reject_malformed_values() {
        assert!(matches!(
            "#12345".parse::<Color>(),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(matches!(
            "rgb(1, 2)".parse::<Color>(),
            Err(ColorParseError::ChannelCount {
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            "rgb(1, 2, 300)".parse::<Color>(),
            Err(ColorParseError::InvalidChannel(_))
        ));
        assert!(matches!(
            "chartreuse".parse::<Color>(),
            Err(ColorParseError::Unrecognized(_))
        ));
    }

    #[test]
    fn colors_display_as_hex() {
        assert_eq!(Color::from_rgb(0x12, 0x34, 0x56).to_string(), "#123456");
        assert_eq!(Color::from_rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn style_round_trips_through_bincode() {
        let style = Style::new(
            Color::from_rgb(0, 132, 180),
            Color::from_rgba(0x33, 0, 0, 0x80),
            2,
        )
        .with_invisible(true);
        assert_round_trip(&style);
    }

    #[test]
    fn direction_round_trips_through_bincode() {
        assert_round_trip(&Direction::BottomLeft);
    }
}
