#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure classification system that assigns a [`Style`] to every cell index.
//!
//! A [`StyleRuleEngine`] evaluates an ordered list of [`CreationRule`]s. The
//! matching rule with the highest priority wins; among equal priorities the
//! rule declared first wins. Indices matched by no rule receive the engine's
//! default style.

use std::fmt;

use hexgrid_core::{CellIndex, Style};
use serde::{Deserialize, Serialize};

/// Predicate mapping a cell index to the style it should adopt, if any.
pub type RulePredicate = Box<dyn Fn(CellIndex) -> Option<Style>>;

/// Priority-ranked predicate used when the grid is filled.
pub struct CreationRule {
    priority: i32,
    predicate: RulePredicate,
}

impl CreationRule {
    /// Creates a rule from an arbitrary predicate.
    pub fn new<F>(priority: i32, predicate: F) -> Self
    where
        F: Fn(CellIndex) -> Option<Style> + 'static,
    {
        Self {
            priority,
            predicate: Box::new(predicate),
        }
    }

    /// Creates a rule that applies `style` wherever `shape` contains the index.
    #[must_use]
    pub fn from_shape(priority: i32, shape: RuleShape, style: Style) -> Self {
        Self::new(priority, move |index| shape.contains(index).then_some(style))
    }

    /// Priority used to rank this rule against other matches.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Evaluates the rule for a single index.
    #[must_use]
    pub fn evaluate(&self, index: CellIndex) -> Option<Style> {
        (self.predicate)(index)
    }
}

impl fmt::Debug for CreationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreationRule")
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl From<RuleSpec> for CreationRule {
    fn from(spec: RuleSpec) -> Self {
        Self::from_shape(spec.priority, spec.shape, spec.style)
    }
}

/// Declarative region of the index space matched by a configured rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleShape {
    /// Every index.
    Everywhere,
    /// Indices on the rectangle `|x| == x_extent` or `|y| == y_extent`.
    Border {
        /// Absolute column of the vertical edges.
        x_extent: i32,
        /// Absolute row of the horizontal edges.
        y_extent: i32,
    },
    /// Indices on the row or column passing through the origin.
    Axes,
    /// A single index.
    Cell {
        /// Column of the cell.
        x: i32,
        /// Row of the cell.
        y: i32,
    },
    /// Every index on one row.
    Row {
        /// Row to match.
        y: i32,
    },
    /// Every index in one column.
    Column {
        /// Column to match.
        x: i32,
    },
    /// Indices whose coordinates sum to an even number.
    Checkerboard,
}

impl RuleShape {
    /// Reports whether the shape contains the index.
    #[must_use]
    pub fn contains(&self, index: CellIndex) -> bool {
        let (x, y) = (index.x(), index.y());
        match *self {
            Self::Everywhere => true,
            Self::Border { x_extent, y_extent } => x.abs() == x_extent || y.abs() == y_extent,
            Self::Axes => x == 0 || y == 0,
            Self::Cell { x: cell_x, y: cell_y } => x == cell_x && y == cell_y,
            Self::Row { y: row } => y == row,
            Self::Column { x: column } => x == column,
            Self::Checkerboard => (x + y).rem_euclid(2) == 0,
        }
    }
}

/// Serializable description of a shape-based creation rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    /// Priority used to rank the rule.
    pub priority: i32,
    /// Region matched by the rule.
    pub shape: RuleShape,
    /// Style applied to matched indices.
    pub style: Style,
}

/// Classifies cell indices by evaluating prioritized creation rules.
#[derive(Debug)]
pub struct StyleRuleEngine {
    rules: Vec<CreationRule>,
    default_style: Style,
}

impl StyleRuleEngine {
    /// Creates an engine over `rules`, falling back to `default_style`.
    ///
    /// Returns an error when no rules are provided.
    pub fn new(rules: Vec<CreationRule>, default_style: Style) -> Result<Self, RuleSetError> {
        if rules.is_empty() {
            return Err(RuleSetError::Empty);
        }

        Ok(Self {
            rules,
            default_style,
        })
    }

    /// Style applied when no rule matches.
    #[must_use]
    pub const fn default_style(&self) -> Style {
        self.default_style
    }

    /// Number of rules evaluated per index; never zero.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Selects the style for `index`.
    #[must_use]
    pub fn classify(&self, index: CellIndex) -> Style {
        let mut selected: Option<(i32, Style)> = None;

        for rule in &self.rules {
            let Some(style) = rule.evaluate(index) else {
                continue;
            };

            // strictly greater keeps the first declared rule among equals
            let wins = selected.map_or(true, |(priority, _)| rule.priority() > priority);
            if wins {
                selected = Some((rule.priority(), style));
            }
        }

        selected.map_or(self.default_style, |(_, style)| style)
    }
}

/// Errors that can occur when assembling a rule set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleSetError {
    /// At least one creation rule is required.
    #[error("at least one creation rule is required")]
    Empty,
}
