use serde::{Deserialize, Serialize};

use super::Color;

/// Style requested for one edge of a cell's gridlines.
///
/// Adjacent cells may request different styles for the edge they share; the
/// request with the higher [`priority`](GridStyle::priority) wins.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    /// Fall back to the view-wide default style.
    #[default]
    Default,
    /// Explicitly no line.
    None,
    /// Explicit solid line.
    Solid { width: f64, color: Color },
}

impl GridStyle {
    pub const PRIORITY_DEFAULT: u32 = 0;
    pub const PRIORITY_NONE: u32 = 100;
    pub const PRIORITY_SOLID: u32 = 200;

    pub const fn solid(width: f64, color: Color) -> Self {
        Self::Solid { width, color }
    }

    pub fn priority(&self) -> u32 {
        match self {
            Self::Default => Self::PRIORITY_DEFAULT,
            Self::None => Self::PRIORITY_NONE,
            Self::Solid { .. } => Self::PRIORITY_SOLID,
        }
    }

    /// Width and color after resolving `Default` against the view-wide style.
    ///
    /// A `Default` fallback that is itself `Default` resolves to no line.
    pub fn resolve(&self, fallback: &GridStyle) -> (f64, Color) {
        match self {
            Self::Solid { width, color } => (*width, *color),
            Self::None => (0.0, Color::default()),
            Self::Default => match fallback {
                Self::Solid { width, color } => (*width, *color),
                Self::None | Self::Default => (0.0, Color::default()),
            },
        }
    }
}

/// Gridline requests for the four edges of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Gridlines {
    pub top: GridStyle,
    pub bottom: GridStyle,
    pub left: GridStyle,
    pub right: GridStyle,
}

impl Gridlines {
    pub const fn all(style: GridStyle) -> Self {
        Self {
            top: style,
            bottom: style,
            left: style,
            right: style,
        }
    }
}

/// Style of one border edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    None,
    Solid { width: f64, color: Color },
}

impl BorderStyle {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Get border width (0 for no border).
    pub fn width(&self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Solid { width, .. } => *width,
        }
    }
}

/// Borders drawn over a cell, independent of gridlines.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Borders {
    pub top: BorderStyle,
    pub bottom: BorderStyle,
    pub left: BorderStyle,
    pub right: BorderStyle,
}

impl Borders {
    pub const fn all(style: BorderStyle) -> Self {
        Self {
            top: style,
            bottom: style,
            left: style,
            right: style,
        }
    }

    /// True if any edge has a border.
    pub fn has_border(&self) -> bool {
        !(self.top.is_none() && self.bottom.is_none() && self.left.is_none() && self.right.is_none())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_priorities_are_ordered() {
        assert!(GridStyle::Default.priority() < GridStyle::None.priority());
        assert!(GridStyle::None.priority() < GridStyle::solid(1.0, Color::BLACK).priority());
    }

    #[test]
    fn test_default_resolves_through_fallback() {
        let fallback = GridStyle::solid(2.0, Color::WHITE);
        assert_eq!(GridStyle::Default.resolve(&fallback), (2.0, Color::WHITE));
        assert_eq!(GridStyle::None.resolve(&fallback).0, 0.0);
        assert_eq!(GridStyle::Default.resolve(&GridStyle::None).0, 0.0);
    }

    #[test]
    fn test_grid_style_serde() {
        let style: GridStyle =
            serde_json::from_str(r##"{"solid":{"width":1.5,"color":"#FF0000"}}"##).unwrap();
        assert_eq!(style, GridStyle::solid(1.5, Color::rgb(255, 0, 0)));
        let none: GridStyle = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(none, GridStyle::None);
    }

    #[test]
    fn test_has_border() {
        assert!(!Borders::default().has_border());
        let borders = Borders {
            left: BorderStyle::Solid {
                width: 1.0,
                color: Color::BLACK,
            },
            ..Borders::default()
        };
        assert!(borders.has_border());
    }
}
