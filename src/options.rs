//! View configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetGridError};
use crate::types::{Color, GridStyle, Size};

/// Wraparound scrolling configuration.
///
/// `repetition_step` and `recenter_fraction` are empirical tuning constants:
/// the repetition factor starts at `repetition_step` and grows by it until
/// there is enough duplicated content, and the offset is recentered once it
/// drifts more than `recenter_fraction` of the virtual content away from the
/// center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CircularOptions {
    pub horizontal: bool,
    pub vertical: bool,
    pub repetition_step: usize,
    pub recenter_fraction: f64,
}

impl CircularOptions {
    pub const DEFAULT_REPETITION_STEP: usize = 3;
    pub const DEFAULT_RECENTER_FRACTION: f64 = 0.25;

    pub fn both() -> Self {
        Self {
            horizontal: true,
            vertical: true,
            ..Self::default()
        }
    }

    pub fn horizontal() -> Self {
        Self {
            horizontal: true,
            ..Self::default()
        }
    }

    pub fn vertical() -> Self {
        Self {
            vertical: true,
            ..Self::default()
        }
    }
}

impl Default for CircularOptions {
    fn default() -> Self {
        Self {
            horizontal: false,
            vertical: false,
            repetition_step: Self::DEFAULT_REPETITION_STEP,
            recenter_fraction: Self::DEFAULT_RECENTER_FRACTION,
        }
    }
}

/// Options for a [`crate::GridView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Gap between adjacent cells; gridlines are centred in it.
    pub intercell_spacing: Size,
    /// Style used for edges whose cells request `GridStyle::Default`.
    pub grid_style: GridStyle,
    pub circular: CircularOptions,
    /// Maximum cached span sizes (0 disables the cache).
    pub span_cache_capacity: usize,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            intercell_spacing: Size::ZERO,
            grid_style: GridStyle::solid(1.0, Color::GRID_LINE),
            circular: CircularOptions::default(),
            span_cache_capacity: 4096,
        }
    }
}

impl GridOptions {
    /// Parse options from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// [`SheetGridError::Json`] for malformed JSON, [`SheetGridError::InvalidOptions`]
    /// for values [`validate`](Self::validate) rejects.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// # Errors
    /// [`SheetGridError::InvalidOptions`] for negative spacing, a zero
    /// repetition step, or a recenter fraction outside `(0, 0.5]`.
    pub fn validate(&self) -> Result<()> {
        let spacing = self.intercell_spacing;
        if !(spacing.width.is_finite() && spacing.height.is_finite())
            || spacing.width < 0.0
            || spacing.height < 0.0
        {
            return Err(SheetGridError::InvalidOptions(format!(
                "intercell spacing must be finite and non-negative, got {}x{}",
                spacing.width, spacing.height
            )));
        }
        if self.circular.repetition_step == 0 {
            return Err(SheetGridError::InvalidOptions(
                "circular repetition step must be at least 1".to_string(),
            ));
        }
        let fraction = self.circular.recenter_fraction;
        if !(fraction > 0.0 && fraction <= 0.5) {
            return Err(SheetGridError::InvalidOptions(format!(
                "circular recenter fraction must be in (0, 0.5], got {fraction}"
            )));
        }
        Ok(())
    }
}
