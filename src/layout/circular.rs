//! Wraparound scrolling.
//!
//! A circular axis lays out its scrollable range `factor` times over, starts
//! scrolled to the middle of that virtual content, and is silently pulled back
//! toward the middle whenever it drifts too far, so the user never reaches a
//! real edge.

/// How many viewports' worth of duplicated content a circular axis keeps.
const VIEWPORT_COVERAGE: f64 = 3.0;

/// Repetition factor for one axis.
///
/// Starts at `step` and grows by `step` until `content * factor` covers
/// `viewport * 3`. Returns 1 (no repetition) when there is no content.
pub fn repetition_factor(content: f64, viewport: f64, step: usize) -> usize {
    if !(content > 0.0) || !content.is_finite() || step == 0 {
        return 1;
    }
    let needed = viewport.max(0.0) * VIEWPORT_COVERAGE;
    if !needed.is_finite() {
        return step;
    }
    let mut factor = step;
    while content * (factor as f64) < needed {
        factor += step;
    }
    factor
}

/// Offset of the middle of the virtual content: one content cycle scaled by
/// `factor / step`.
pub fn center_offset(cycle: f64, factor: usize, step: usize) -> f64 {
    if step == 0 {
        return 0.0;
    }
    cycle * (factor as f64) / (step as f64)
}

/// New offset if `offset` has drifted more than `fraction * total` from
/// `center`, or `None` if it is still close enough.
///
/// The jump is exactly `center`, a whole number of content cycles, so the
/// visible content is unchanged.
pub fn recenter(offset: f64, center: f64, total: f64, fraction: f64) -> Option<f64> {
    let threshold = total * fraction;
    let distance = offset - center;
    if distance.abs() <= threshold || !(center > 0.0) {
        return None;
    }
    let adjusted = if distance > 0.0 { offset - center } else { offset + center };
    tracing::debug!(offset, adjusted, center, total, "circular offset recentered");
    Some(adjusted)
}
