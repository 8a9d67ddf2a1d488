//! Mirror operations on a single mark.
//!
//! A mirror reflects the mark's bounds about an axis (its own center unless
//! the caller names one), lets the variant mirror its content, and toggles
//! the render-side `mirrored` flag.

#[cfg(test)]
#[path = "mirror_test.rs"]
mod mirror_test;

use serde::{Deserialize, Serialize};

use crate::mark::Mark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorDirection {
    /// Flip left-to-right (reflect x).
    Horizontal,
    /// Flip top-to-bottom (reflect y).
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MirrorError {
    #[error("{0} marks cannot be mirrored")]
    Unsupported(&'static str),
    #[error("mark is locked against transformation")]
    Locked,
}

/// Check that `mark` may be mirrored at all.
pub fn validate(mark: &Mark) -> Result<(), MirrorError> {
    if !mark.kind.shape().supports_mirror() {
        return Err(MirrorError::Unsupported(mark.label()));
    }
    if mark.flags.lock_transform {
        return Err(MirrorError::Locked);
    }
    Ok(())
}

/// The caller's direction if given, otherwise the variant's default.
#[must_use]
pub fn choose_direction(mark: &Mark, explicit: Option<MirrorDirection>) -> MirrorDirection {
    explicit.unwrap_or_else(|| mark.kind.shape().default_mirror(&mark.bounds))
}

/// Mirror `mark` in `direction` about `axis` (world x for horizontal, world y
/// for vertical). `None` uses the mark's own center, leaving its position
/// unchanged.
pub fn mirror(mark: &mut Mark, direction: MirrorDirection, axis: Option<f64>) -> Result<(), MirrorError> {
    validate(mark)?;
    let center = mark.bounds.center();
    match direction {
        MirrorDirection::Horizontal => {
            let axis = axis.filter(|a| a.is_finite()).unwrap_or(center.x);
            mark.bounds.x = 2.0 * axis - mark.bounds.x - mark.bounds.width;
        }
        MirrorDirection::Vertical => {
            let axis = axis.filter(|a| a.is_finite()).unwrap_or(center.y);
            mark.bounds.y = 2.0 * axis - mark.bounds.y - mark.bounds.height;
        }
    }
    mark.kind.shape_mut().mirror_content(direction);
    mark.flags.mirrored = !mark.flags.mirrored;
    Ok(())
}
