//! Screen-space placement of floating panels.
//!
//! Everything here is pure and total over finite input: a viewport that is
//! too small (or even zero/negative) never produces an error, the result just
//! degrades to the margin-clamped position.

use crate::core::geo::{Point, Size};
use serde::{Deserialize, Serialize};

/// How a panel that would overflow the viewport is brought back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementPolicy {
    /// Flip to the other side of the anchor (`anchor - size - margin`).
    Flip,
    /// Slide inside the far edge (`extent - size - margin`).
    Shift,
}

/// Clamps a panel anchored at `anchor` so its footprint stays within the
/// viewport, flipping it backward on any axis where it would overflow.
pub fn clamp_to_viewport(anchor: Point, panel: Size, margin: f64, viewport: Size) -> Point {
    place(anchor, panel, margin, viewport, PlacementPolicy::Flip)
}

/// Places a panel with the given overflow policy. Axes are independent.
pub fn place(
    anchor: Point,
    panel: Size,
    margin: f64,
    viewport: Size,
    policy: PlacementPolicy,
) -> Point {
    Point::new(
        place_axis(anchor.x, panel.width, margin, viewport.width, policy),
        place_axis(anchor.y, panel.height, margin, viewport.height, policy),
    )
}

fn place_axis(anchor: f64, size: f64, margin: f64, extent: f64, policy: PlacementPolicy) -> f64 {
    let far_limit = extent - size - margin;
    let mut pos = anchor;
    if anchor + size + margin > extent {
        pos = match policy {
            PlacementPolicy::Flip => anchor - size - margin,
            PlacementPolicy::Shift => far_limit,
        };
        // an anchor already past the far edge can still overflow after flipping
        pos = pos.min(far_limit);
    }
    pos.max(margin)
}
