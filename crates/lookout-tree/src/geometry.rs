//! Points on paint bounds.

use kurbo::{Point, Rect};
use lookout_protocol::OffsetType;

/// Returns the requested corner or centre of `bounds`.
#[must_use]
pub fn offset_of(bounds: Rect, offset_type: OffsetType) -> Point {
    match offset_type {
        OffsetType::TopLeft => Point::new(bounds.x0, bounds.y0),
        OffsetType::TopRight => Point::new(bounds.x1, bounds.y0),
        OffsetType::BottomLeft => Point::new(bounds.x0, bounds.y1),
        OffsetType::BottomRight => Point::new(bounds.x1, bounds.y1),
        OffsetType::Center => bounds.center(),
    }
}
