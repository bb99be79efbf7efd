//! Deterministic card layout.
//!
//! Both layouts are pure functions of the input positions so they can be
//! computed ahead of sending anything to the server.

use crate::card::Position;

/// Positions for `count` cards fanned out in a single row.
///
/// Card `i` sits at `(i * spacing, 0)`; there is never a gap, whatever was
/// removed before.
pub fn hand_positions(count: usize, spacing: i32) -> Vec<Position> {
    (0..count)
        .map(|i| Position::new(i as i32 * spacing, 0))
        .collect()
}

/// Leftmost position of a selection. Ties keep the first card encountered.
pub fn rearrange_anchor(current: &[Position]) -> Option<Position> {
    let mut iter = current.iter();
    let mut anchor = *iter.next()?;
    for pos in iter {
        if pos.x < anchor.x {
            anchor = *pos;
        }
    }
    Some(anchor)
}

/// Target positions for rearranging a selection on the table.
///
/// The grid is anchored at the leftmost card and wraps every three rows:
/// card `i` (in selection order) goes to
/// `(x0 + i * raster_width, y0 + (i % 3) * raster_height)`.
pub fn rearrange_positions(
    current: &[Position],
    raster_width: i32,
    raster_height: i32,
) -> Vec<Position> {
    let Some(anchor) = rearrange_anchor(current) else {
        return Vec::new();
    };

    (0..current.len())
        .map(|i| {
            Position::new(
                anchor.x + i as i32 * raster_width,
                anchor.y + (i % 3) as i32 * raster_height,
            )
        })
        .collect()
}
