//! Reading-order utilities for word boxes.
//!
//! Words on a line are read left to right. Boxes are ordered by their left
//! edge, with the top edge as a tie-breaker so that the order is total and
//! stable for identical boxes.

use itertools::Itertools;
use std::cmp::Ordering;

use crate::processors::BoundingBox;

/// Compares two boxes in left-to-right reading order.
pub fn reading_order(a: &BoundingBox, b: &BoundingBox) -> Ordering {
    a.left()
        .cmp(&b.left())
        .then_with(|| a.top().cmp(&b.top()))
        .then_with(|| a.right().cmp(&b.right()))
}

/// Sorts items in reading order of their boxes.
///
/// The sort is stable, so items with identical boxes keep their input order.
///
/// # Arguments
///
/// * `items` - Items to sort in place.
/// * `bbox` - Extracts the box of an item.
pub fn sort_reading_order<T, F>(items: &mut [T], bbox: F)
where
    F: Fn(&T) -> &BoundingBox,
{
    items.sort_by(|a, b| reading_order(bbox(a), bbox(b)));
}

/// Finds the first pair of consecutive boxes that overlap horizontally.
///
/// # Returns
///
/// The index of the first box of the overlapping pair, if any.
pub fn first_horizontal_overlap<'a, I>(boxes: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a BoundingBox>,
{
    boxes
        .into_iter()
        .tuple_windows()
        .position(|(current, next)| current.horizontal_gap(next) < 0)
}
