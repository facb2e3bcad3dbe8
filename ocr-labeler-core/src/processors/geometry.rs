//! Geometric primitives for word and line boxes.
//!
//! Boxes live in page pixel space and use half-open edges: a box covers the
//! columns `left..right` and rows `top..bottom`. Splitting a box therefore
//! yields two boxes that share an edge but no pixel, and merging them gives the
//! original box back.

use serde::{Deserialize, Serialize};

use crate::core::{EditError, EditResult};

/// An axis-aligned bounding box in page pixel space.
///
/// Invariant: `top < bottom` and `left < right`. Every constructor and every
/// operation that produces a box checks it, including deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoxEdges", into = "BoxEdges")]
pub struct BoundingBox {
    top: u32,
    left: u32,
    bottom: u32,
    right: u32,
}

/// Unchecked edge coordinates, used as the serialized form of [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxEdges {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl TryFrom<BoxEdges> for BoundingBox {
    type Error = EditError;

    fn try_from(edges: BoxEdges) -> Result<Self, Self::Error> {
        BoundingBox::new(edges.top, edges.left, edges.bottom, edges.right)
    }
}

impl From<BoundingBox> for BoxEdges {
    fn from(bbox: BoundingBox) -> Self {
        Self {
            top: bbox.top,
            left: bbox.left,
            bottom: bbox.bottom,
            right: bbox.right,
        }
    }
}

/// The axis along which a box is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Cut with a vertical line, producing a left and a right box.
    /// Word splitting always uses this axis.
    Horizontal,
    /// Cut with a horizontal line, producing a top and a bottom box.
    Vertical,
}

/// Where to cut a box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SplitPosition {
    /// Fraction of the box extent along the split axis, rounded to the nearest pixel.
    Fraction(f32),
    /// Pixel offset from the leading (left or top) edge.
    Pixel(u32),
}

impl SplitPosition {
    /// Resolves this position to a pixel offset within `extent`.
    ///
    /// The offset is not range-checked here; [`BoundingBox::split`] rejects
    /// offsets at either boundary.
    pub fn resolve(self, extent: u32) -> EditResult<u32> {
        match self {
            SplitPosition::Pixel(offset) => Ok(offset),
            SplitPosition::Fraction(fraction) => {
                if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
                    return Err(EditError::invalid_split(format!(
                        "fraction {fraction} is outside 0.0..=1.0"
                    )));
                }
                Ok((f64::from(fraction) * f64::from(extent)).round() as u32)
            }
        }
    }
}

/// One edge of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Left,
    Bottom,
    Right,
}

/// Signed per-edge margin changes in pixels.
///
/// Positive values move an edge outward (growing the box), negative values
/// move it inward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginDeltas {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl MarginDeltas {
    /// Deltas that move a single edge.
    pub fn edge(edge: Edge, delta: i32) -> Self {
        let mut deltas = Self::default();
        deltas.nudge(edge, delta);
        deltas
    }

    /// Adds `delta` to the given edge, saturating at the `i32` limits.
    pub fn nudge(&mut self, edge: Edge, delta: i32) {
        let slot = match edge {
            Edge::Top => &mut self.top,
            Edge::Left => &mut self.left,
            Edge::Bottom => &mut self.bottom,
            Edge::Right => &mut self.right,
        };
        *slot = slot.saturating_add(delta);
    }

    /// Returns the delta for one edge.
    pub fn get(&self, edge: Edge) -> i32 {
        match edge {
            Edge::Top => self.top,
            Edge::Left => self.left,
            Edge::Bottom => self.bottom,
            Edge::Right => self.right,
        }
    }

    /// Returns true when no edge moves.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl BoundingBox {
    /// Creates a bounding box from its edges.
    ///
    /// # Arguments
    ///
    /// * `top` - First row covered by the box.
    /// * `left` - First column covered by the box.
    /// * `bottom` - Row just below the box (exclusive).
    /// * `right` - Column just right of the box (exclusive).
    ///
    /// # Returns
    ///
    /// The box, or `EditError::InvalidBox` when `top >= bottom` or `left >= right`.
    pub fn new(top: u32, left: u32, bottom: u32, right: u32) -> EditResult<Self> {
        if top >= bottom || left >= right {
            return Err(EditError::InvalidBox {
                top,
                left,
                bottom,
                right,
            });
        }
        Ok(Self {
            top,
            left,
            bottom,
            right,
        })
    }

    /// Creates the box covering a whole page or image of the given size.
    pub fn from_extent(width: u32, height: u32) -> EditResult<Self> {
        Self::new(0, 0, height, width)
    }

    #[inline]
    pub fn top(&self) -> u32 {
        self.top
    }

    #[inline]
    pub fn left(&self) -> u32 {
        self.left
    }

    #[inline]
    pub fn bottom(&self) -> u32 {
        self.bottom
    }

    #[inline]
    pub fn right(&self) -> u32 {
        self.right
    }

    /// Width in pixels; always at least one.
    #[inline]
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Height in pixels; always at least one.
    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Extent along an axis: width for horizontal cuts, height for vertical ones.
    pub fn extent(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width(),
            Axis::Vertical => self.height(),
        }
    }

    /// Horizontal center in pixels.
    pub fn center_x(&self) -> f64 {
        (f64::from(self.left) + f64::from(self.right)) / 2.0
    }

    /// Area in square pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Returns true if `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.top <= other.top
            && self.left <= other.left
            && self.bottom >= other.bottom
            && self.right >= other.right
    }

    /// Signed horizontal gap from this box to `next`: positive when there is
    /// space between them, zero when they touch, negative when they overlap.
    pub fn horizontal_gap(&self, next: &BoundingBox) -> i64 {
        i64::from(next.left) - i64::from(self.right)
    }

    /// Returns true if the column ranges of the two boxes share a pixel.
    pub fn overlaps_horizontally(&self, other: &BoundingBox) -> bool {
        self.left < other.right && other.left < self.right
    }

    /// The smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            top: self.top.min(other.top),
            left: self.left.min(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.max(other.right),
        }
    }

    /// The shared area of both boxes, if any.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        BoundingBox::new(
            self.top.max(other.top),
            self.left.max(other.left),
            self.bottom.min(other.bottom),
            self.right.min(other.right),
        )
        .ok()
    }

    /// Clamps this box into `limits`.
    ///
    /// # Returns
    ///
    /// The clamped box, or `EditError::DegenerateBox` when nothing of the box
    /// remains inside the limits.
    pub fn clamp_to(&self, limits: &BoundingBox) -> EditResult<BoundingBox> {
        self.intersection(limits).ok_or_else(|| {
            let width =
                i64::from(self.right.min(limits.right)) - i64::from(self.left.max(limits.left));
            let height =
                i64::from(self.bottom.min(limits.bottom)) - i64::from(self.top.max(limits.top));
            EditError::DegenerateBox { width, height }
        })
    }

    /// Splits the box in two at `position` along `axis`.
    ///
    /// The two halves share the cut edge, so their union is this box and they
    /// have no pixel in common.
    ///
    /// # Arguments
    ///
    /// * `position` - Fractional or pixel position of the cut.
    /// * `axis` - [`Axis::Horizontal`] produces a left and a right box.
    ///
    /// # Returns
    ///
    /// The (leading, trailing) boxes, or `EditError::InvalidSplitPosition` when
    /// the cut falls on or outside either boundary.
    pub fn split(
        &self,
        position: SplitPosition,
        axis: Axis,
    ) -> EditResult<(BoundingBox, BoundingBox)> {
        let extent = self.extent(axis);
        let offset = position.resolve(extent)?;
        if offset == 0 || offset >= extent {
            return Err(EditError::invalid_split(format!(
                "offset {offset} must fall strictly inside the box extent {extent}"
            )));
        }

        let halves = match axis {
            Axis::Horizontal => {
                let cut = self.left + offset;
                (
                    BoundingBox { right: cut, ..*self },
                    BoundingBox { left: cut, ..*self },
                )
            }
            Axis::Vertical => {
                let cut = self.top + offset;
                (
                    BoundingBox { bottom: cut, ..*self },
                    BoundingBox { top: cut, ..*self },
                )
            }
        };
        Ok(halves)
    }

    /// Merges this box with the next box in reading order.
    ///
    /// # Arguments
    ///
    /// * `next` - The box that follows this one on the line.
    /// * `tolerance` - Largest horizontal gap in pixels still considered adjacent.
    ///
    /// # Returns
    ///
    /// The minimal box containing both, or `EditError::InvalidMerge` when `next`
    /// starts left of this box or lies further away than `tolerance`.
    pub fn merge_adjacent(&self, next: &BoundingBox, tolerance: u32) -> EditResult<BoundingBox> {
        let gap = self.horizontal_gap(next);
        if next.left < self.left || gap > i64::from(tolerance) {
            return Err(EditError::InvalidMerge { gap, tolerance });
        }
        Ok(self.union(next))
    }

    /// Moves each edge by its margin delta and clamps the result into `limits`.
    ///
    /// # Arguments
    ///
    /// * `deltas` - Signed per-edge changes; positive grows the box.
    /// * `limits` - Region the result must stay inside (page extent, neighbors).
    ///
    /// # Returns
    ///
    /// The adjusted box, or `EditError::DegenerateBox` when the width or height
    /// would drop below one pixel.
    pub fn adjust_margins(
        &self,
        deltas: &MarginDeltas,
        limits: &BoundingBox,
    ) -> EditResult<BoundingBox> {
        let clamp = |value: i64, low: u32, high: u32| value.clamp(i64::from(low), i64::from(high));

        let top = clamp(
            i64::from(self.top) - i64::from(deltas.top),
            limits.top,
            limits.bottom,
        );
        let left = clamp(
            i64::from(self.left) - i64::from(deltas.left),
            limits.left,
            limits.right,
        );
        let bottom = clamp(
            i64::from(self.bottom) + i64::from(deltas.bottom),
            limits.top,
            limits.bottom,
        );
        let right = clamp(
            i64::from(self.right) + i64::from(deltas.right),
            limits.left,
            limits.right,
        );

        let width = right - left;
        let height = bottom - top;
        if width < 1 || height < 1 {
            return Err(EditError::DegenerateBox { width, height });
        }

        // All four values were clamped into u32 limits above.
        Ok(BoundingBox {
            top: top as u32,
            left: left as u32,
            bottom: bottom as u32,
            right: right as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(top: u32, left: u32, bottom: u32, right: u32) -> BoundingBox {
        BoundingBox::new(top, left, bottom, right).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_edges() {
        assert!(BoundingBox::new(10, 0, 10, 5).is_err());
        assert!(BoundingBox::new(0, 5, 10, 5).is_err());
        assert!(BoundingBox::new(0, 0, 1, 1).is_ok());
    }

    #[test]
    fn test_deserialize_checks_invariant() {
        let ok: BoundingBox =
            serde_json::from_str(r#"{"top":0,"left":0,"bottom":10,"right":20}"#).unwrap();
        assert_eq!(ok.width(), 20);

        let bad =
            serde_json::from_str::<BoundingBox>(r#"{"top":10,"left":0,"bottom":5,"right":20}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_split_horizontal_pixel() {
        let b = bbox(0, 10, 20, 40);
        let (left, right) = b.split(SplitPosition::Pixel(12), Axis::Horizontal).unwrap();
        assert_eq!(left, bbox(0, 10, 20, 22));
        assert_eq!(right, bbox(0, 22, 20, 40));
        assert_eq!(left.union(&right), b);
        assert!(!left.overlaps_horizontally(&right));
    }

    #[test]
    fn test_split_fraction_and_vertical() {
        let b = bbox(0, 0, 10, 30);
        let (left, right) = b.split(SplitPosition::Fraction(0.5), Axis::Horizontal).unwrap();
        assert_eq!(left.right(), 15);
        assert_eq!(right.left(), 15);

        let (upper, lower) = b.split(SplitPosition::Fraction(0.3), Axis::Vertical).unwrap();
        assert_eq!(upper.bottom(), 3);
        assert_eq!(lower.top(), 3);
        assert_eq!(upper.union(&lower), b);
    }

    #[test]
    fn test_split_at_boundary_fails() {
        let b = bbox(0, 0, 10, 30);
        for position in [
            SplitPosition::Pixel(0),
            SplitPosition::Pixel(30),
            SplitPosition::Fraction(0.0),
            SplitPosition::Fraction(1.0),
            SplitPosition::Fraction(0.01),
            SplitPosition::Fraction(f32::NAN),
        ] {
            assert!(
                matches!(
                    b.split(position, Axis::Horizontal),
                    Err(EditError::InvalidSplitPosition { .. })
                ),
                "{position:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_merge_adjacent_within_tolerance() {
        let a = bbox(2, 0, 12, 10);
        let b = bbox(0, 14, 10, 30);
        assert_eq!(a.merge_adjacent(&b, 4).unwrap(), bbox(0, 0, 12, 30));
        assert!(matches!(
            a.merge_adjacent(&b, 3),
            Err(EditError::InvalidMerge { gap: 4, tolerance: 3 })
        ));
    }

    #[test]
    fn test_merge_requires_reading_order() {
        let a = bbox(0, 0, 10, 10);
        let b = bbox(0, 14, 10, 30);
        assert!(matches!(
            b.merge_adjacent(&a, 100),
            Err(EditError::InvalidMerge { .. })
        ));
    }

    #[test]
    fn test_adjust_margins_grow_and_shrink() {
        let limits = BoundingBox::from_extent(100, 100).unwrap();
        let b = bbox(10, 10, 20, 30);
        let deltas = MarginDeltas {
            top: 2,
            left: -3,
            bottom: 0,
            right: 5,
        };
        assert_eq!(b.adjust_margins(&deltas, &limits).unwrap(), bbox(8, 13, 20, 35));
    }

    #[test]
    fn test_adjust_margins_clamps_to_limits() {
        let limits = BoundingBox::from_extent(40, 25).unwrap();
        let b = bbox(10, 10, 20, 30);
        let deltas = MarginDeltas {
            top: 50,
            left: 50,
            bottom: 50,
            right: 50,
        };
        assert_eq!(b.adjust_margins(&deltas, &limits).unwrap(), limits);
    }

    #[test]
    fn test_adjust_margins_degenerate() {
        let limits = BoundingBox::from_extent(100, 100).unwrap();
        let b = bbox(0, 10, 10, 15);
        let result = b.adjust_margins(&MarginDeltas::edge(Edge::Left, -5), &limits);
        assert!(matches!(
            result,
            Err(EditError::DegenerateBox { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_margin_deltas_nudge() {
        let mut deltas = MarginDeltas::default();
        assert!(deltas.is_zero());
        deltas.nudge(Edge::Right, 5);
        deltas.nudge(Edge::Right, -2);
        deltas.nudge(Edge::Top, i32::MAX);
        deltas.nudge(Edge::Top, 1);
        assert_eq!(deltas.get(Edge::Right), 3);
        assert_eq!(deltas.top, i32::MAX);
    }

    #[test]
    fn test_clamp_to() {
        let page = BoundingBox::from_extent(50, 50).unwrap();
        assert_eq!(bbox(40, 40, 60, 70).clamp_to(&page).unwrap(), bbox(40, 40, 50, 50));
        assert!(bbox(60, 60, 70, 70).clamp_to(&page).is_err());
    }
}
