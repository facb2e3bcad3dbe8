//! Crop-to-content for word boxes.
//!
//! The image layer owns the pixels. It hands the engine a binary-ish
//! [`ContentMask`] for some page region, and the engine only reads it.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::processors::BoundingBox;

/// Which edges a crop may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropEdges {
    Top,
    Bottom,
    Both,
}

impl CropEdges {
    fn crops_top(self) -> bool {
        matches!(self, CropEdges::Top | CropEdges::Both)
    }

    fn crops_bottom(self) -> bool {
        matches!(self, CropEdges::Bottom | CropEdges::Both)
    }
}

/// A foreground/background mask for a page region.
///
/// The mask is a grayscale image whose pixel (0, 0) sits at `origin` in page
/// space. Values above the crop threshold are foreground; anything outside
/// the mask is background.
#[derive(Debug, Clone)]
pub struct ContentMask {
    origin_left: u32,
    origin_top: u32,
    pixels: GrayImage,
}

impl ContentMask {
    /// Wraps a mask image anchored at (`origin_left`, `origin_top`) in page space.
    pub fn new(origin_left: u32, origin_top: u32, pixels: GrayImage) -> Self {
        Self {
            origin_left,
            origin_top,
            pixels,
        }
    }

    /// Wraps a mask that covers the page from its top-left corner.
    pub fn full_page(pixels: GrayImage) -> Self {
        Self::new(0, 0, pixels)
    }

    /// The page region covered by the mask, or `None` for an empty image.
    pub fn region(&self) -> Option<BoundingBox> {
        BoundingBox::new(
            self.origin_top,
            self.origin_left,
            self.origin_top.saturating_add(self.pixels.height()),
            self.origin_left.saturating_add(self.pixels.width()),
        )
        .ok()
    }

    /// Returns true if the page pixel (`x`, `y`) is foreground.
    pub fn is_foreground(&self, x: u32, y: u32, threshold: u8) -> bool {
        let (Some(local_x), Some(local_y)) = (
            x.checked_sub(self.origin_left),
            y.checked_sub(self.origin_top),
        ) else {
            return false;
        };
        if local_x >= self.pixels.width() || local_y >= self.pixels.height() {
            return false;
        }
        self.pixels.get_pixel(local_x, local_y).0[0] > threshold
    }

    fn row_has_content(&self, y: u32, columns: std::ops::Range<u32>, threshold: u8) -> bool {
        columns
            .into_iter()
            .any(|x| self.is_foreground(x, y, threshold))
    }
}

/// Result of a crop-to-content request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropOutcome {
    /// Content was found; the box may or may not have shrunk.
    Cropped(BoundingBox),
    /// No foreground pixel inside the box; the box is returned unchanged.
    EmptyContent(BoundingBox),
}

impl CropOutcome {
    /// The resulting box.
    pub fn bbox(&self) -> BoundingBox {
        match self {
            CropOutcome::Cropped(bbox) | CropOutcome::EmptyContent(bbox) => *bbox,
        }
    }

    pub fn is_empty_content(&self) -> bool {
        matches!(self, CropOutcome::EmptyContent(_))
    }
}

/// Shrinks `bbox` vertically to the tightest rows that contain foreground.
///
/// Only the rows inside the box are examined and only the columns inside the
/// box count, so neighboring words never pull the edges outward.
///
/// # Arguments
///
/// * `bbox` - The box to crop.
/// * `mask` - Foreground mask covering at least part of the box.
/// * `edges` - Which of the top and bottom edges may move.
/// * `threshold` - Mask values strictly above this count as foreground.
pub fn crop_to_content(
    bbox: &BoundingBox,
    mask: &ContentMask,
    edges: CropEdges,
    threshold: u8,
) -> CropOutcome {
    let columns = bbox.left()..bbox.right();
    let mut content_rows = (bbox.top()..bbox.bottom())
        .filter(|&y| mask.row_has_content(y, columns.clone(), threshold));

    let Some(first) = content_rows.next() else {
        tracing::debug!("crop_to_content: no foreground inside {:?}", bbox);
        return CropOutcome::EmptyContent(*bbox);
    };
    let last = content_rows.last().unwrap_or(first);

    let top = if edges.crops_top() { first } else { bbox.top() };
    let bottom = if edges.crops_bottom() {
        last + 1
    } else {
        bbox.bottom()
    };

    match BoundingBox::new(top, bbox.left(), bottom, bbox.right()) {
        Ok(cropped) => CropOutcome::Cropped(cropped),
        Err(_) => CropOutcome::EmptyContent(*bbox),
    }
}
