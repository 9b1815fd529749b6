//! Bitmap pagination — slicing one tall capture into fixed-size pages.
//!
//! The capture is scaled to the page width and placed once per page, each
//! time shifted upward by one more slice step. This is image splitting, not
//! text reflow: a page break can land in the middle of a line.

use serde::Serialize;

use crate::export::ExportError;

/// Page size and slice step, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    /// Vertical distance between consecutive page offsets. Slightly shorter
    /// than the page so a sliver of each slice repeats at the next page top.
    pub slice_height_mm: f64,
}

/// A4 portrait with a 295 mm slice step.
pub const A4_PORTRAIT: PageGeometry = PageGeometry {
    page_width_mm: 210.0,
    page_height_mm: 297.0,
    slice_height_mm: 295.0,
};

/// Where the capture goes on one page. `offset_mm` is the vertical position
/// of the image's top edge relative to the page top (zero or negative).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub page: usize,
    pub offset_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlan {
    pub geometry: PageGeometry,
    pub image_width_mm: f64,
    pub image_height_mm: f64,
    pub placements: Vec<Placement>,
}

impl PagePlan {
    pub fn page_count(&self) -> usize {
        self.placements.len()
    }
}

/// Upper bound on pages per export; anything taller is rejected before any
/// placement is allocated.
pub const MAX_PAGES: usize = 50;

// Absorbs float noise so an exact multiple of the slice does not spill onto
// an empty extra page.
const EPSILON_MM: f64 = 1e-6;

/// Plans the pages for a capture of `width_px` × `height_px`.
///
/// The image is drawn at full page width; its height follows from the aspect
/// ratio. There is always a first page at offset 0, and another page for
/// every further slice step that still leaves image to show, giving
/// `ceil(image_height / slice_height)` pages, at most [`MAX_PAGES`].
pub fn plan_pages(
    width_px: u32,
    height_px: u32,
    geometry: &PageGeometry,
) -> Result<PagePlan, ExportError> {
    if width_px == 0 || height_px == 0 {
        return Err(ExportError::InvalidDimensions {
            width: width_px,
            height: height_px,
        });
    }

    let image_width_mm = geometry.page_width_mm;
    let image_height_mm = f64::from(height_px) * image_width_mm / f64::from(width_px);
    let slice = geometry.slice_height_mm;

    let pages = ((image_height_mm - EPSILON_MM) / slice).ceil().max(1.0);
    if pages > MAX_PAGES as f64 {
        return Err(ExportError::TooManyPages {
            pages: pages as u64,
            max: MAX_PAGES,
        });
    }

    let placements = (0..pages as usize)
        .map(|page| Placement {
            page,
            offset_mm: 0.0 - page as f64 * slice,
        })
        .collect();

    Ok(PagePlan {
        geometry: *geometry,
        image_width_mm,
        image_height_mm,
        placements,
    })
}
