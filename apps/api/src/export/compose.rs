//! PDF composition via Typst.
//!
//! Each planned page becomes a fixed-size, margin-less Typst page with the
//! capture placed at that page's offset. The markup is compiled with
//! typst-as-lib, the capture served to it as a static file.

use std::fmt::Write as _;

use typst_as_lib::TypstEngine;

use crate::export::pagination::PagePlan;
use crate::export::ExportError;

/// Virtual path the capture is exposed under inside the Typst world.
const CAPTURE_PATH: &str = "/capture.png";

/// Turns a page plan plus the capture bytes into a PDF document.
///
/// Runs on a blocking thread; implementations may be CPU-heavy.
pub trait PdfComposer: Send + Sync {
    fn compose(&self, plan: &PagePlan, png: &[u8]) -> Result<Vec<u8>, ExportError>;
}

pub struct TypstComposer;

impl PdfComposer for TypstComposer {
    fn compose(&self, plan: &PagePlan, png: &[u8]) -> Result<Vec<u8>, ExportError> {
        let markup = typst_markup(plan);

        let engine = TypstEngine::builder()
            .main_file(markup)
            .with_static_file_resolver([(CAPTURE_PATH, png.to_vec())])
            .build();

        let document = engine
            .compile()
            .output
            .map_err(|e| ExportError::Composition(format!("{e:?}")))?;

        let options = typst_pdf::PdfOptions::default();
        let pdf = typst_pdf::pdf(&document, &options)
            .map_err(|e| ExportError::Composition(format!("PDF generation failed: {e:?}")))?;

        Ok(pdf.into())
    }
}

/// Typst source for a plan: one page per placement, pages separated by
/// explicit breaks.
pub fn typst_markup(plan: &PagePlan) -> String {
    let g = &plan.geometry;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#set page(width: {:.3}mm, height: {:.3}mm, margin: 0pt)",
        g.page_width_mm, g.page_height_mm
    );

    for (i, placement) in plan.placements.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out, "#pagebreak()");
        }
        let _ = writeln!(
            out,
            "#place(top + left, dy: {:.3}mm, image(\"{CAPTURE_PATH}\", width: {:.3}mm, height: {:.3}mm, fit: \"stretch\"))",
            placement.offset_mm, plan.image_width_mm, plan.image_height_mm
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::pagination::{plan_pages, A4_PORTRAIT};

    /// 1×1 RGBA PNG.
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
        0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64,
        0x60, 0xf8, 0x5f, 0x0f, 0x00, 0x02, 0x87, 0x01, 0x80, 0xeb, 0x47, 0xba, 0x92, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_markup_has_one_placement_per_page() {
        let plan = plan_pages(210, 600, &A4_PORTRAIT).unwrap();
        let markup = typst_markup(&plan);
        assert!(markup.starts_with("#set page(width: 210.000mm, height: 297.000mm, margin: 0pt)"));
        assert_eq!(markup.matches("#place(").count(), 3);
        assert_eq!(markup.matches("#pagebreak()").count(), 2);
        assert!(markup.contains("dy: -590.000mm"));
        assert!(markup.contains("height: 600.000mm"));
    }

    #[test]
    fn test_compose_produces_pdf() {
        let plan = plan_pages(1, 1, &A4_PORTRAIT).unwrap();
        let pdf = TypstComposer.compose(&plan, TINY_PNG);
        assert!(pdf.is_ok(), "Composition failed: {:?}", pdf.err());
        assert!(pdf.unwrap().starts_with(b"%PDF"));
    }
}
