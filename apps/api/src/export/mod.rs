//! Export — turns an uploaded preview capture into a downloadable PDF.
//!
//! The client rasterizes the rendered preview and uploads the image; the
//! exporter plans the page slices and hands them to a [`PdfComposer`]. Only
//! one export runs at a time.

pub mod compose;
pub mod handlers;
pub mod pagination;
pub mod png;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::export::compose::PdfComposer;
use crate::export::pagination::{plan_pages, PageGeometry};

/// Name of the downloaded file.
pub const EXPORT_FILENAME: &str = "resume.pdf";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No preview capture was provided")]
    MissingCapture,

    #[error("Malformed capture upload: {0}")]
    Upload(String),

    #[error("Capture is not a PNG image")]
    NotPng,

    #[error("Capture has invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Declared size {declared_width}x{declared_height} does not match the {width}x{height} capture")]
    DimensionMismatch {
        declared_width: u32,
        declared_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Capture would need {pages} pages, more than the {max} allowed")]
    TooManyPages { pages: u64, max: usize },

    #[error("Document composition failed: {0}")]
    Composition(String),

    #[error("Document composition timed out after {0:?}")]
    Timeout(Duration),

    #[error("An export is already in progress")]
    InProgress,
}

/// The rasterized preview as uploaded by the client.
#[derive(Debug, Clone)]
pub struct Capture {
    pub png: Bytes,
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Debug)]
pub struct ExportedPdf {
    pub filename: &'static str,
    pub pages: usize,
    pub bytes: Vec<u8>,
}

pub struct Exporter {
    composer: Arc<dyn PdfComposer>,
    geometry: PageGeometry,
    timeout: Duration,
    in_flight: Arc<AtomicBool>,
}

/// Clears the in-flight flag when the composition work is really over.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Exporter {
    pub fn new(composer: Arc<dyn PdfComposer>, geometry: PageGeometry, timeout: Duration) -> Self {
        Self {
            composer,
            geometry,
            timeout,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn export(&self, capture: Capture) -> Result<ExportedPdf, ExportError> {
        let guard = self.begin()?;

        if capture.png.is_empty() {
            return Err(ExportError::MissingCapture);
        }
        let (width, height) = png::dimensions(&capture.png)?;
        if (width, height) != (capture.width_px, capture.height_px) {
            return Err(ExportError::DimensionMismatch {
                declared_width: capture.width_px,
                declared_height: capture.height_px,
                width,
                height,
            });
        }
        let plan = plan_pages(capture.width_px, capture.height_px, &self.geometry)?;
        let pages = plan.page_count();

        let composer = self.composer.clone();
        // The guard travels with the blocking job: a timed-out composition
        // keeps the exporter busy until the thread actually finishes.
        let job = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            composer.compose(&plan, &capture.png)
        });

        let bytes = match tokio::time::timeout(self.timeout, job).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join)) => return Err(ExportError::Composition(join.to_string())),
            Err(_) => {
                warn!("PDF composition exceeded {:?}", self.timeout);
                return Err(ExportError::Timeout(self.timeout));
            }
        };

        info!(
            "Exported {} ({} pages, {} bytes)",
            EXPORT_FILENAME,
            pages,
            bytes.len()
        );
        Ok(ExportedPdf {
            filename: EXPORT_FILENAME,
            pages,
            bytes,
        })
    }

    fn begin(&self) -> Result<InFlight, ExportError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::InProgress)?;
        Ok(InFlight(self.in_flight.clone()))
    }
}
