use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
};
use bytes::Bytes;

use crate::errors::AppError;
use crate::export::{Capture, ExportError};
use crate::state::AppState;

/// Upper bound for the multipart upload; captures are rendered at 2× scale.
pub const MAX_CAPTURE_BYTES: usize = 20 * 1024 * 1024;

/// POST /api/v1/resume/export
///
/// Multipart fields: `capture` (PNG bytes), `width` and `height` (pixels).
/// Responds with the PDF as an attachment, or a single failure message.
pub async fn handle_export(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let capture = read_capture(multipart).await?;
    let pdf = state.exporter.export(capture).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", pdf.filename),
            ),
        ],
        pdf.bytes,
    ))
}

async fn read_capture(mut multipart: Multipart) -> Result<Capture, ExportError> {
    let mut png = Bytes::new();
    let mut width_px = None;
    let mut height_px = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ExportError::Upload(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "capture" => {
                png = field
                    .bytes()
                    .await
                    .map_err(|e| ExportError::Upload(e.to_string()))?;
            }
            "width" | "height" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ExportError::Upload(e.to_string()))?;
                let value = text
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ExportError::Upload(format!("{name} must be a pixel count")))?;
                if name == "width" {
                    width_px = Some(value);
                } else {
                    height_px = Some(value);
                }
            }
            _ => {}
        }
    }

    if png.is_empty() {
        return Err(ExportError::MissingCapture);
    }
    let (Some(width_px), Some(height_px)) = (width_px, height_px) else {
        return Err(ExportError::Upload(
            "width and height are both required".to_string(),
        ));
    };
    Ok(Capture {
        png,
        width_px,
        height_px,
    })
}
