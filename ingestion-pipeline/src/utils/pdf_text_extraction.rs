use std::path::Path;

use common::error::AppError;

/// Extracts the text layer from a PDF on a blocking thread.
///
/// `pdf-extract` is CPU-bound and synchronous, so it must not run on the
/// async executor. A PDF without a usable text layer is a processing error;
/// rendering fallbacks are out of scope for this service.
pub async fn extract_pdf_text(file_path: &Path) -> Result<String, AppError> {
    let pdf_bytes = tokio::fs::read(file_path).await?;

    let extraction = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&pdf_bytes).map(|s| s.trim().to_string())
    })
    .await?
    .map_err(|err| AppError::Processing(format!("Failed to extract text from PDF: {err}")))?;

    if extraction.is_empty() {
        return Err(AppError::Processing(
            "PDF contains no extractable text".into(),
        ));
    }

    Ok(extraction)
}
