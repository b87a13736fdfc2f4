//! Image ingestion: read a user-picked file and encode it.

use std::path::Path;

use platewise_core::{ImageError, UploadedImage};
use tracing::{debug, warn};

/// Read `path` and encode it as an [`UploadedImage`].
///
/// The MIME type is sniffed from the content, falling back to the file
/// extension.
///
/// # Errors
/// Returns [`ImageError`] if the file cannot be read, is empty, or is not a
/// recognised image.
pub async fn ingest(path: &Path) -> Result<UploadedImage, ImageError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        warn!(path = %path.display(), error = %e, "Failed to read image");
        ImageError::Read(e)
    })?;
    let file_name = path.file_name().and_then(|n| n.to_str());
    let image = UploadedImage::from_bytes(&bytes, file_name)?;
    debug!(
        path = %path.display(),
        mime_type = image.mime_type(),
        raw_len = bytes.len(),
        "Image ingested"
    );
    Ok(image)
}
