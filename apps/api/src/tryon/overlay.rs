use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::errors::AppError;
use crate::media::data_url::mime_for_extension;
use crate::media::InlineImage;

/// Where a garment's overlay image lives.
#[derive(Debug, PartialEq, Eq)]
pub enum OverlaySource {
    /// Stored on the garment as a data URL.
    Inline(InlineImage),
    /// A file under the overlay directory.
    File(PathBuf),
}

/// Interprets an overlay reference. Relative paths are joined onto
/// `overlay_dir`; leading slashes are ignored and `..` is rejected.
/// Remote URLs are not fetched.
pub fn overlay_source(reference: &str, overlay_dir: &Path) -> Result<OverlaySource, AppError> {
    let reference = reference.trim();
    if reference.starts_with("data:") {
        return Ok(OverlaySource::Inline(InlineImage::parse(reference)?));
    }
    if is_remote_url(reference) {
        return Err(AppError::Validation(format!(
            "Overlay '{reference}' is a remote URL; use a data URL or a path relative to the overlay directory"
        )));
    }

    let relative = Path::new(reference.trim_start_matches(['/', '\\']));
    if relative.as_os_str().is_empty() {
        return Err(AppError::Validation("Garment has no overlay image".to_string()));
    }
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(AppError::Validation(format!(
                    "Overlay path '{reference}' escapes the overlay directory"
                )))
            }
        }
    }

    Ok(OverlaySource::File(overlay_dir.join(relative)))
}

fn is_remote_url(reference: &str) -> bool {
    let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Loads the overlay image referenced by a garment.
pub async fn resolve_overlay(reference: &str, overlay_dir: &Path) -> Result<InlineImage, AppError> {
    match overlay_source(reference, overlay_dir)? {
        OverlaySource::Inline(image) => Ok(image),
        OverlaySource::File(path) => {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(AppError::NotFound(format!(
                        "Overlay file '{reference}' not found"
                    )))
                }
                Err(e) => {
                    return Err(AppError::Internal(anyhow::anyhow!(
                        "Failed to read overlay {}: {e}",
                        path.display()
                    )))
                }
            };
            let mime = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or("image/png", mime_for_extension);
            debug!("Loaded overlay {} ({} bytes)", path.display(), bytes.len());
            Ok(InlineImage::from_bytes(mime, &bytes))
        }
    }
}
