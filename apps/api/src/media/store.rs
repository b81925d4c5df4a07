use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info};
use uuid::Uuid;

use crate::media::{InlineImage, MediaError};

/// Key prefixes inside the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    Photos,
    TryOns,
}

impl ImageFolder {
    fn prefix(&self) -> &'static str {
        match self {
            ImageFolder::Photos => "photos",
            ImageFolder::TryOns => "tryons",
        }
    }
}

/// Builds `<folder>/<client_id>/<id>.<ext>`.
pub fn object_key(folder: ImageFolder, client_id: i64, id: Uuid, image: &InlineImage) -> String {
    format!("{}/{}/{}.{}", folder.prefix(), client_id, id, image.extension())
}

/// Uploads an image under `key`.
pub async fn put_image(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    image: &InlineImage,
) -> Result<(), MediaError> {
    let bytes = image.to_bytes()?;
    let size = bytes.len();

    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(bytes))
        .content_type(&image.mime_type)
        .send()
        .await
        .map_err(|e| MediaError::Storage(format!("S3 upload of {key} failed: {e}")))?;

    info!("Uploaded image to s3://{bucket}/{key} ({size} bytes)");
    Ok(())
}

/// Downloads an image. `fallback_mime` is used when the object has no content type.
pub async fn get_image(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    fallback_mime: &str,
) -> Result<InlineImage, MediaError> {
    let object = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| MediaError::Storage(format!("S3 download of {key} failed: {e}")))?;

    let mime = object
        .content_type()
        .unwrap_or(fallback_mime)
        .to_string();

    let bytes = object
        .body
        .collect()
        .await
        .map_err(|e| MediaError::Storage(format!("S3 read of {key} failed: {e}")))?
        .into_bytes();

    debug!("Fetched s3://{bucket}/{key} ({} bytes)", bytes.len());
    Ok(InlineImage::from_bytes(mime, &bytes))
}
