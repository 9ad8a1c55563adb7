//! Image attachment handling for product rows.

use crate::errors::{AppError, Result};
use chrono::Utc;
use std::path::Path;

pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

const ALLOWED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];
const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A validated upload, buffered until the product row is in.
#[derive(Debug)]
pub struct PendingImage {
  /// Timestamped filename the row will reference.
  pub stored_name: String,
  pub bytes: Vec<u8>,
}

/// Checks the declared content type and the filename extension against the
/// JPEG/PNG whitelist. Both must pass. Returns the normalised extension.
pub fn validate_image_kind(content_type: Option<&str>, original_name: &str) -> Result<String> {
  let ext = Path::new(original_name)
    .extension()
    .and_then(|e| e.to_str())
    .map(|e| e.to_ascii_lowercase())
    .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()));
  let content_type_ok = content_type
    .map(|c| ALLOWED_CONTENT_TYPES.contains(&c))
    .unwrap_or(false);

  match ext {
    Some(ext) if content_type_ok => Ok(ext),
    _ => Err(AppError::Validation("Only JPG, JPEG, PNG allowed".to_string())),
  }
}

pub fn enforce_size_limit(len: usize) -> Result<()> {
  if len > MAX_IMAGE_BYTES {
    return Err(AppError::Validation("Image exceeds 2MB limit".to_string()));
  }
  Ok(())
}

/// Builds the stored filename: millisecond timestamp plus the original
/// extension.
pub fn stored_image_name(ext: &str) -> String {
  format!("{}.{}", Utc::now().timestamp_millis(), ext)
}

/// Writes the buffered image into the upload directory. Called only after the
/// product row insert succeeded, so a rejected row never leaves a stray file.
pub async fn persist(upload_dir: &str, image: &PendingImage) -> Result<()> {
  tokio::fs::create_dir_all(upload_dir)
    .await
    .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {}", e)))?;
  let path = Path::new(upload_dir).join(&image.stored_name);
  tokio::fs::write(&path, &image.bytes)
    .await
    .map_err(|e| AppError::Internal(format!("Failed to store image: {}", e)))?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_jpeg_and_png() {
    assert_eq!(validate_image_kind(Some("image/png"), "photo.png").unwrap(), "png");
    assert_eq!(validate_image_kind(Some("image/jpeg"), "photo.jpg").unwrap(), "jpg");
    assert_eq!(validate_image_kind(Some("image/jpeg"), "photo.jpeg").unwrap(), "jpeg");
  }

  #[test]
  fn extension_check_is_case_insensitive() {
    assert_eq!(validate_image_kind(Some("image/png"), "PHOTO.PNG").unwrap(), "png");
  }

  #[test]
  fn rejects_when_either_signal_is_off() {
    // Good type, bad extension.
    assert!(validate_image_kind(Some("image/png"), "photo.gif").is_err());
    // Good extension, bad type.
    assert!(validate_image_kind(Some("text/plain"), "photo.png").is_err());
    // No extension at all.
    assert!(validate_image_kind(Some("image/png"), "photo").is_err());
    // No declared type.
    assert!(validate_image_kind(None, "photo.png").is_err());
  }

  #[test]
  fn size_limit_is_inclusive() {
    assert!(enforce_size_limit(MAX_IMAGE_BYTES).is_ok());
    assert!(enforce_size_limit(MAX_IMAGE_BYTES + 1).is_err());
  }

  #[test]
  fn stored_name_keeps_the_extension() {
    let name = stored_image_name("png");
    assert!(name.ends_with(".png"));
    assert!(name.trim_end_matches(".png").parse::<i64>().is_ok());
  }

  #[tokio::test]
  async fn persist_writes_under_the_upload_dir() {
    let dir = tempfile::tempdir().unwrap();
    let image = PendingImage {
      stored_name: "1700000000000.png".to_string(),
      bytes: vec![0x89, 0x50, 0x4e, 0x47],
    };
    persist(dir.path().to_str().unwrap(), &image).await.unwrap();
    let on_disk = std::fs::read(dir.path().join("1700000000000.png")).unwrap();
    assert_eq!(on_disk, image.bytes);
  }
}
