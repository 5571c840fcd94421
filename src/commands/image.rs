use std::path::Path;

use anyhow::{Context, Result};
use odc_core::image::{remove_image, store_image, ImageFolder, ImageUpload, StoredImage};
use owo_colors::OwoColorize;
use tracing::{info, warn};

use crate::backend::Backend;

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Read `path` and store it, remotely when the backend has image storage,
/// inline otherwise.
pub async fn store_file(backend: &Backend, path: &Path, folder: ImageFolder) -> Result<StoredImage> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let upload = ImageUpload {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        content_type: content_type_for(path).to_string(),
        bytes,
    };

    let stored = match backend.images() {
        Some(images) => store_image(images, &upload, folder).await?,
        None => {
            upload.validate()?;
            StoredImage::Inline(upload.to_data_url())
        }
    };
    info!(file = %path.display(), remote = matches!(stored, StoredImage::Remote(_)), "image stored");
    Ok(stored)
}

/// Delete the file behind an image reference, if the backend holds it.
pub async fn delete_reference(backend: &Backend, reference: &str) -> Result<bool> {
    match backend.images() {
        Some(images) => Ok(remove_image(images, reference).await?),
        None => Ok(false),
    }
}

/// Remove an image that was stored for a record which then failed to save.
pub async fn discard(backend: &Backend, reference: &str) {
    if let Err(e) = delete_reference(backend, reference).await {
        warn!(error = %e, "uploaded image could not be removed after a failed save");
    }
}

pub async fn upload(backend: &Backend, path: &Path, folder: ImageFolder) -> Result<()> {
    match store_file(backend, path, folder).await? {
        StoredImage::Remote(url) => {
            println!("{} Uploaded to {}", "✓".green(), folder);
            println!("{}", url);
        }
        StoredImage::Inline(data_url) => {
            println!(
                "{} Stored inline ({} characters); remote storage unavailable",
                "!".yellow(),
                data_url.len()
            );
            println!("{}", data_url);
        }
    }
    Ok(())
}

pub async fn remove(backend: &Backend, reference: &str) -> Result<()> {
    if delete_reference(backend, reference).await? {
        println!("{} Image deleted", "✓".green());
    } else {
        println!("{}", "Nothing to delete: the image is not held in remote storage".dimmed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("a/Poster.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("notes.pdf")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }
}
