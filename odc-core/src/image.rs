//! Image uploads for formations and events.

use std::fmt;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::constants::MAX_IMAGE_BYTES;
use crate::error::{OdcError, OdcResult};

/// Remote storage for image files.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` at `path` and return the public URL.
    async fn upload_image(&self, path: &str, content_type: &str, bytes: &[u8]) -> OdcResult<String>;

    async fn delete_image(&self, path: &str) -> OdcResult<()>;

    /// Storage path for a public URL produced by this store, if it is one.
    fn path_for_url(&self, url: &str) -> Option<String>;
}

/// Folder inside the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    Formations,
    Events,
}

impl ImageFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFolder::Formations => "formations",
            ImageFolder::Events => "events",
        }
    }
}

impl fmt::Display for ImageFolder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn validate(&self) -> OdcResult<()> {
        if !self.content_type.starts_with("image/") {
            return Err(OdcError::InvalidImage(format!(
                "'{}' is not an image ({})",
                self.file_name, self.content_type
            )));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(OdcError::InvalidImage(format!(
                "'{}' is {} bytes, the limit is {} bytes",
                self.file_name,
                self.bytes.len(),
                MAX_IMAGE_BYTES
            )));
        }
        Ok(())
    }

    /// File extension, from the file name or else the content type.
    pub fn extension(&self) -> String {
        let from_name = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && !ext.contains('/'));
        let from_type = self.content_type.strip_prefix("image/");

        from_name
            .or(from_type)
            .unwrap_or("jpg")
            .to_ascii_lowercase()
    }

    /// `{folder}/{unix_millis}-{uuid}.{ext}`
    pub fn storage_path(&self, folder: ImageFolder, now: DateTime<Utc>) -> String {
        format!(
            "{}/{}-{}.{}",
            folder,
            now.timestamp_millis(),
            Uuid::new_v4(),
            self.extension()
        )
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

/// Where an uploaded image ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredImage {
    Remote(String),
    /// Upload failed; the image is kept inline as a `data:` URL.
    Inline(String),
}

impl StoredImage {
    /// The value saved in the record's `image` field.
    pub fn reference(&self) -> &str {
        match self {
            StoredImage::Remote(url) | StoredImage::Inline(url) => url,
        }
    }

    pub fn into_reference(self) -> String {
        match self {
            StoredImage::Remote(url) | StoredImage::Inline(url) => url,
        }
    }
}

/// Upload `upload` into `folder`, keeping it inline if the store fails.
///
/// Invalid uploads are rejected before anything is sent.
pub async fn store_image(
    store: &dyn ImageStore,
    upload: &ImageUpload,
    folder: ImageFolder,
) -> OdcResult<StoredImage> {
    upload.validate()?;

    let path = upload.storage_path(folder, Utc::now());
    match store.upload_image(&path, &upload.content_type, &upload.bytes).await {
        Ok(url) => {
            debug!(%path, "image uploaded");
            Ok(StoredImage::Remote(url))
        }
        Err(e) => {
            warn!(%path, error = %e, "image upload failed, storing inline");
            Ok(StoredImage::Inline(upload.to_data_url()))
        }
    }
}

/// Delete the stored file behind an image reference.
///
/// Returns `false` when there was nothing to delete: inline images and URLs
/// the store does not own.
pub async fn remove_image(store: &dyn ImageStore, reference: &str) -> OdcResult<bool> {
    if reference.starts_with("data:") {
        return Ok(false);
    }
    let Some(path) = store.path_for_url(reference) else {
        debug!(reference, "image not held by store, nothing to delete");
        return Ok(false);
    };
    store.delete_image(&path).await?;
    Ok(true)
}
