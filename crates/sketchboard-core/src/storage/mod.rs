//! Object storage for sketch images.
//!
//! Blobs live under `{folder}/{file_name}` inside a bucket and are addressed
//! by public URLs of the form `{base}/storage/v1/object/public/{bucket}/{path}`.
//! Deletion recovers the object path from that URL, so every gateway must
//! produce URLs in this scheme.

mod memory;
mod naming;
mod supabase;

pub use memory::{InMemoryStorage, StoredObject};
pub use naming::generate_file_name;
pub use supabase::{SupabaseConfig, SupabaseStorage};

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;

pub const FULL_IMAGE_FOLDER: &str = "full";
pub const THUMBNAIL_FOLDER: &str = "thumbnails";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Upload failed for {path}: {message}")]
    UploadFailed { path: String, message: String },

    #[error("Delete failed for {path}: {message}")]
    DeleteFailed { path: String, message: String },

    #[error("Invalid file URL: {url}")]
    InvalidReference { url: String },
}

impl StorageError {
    pub fn upload(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UploadFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn delete(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DeleteFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_reference(url: impl Into<String>) -> Self {
        Self::InvalidReference { url: url.into() }
    }
}

#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Decodes `data_url`, stores it under `folder/file_name` (overwriting any
    /// existing object) and returns the object's public URL.
    async fn upload_image(
        &self,
        file_name: &str,
        data_url: &str,
        folder: &str,
    ) -> Result<String, StorageError>;

    async fn delete_image(&self, public_url: &str) -> Result<(), StorageError>;

    /// Issues every deletion at once and waits for all of them to settle,
    /// then returns the first failure in input order.
    async fn delete_images(&self, public_urls: &[String]) -> Result<(), StorageError> {
        join_all(public_urls.iter().map(|url| self.delete_image(url)))
            .await
            .into_iter()
            .collect()
    }
}

pub(crate) fn object_path(folder: &str, file_name: &str) -> String {
    if folder.is_empty() {
        file_name.to_string()
    } else {
        format!("{folder}/{file_name}")
    }
}

pub(crate) fn public_object_url(base: &url::Url, bucket: &str, path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{bucket}/{path}",
        base.as_str().trim_end_matches('/')
    )
}

/// Recovers the object path from a public URL by locating the
/// `/object/public/{bucket}/` marker in the URL path.
pub(crate) fn object_path_from_public_url(
    public_url: &str,
    bucket: &str,
) -> Result<String, StorageError> {
    let parsed =
        url::Url::parse(public_url).map_err(|_| StorageError::invalid_reference(public_url))?;
    let marker = format!("/object/public/{bucket}/");

    match parsed.path().split_once(&marker) {
        Some((_, path)) if !path.is_empty() => Ok(path.to_string()),
        _ => Err(StorageError::invalid_reference(public_url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> url::Url {
        url::Url::parse("https://project.supabase.co").unwrap()
    }

    #[test]
    fn object_path_skips_empty_folder() {
        assert_eq!(object_path("", "a.png"), "a.png");
        assert_eq!(object_path("full", "a.png"), "full/a.png");
    }

    #[test]
    fn public_url_round_trips_to_object_path() {
        let url = public_object_url(&base(), "sketches", "thumbnails/thumb_1_abc.jpg");
        assert_eq!(
            url,
            "https://project.supabase.co/storage/v1/object/public/sketches/thumbnails/thumb_1_abc.jpg"
        );
        assert_eq!(
            object_path_from_public_url(&url, "sketches").unwrap(),
            "thumbnails/thumb_1_abc.jpg"
        );
    }

    #[test]
    fn base_with_trailing_slash_does_not_double_up() {
        let base = url::Url::parse("http://localhost:3000/").unwrap();
        let url = public_object_url(&base, "sketches", "full/a.png");
        assert_eq!(
            url,
            "http://localhost:3000/storage/v1/object/public/sketches/full/a.png"
        );
    }

    #[test]
    fn url_without_marker_is_invalid_reference() {
        let err =
            object_path_from_public_url("https://cdn.example.com/full/a.png", "sketches").unwrap_err();
        assert_eq!(
            err,
            StorageError::invalid_reference("https://cdn.example.com/full/a.png")
        );
    }

    #[test]
    fn url_for_other_bucket_is_invalid_reference() {
        let url = "https://project.supabase.co/storage/v1/object/public/avatars/full/a.png";
        assert!(matches!(
            object_path_from_public_url(url, "sketches"),
            Err(StorageError::InvalidReference { .. })
        ));
    }

    #[test]
    fn unparsable_url_is_invalid_reference() {
        assert!(matches!(
            object_path_from_public_url("not a url", "sketches"),
            Err(StorageError::InvalidReference { .. })
        ));
    }

    /// Deletes from `full` finish only after a delay; deletes elsewhere fail
    /// immediately.
    struct SlowFullGateway {
        full_deleted: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl StorageGateway for SlowFullGateway {
        async fn upload_image(
            &self,
            file_name: &str,
            _data_url: &str,
            folder: &str,
        ) -> Result<String, StorageError> {
            Ok(object_path(folder, file_name))
        }

        async fn delete_image(&self, public_url: &str) -> Result<(), StorageError> {
            if public_url.starts_with("full/") {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                self.full_deleted
                    .store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            } else {
                Err(StorageError::delete(public_url, "rejected"))
            }
        }
    }

    #[tokio::test]
    async fn delete_images_lets_slow_deletes_finish_after_a_failure() {
        let gateway = SlowFullGateway {
            full_deleted: std::sync::atomic::AtomicBool::new(false),
        };
        let urls = vec!["full/a.png".to_string(), "thumbnails/a.jpg".to_string()];

        let err = gateway.delete_images(&urls).await.unwrap_err();

        assert_eq!(err, StorageError::delete("thumbnails/a.jpg", "rejected"));
        assert!(
            gateway
                .full_deleted
                .load(std::sync::atomic::Ordering::SeqCst)
        );
    }
}
