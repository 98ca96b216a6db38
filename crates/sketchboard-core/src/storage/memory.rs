use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error};
use url::Url;

use super::{
    StorageError, StorageGateway, object_path, object_path_from_public_url, public_object_url,
};
use crate::data_url::DataUrl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Process-local object store. Objects vanish with the process; public URLs
/// resolve only when something serves [`InMemoryStorage::get`] under
/// `public_base`.
#[derive(Debug)]
pub struct InMemoryStorage {
    public_base: Url,
    bucket: String,
    objects: RwLock<HashMap<String, StoredObject>>,
    failing_upload_folders: RwLock<HashSet<String>>,
    failing_delete_folders: RwLock<HashSet<String>>,
    upload_attempts: AtomicUsize,
    delete_attempts: AtomicUsize,
}

impl InMemoryStorage {
    pub fn new(public_base: Url, bucket: impl Into<String>) -> Self {
        Self {
            public_base,
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
            failing_upload_folders: RwLock::new(HashSet::new()),
            failing_delete_folders: RwLock::new(HashSet::new()),
            upload_attempts: AtomicUsize::new(0),
            delete_attempts: AtomicUsize::new(0),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().ok()?.get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects
            .read()
            .map(|objects| objects.contains_key(path))
            .unwrap_or(false)
    }

    pub fn object_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .objects
            .read()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }

    /// Makes every later upload into `folder` fail.
    pub fn fail_uploads_in(&self, folder: impl Into<String>) {
        if let Ok(mut folders) = self.failing_upload_folders.write() {
            folders.insert(folder.into());
        }
    }

    /// Makes every later delete of an object inside `folder` fail.
    pub fn fail_deletes_in(&self, folder: impl Into<String>) {
        if let Ok(mut folders) = self.failing_delete_folders.write() {
            folders.insert(folder.into());
        }
    }

    pub fn upload_attempts(&self) -> usize {
        self.upload_attempts.load(Ordering::SeqCst)
    }

    pub fn delete_attempts(&self) -> usize {
        self.delete_attempts.load(Ordering::SeqCst)
    }

    fn folder_is_failing(folders: &RwLock<HashSet<String>>, path: &str) -> bool {
        let folder = path.rsplit_once('/').map_or("", |(folder, _)| folder);
        folders
            .read()
            .map(|folders| folders.contains(folder))
            .unwrap_or(false)
    }
}

#[async_trait]
impl StorageGateway for InMemoryStorage {
    async fn upload_image(
        &self,
        file_name: &str,
        data_url: &str,
        folder: &str,
    ) -> Result<String, StorageError> {
        self.upload_attempts.fetch_add(1, Ordering::SeqCst);
        let path = object_path(folder, file_name);

        let decoded = DataUrl::parse(data_url).map_err(|e| {
            error!(path = %path, error = %e, "Rejected malformed data URL");
            StorageError::upload(&path, e.to_string())
        })?;

        if Self::folder_is_failing(&self.failing_upload_folders, &path) {
            error!(path = %path, "Injected upload failure");
            return Err(StorageError::upload(&path, "injected failure"));
        }

        let object = StoredObject {
            content_type: decoded.content_type().to_string(),
            bytes: decoded.into_bytes(),
        };
        self.objects
            .write()
            .map_err(|e| StorageError::upload(&path, format!("lock poisoned: {e}")))?
            .insert(path.clone(), object);

        debug!(path = %path, "Uploaded");
        Ok(public_object_url(&self.public_base, &self.bucket, &path))
    }

    async fn delete_image(&self, public_url: &str) -> Result<(), StorageError> {
        self.delete_attempts.fetch_add(1, Ordering::SeqCst);
        let path = object_path_from_public_url(public_url, &self.bucket)?;

        if Self::folder_is_failing(&self.failing_delete_folders, &path) {
            error!(path = %path, "Injected delete failure");
            return Err(StorageError::delete(&path, "injected failure"));
        }

        self.objects
            .write()
            .map_err(|e| StorageError::delete(&path, format!("lock poisoned: {e}")))?
            .remove(&path);

        debug!(path = %path, "Deleted");
        Ok(())
    }
}
