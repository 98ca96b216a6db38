use async_trait::async_trait;
use reqwest::header;
use serde::Serialize;
use tracing::{error, info};
use url::Url;

use super::{
    StorageError, StorageGateway, object_path, object_path_from_public_url, public_object_url,
};
use crate::data_url::DataUrl;

pub const DEFAULT_BUCKET: &str = "sketches";

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: Url,
    pub service_role_key: String,
    pub bucket: String,
}

impl SupabaseConfig {
    pub fn new(url: Url, service_role_key: impl Into<String>) -> Self {
        Self {
            url,
            service_role_key: service_role_key.into(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

#[derive(Serialize)]
struct RemoveRequest<'a> {
    prefixes: [&'a str; 1],
}

/// Supabase Storage over its REST API.
#[derive(Clone)]
pub struct SupabaseStorage {
    http_client: reqwest::Client,
    config: SupabaseConfig,
}

impl std::fmt::Debug for SupabaseStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseStorage")
            .field("url", &self.config.url.as_str())
            .field("bucket", &self.config.bucket)
            .finish_non_exhaustive()
    }
}

impl SupabaseStorage {
    pub fn new(config: SupabaseConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http_client: reqwest::Client, config: SupabaseConfig) -> Self {
        info!(bucket = %config.bucket, "Supabase Storage initialized");
        Self {
            http_client,
            config,
        }
    }

    fn object_endpoint(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{path}",
            self.base(),
            self.config.bucket
        )
    }

    fn bucket_endpoint(&self) -> String {
        format!("{}/storage/v1/object/{}", self.base(), self.config.bucket)
    }

    fn base(&self) -> &str {
        self.config.url.as_str().trim_end_matches('/')
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.service_role_key),
            )
            .header("apikey", &self.config.service_role_key)
    }

    async fn failure_body(response: reqwest::Response) -> String {
        let status = response.status();
        match response.text().await {
            Ok(body) if !body.is_empty() => format!("{status}: {body}"),
            _ => status.to_string(),
        }
    }
}

#[async_trait]
impl StorageGateway for SupabaseStorage {
    async fn upload_image(
        &self,
        file_name: &str,
        data_url: &str,
        folder: &str,
    ) -> Result<String, StorageError> {
        let path = object_path(folder, file_name);
        let decoded = DataUrl::parse(data_url).map_err(|e| {
            error!(path = %path, error = %e, "Rejected malformed data URL");
            StorageError::upload(&path, e.to_string())
        })?;
        let content_type = decoded.content_type().to_string();

        let response = self
            .authorized(self.http_client.post(self.object_endpoint(&path)))
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "true")
            .body(decoded.into_bytes())
            .send()
            .await
            .map_err(|e| {
                error!(path = %path, error = %e, "Upload request failed");
                StorageError::upload(&path, e.to_string())
            })?;

        if !response.status().is_success() {
            let message = Self::failure_body(response).await;
            error!(path = %path, %message, "Failed to upload");
            return Err(StorageError::upload(&path, message));
        }

        info!(path = %path, "Uploaded");
        Ok(public_object_url(&self.config.url, &self.config.bucket, &path))
    }

    async fn delete_image(&self, public_url: &str) -> Result<(), StorageError> {
        let path = object_path_from_public_url(public_url, &self.config.bucket)?;

        let response = self
            .authorized(self.http_client.delete(self.bucket_endpoint()))
            .json(&RemoveRequest { prefixes: [&path] })
            .send()
            .await
            .map_err(|e| {
                error!(path = %path, error = %e, "Delete request failed");
                StorageError::delete(&path, e.to_string())
            })?;

        if !response.status().is_success() {
            let message = Self::failure_body(response).await;
            error!(path = %path, %message, "Failed to delete");
            return Err(StorageError::delete(&path, message));
        }

        info!(path = %path, "Deleted");
        Ok(())
    }
}
