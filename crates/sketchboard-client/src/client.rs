use reqwest::{Response, header};
use serde::Deserialize;
use sketchboard_core::{CreateSketchRequest, DataUrl, Sketch, SketchId};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Typed calls against the sketch HTTP API.
#[derive(Debug, Clone)]
pub struct SketchClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl SketchClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http_client: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            details: e.to_string(),
        })?;
        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list(&self) -> Result<Vec<Sketch>, ClientError> {
        let response = self.http_client.get(self.endpoint("sketches")?).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn get(&self, id: SketchId) -> Result<Sketch, ClientError> {
        let url = self.endpoint(&format!("sketches/{id}"))?;
        let response = self.http_client.get(url).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create(
        &self,
        title: &str,
        image_data: &str,
        thumbnail: &str,
    ) -> Result<Sketch, ClientError> {
        let body = CreateSketchRequest::new(title, image_data, thumbnail);
        let response = self
            .http_client
            .post(self.endpoint("sketches")?)
            .json(&body)
            .send()
            .await?;
        let sketch: Sketch = check(response).await?.json().await?;
        debug!(id = %sketch.id, "Created sketch");
        Ok(sketch)
    }

    pub async fn delete(&self, id: SketchId) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("sketches/{id}"))?;
        let response = self.http_client.delete(url).send().await?;
        check(response).await?;
        Ok(())
    }

    /// Downloads a stored image and re-encodes it as a data URL.
    pub async fn fetch_image_data_url(&self, image_url: &str) -> Result<String, ClientError> {
        let response = self.http_client.get(image_url).send().await?;
        let response = check(response).await?;
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = response.bytes().await?;
        debug!(url = %image_url, bytes = bytes.len(), "Fetched image");
        Ok(DataUrl::new(content_type, bytes.to_vec()).encode())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                details: e.to_string(),
            })
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_base_path() {
        let client = SketchClient::new("http://localhost:3000/api").unwrap();
        assert_eq!(
            client.endpoint("sketches/4").unwrap().as_str(),
            "http://localhost:3000/api/sketches/4"
        );

        let client = SketchClient::new("http://localhost:3000/api/").unwrap();
        assert_eq!(
            client.endpoint("sketches").unwrap().as_str(),
            "http://localhost:3000/api/sketches"
        );
    }

    #[test]
    fn rejects_invalid_base() {
        assert!(matches!(
            SketchClient::new("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }
}
