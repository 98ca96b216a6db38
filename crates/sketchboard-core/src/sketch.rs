use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SketchId(pub i64);

impl fmt::Display for SketchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SketchId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(SketchId)
    }
}

impl From<i64> for SketchId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A saved version of the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sketch {
    pub id: SketchId,
    pub title: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub created_at: DateTime<Utc>,
}

/// Row payload for an insert; id and creation time are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSketch {
    pub title: String,
    pub image_url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Validation failed: {}", .violations.join("; "))]
pub struct ValidationError {
    pub violations: Vec<String>,
}

impl ValidationError {
    fn missing(field: &str) -> String {
        format!("{field} should not be empty")
    }
}

/// The `POST /sketches` body as it arrives on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSketchRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_data: String,
    #[serde(default)]
    pub thumbnail: String,
}

impl CreateSketchRequest {
    pub fn new(
        title: impl Into<String>,
        image_data: impl Into<String>,
        thumbnail: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            image_data: image_data.into(),
            thumbnail: thumbnail.into(),
        }
    }

    pub fn validate(self) -> Result<CreateSketch, ValidationError> {
        let mut violations = Vec::new();
        if self.title.is_empty() {
            violations.push(ValidationError::missing("title"));
        }
        if self.image_data.is_empty() {
            violations.push(ValidationError::missing("imageData"));
        }
        if self.thumbnail.is_empty() {
            violations.push(ValidationError::missing("thumbnail"));
        }

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        Ok(CreateSketch {
            title: self.title,
            image_data: self.image_data,
            thumbnail: self.thumbnail,
        })
    }
}

/// A create request that passed validation.
#[derive(Debug, Clone)]
pub struct CreateSketch {
    title: String,
    image_data: String,
    thumbnail: String,
}

impl CreateSketch {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn image_data(&self) -> &str {
        &self.image_data
    }

    pub fn thumbnail(&self) -> &str {
        &self.thumbnail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sketch_serializes_with_camel_case_fields() {
        let sketch = Sketch {
            id: SketchId(7),
            title: "v1".to_string(),
            image_url: "https://cdn/full.png".to_string(),
            thumbnail_url: "https://cdn/thumb.jpg".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 10, 26, 17, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&sketch).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["imageUrl"], "https://cdn/full.png");
        assert_eq!(json["thumbnailUrl"], "https://cdn/thumb.jpg");
        assert_eq!(json["createdAt"], "2025-10-26T17:00:00Z");
    }

    #[test]
    fn request_accepts_wire_names_and_missing_fields() {
        let request: CreateSketchRequest =
            serde_json::from_str(r#"{"title":"v1","imageData":"data:x"}"#).unwrap();
        assert_eq!(request.title, "v1");
        assert_eq!(request.image_data, "data:x");
        assert!(request.thumbnail.is_empty());
    }

    #[test]
    fn validate_lists_every_empty_field() {
        let err = CreateSketchRequest::default().validate().unwrap_err();
        assert_eq!(
            err.violations,
            vec![
                "title should not be empty",
                "imageData should not be empty",
                "thumbnail should not be empty",
            ]
        );
    }

    #[test]
    fn validate_passes_complete_request() {
        let valid = CreateSketchRequest::new("v1", "data:a", "data:b")
            .validate()
            .unwrap();
        assert_eq!(valid.title(), "v1");
        assert_eq!(valid.image_data(), "data:a");
        assert_eq!(valid.thumbnail(), "data:b");
    }

    #[test]
    fn sketch_id_parses_from_path_segment() {
        assert_eq!("42".parse::<SketchId>().unwrap(), SketchId(42));
        assert!("abc".parse::<SketchId>().is_err());
    }
}
