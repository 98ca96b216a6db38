use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{RepositoryError, SketchRepository};
use crate::sketch::{NewSketch, Sketch, SketchId};

#[derive(Default)]
struct Rows {
    next_id: i64,
    sketches: BTreeMap<SketchId, Sketch>,
}

#[derive(Default)]
pub struct InMemorySketchRepository {
    rows: RwLock<Rows>,
}

impl InMemorySketchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SketchRepository for InMemorySketchRepository {
    async fn insert(&self, sketch: NewSketch) -> Result<Sketch, RepositoryError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| RepositoryError::lock_poisoned(e.to_string()))?;

        rows.next_id += 1;
        let inserted = Sketch {
            id: SketchId(rows.next_id),
            title: sketch.title,
            image_url: sketch.image_url,
            thumbnail_url: sketch.thumbnail_url,
            created_at: Utc::now(),
        };
        rows.sketches.insert(inserted.id, inserted.clone());
        Ok(inserted)
    }

    async fn find_all(&self) -> Result<Vec<Sketch>, RepositoryError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| RepositoryError::lock_poisoned(e.to_string()))?;

        let mut sketches: Vec<Sketch> = rows.sketches.values().cloned().collect();
        sketches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(sketches)
    }

    async fn find_by_id(&self, id: SketchId) -> Result<Option<Sketch>, RepositoryError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| RepositoryError::lock_poisoned(e.to_string()))?;
        Ok(rows.sketches.get(&id).cloned())
    }

    async fn delete(&self, id: SketchId) -> Result<bool, RepositoryError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| RepositoryError::lock_poisoned(e.to_string()))?;
        Ok(rows.sketches.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_sketch(title: &str) -> NewSketch {
        NewSketch {
            title: title.to_string(),
            image_url: "https://cdn/full.png".to_string(),
            thumbnail_url: "https://cdn/thumb.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_listing_is_newest_first() {
        let repo = InMemorySketchRepository::new();
        let first = repo.insert(new_sketch("a")).await.unwrap();
        repo.insert(new_sketch("b")).await.unwrap();

        assert_eq!(first.id, SketchId(1));
        let titles: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn delete_removes_only_the_given_row() {
        let repo = InMemorySketchRepository::new();
        let a = repo.insert(new_sketch("a")).await.unwrap();
        let b = repo.insert(new_sketch("b")).await.unwrap();

        assert!(repo.delete(a.id).await.unwrap());
        assert!(!repo.delete(a.id).await.unwrap());
        assert_eq!(repo.find_by_id(a.id).await.unwrap(), None);
        assert_eq!(repo.find_by_id(b.id).await.unwrap(), Some(b));
    }
}
