use std::num::NonZeroUsize;

use image::RgbaImage;

/// Full copy of the surface at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(RgbaImage);

impl Snapshot {
    pub fn new(pixels: RgbaImage) -> Self {
        Self(pixels)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.0
    }
}

/// Linear undo/redo history.
///
/// Always holds at least one snapshot and keeps `cursor < len`. Pushing while
/// the cursor is behind the newest entry discards the redo branch.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    limit: Option<NonZeroUsize>,
}

impl History {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            limit: None,
        }
    }

    /// Keeps at most `limit` snapshots, evicting the oldest on overflow.
    pub fn with_limit(initial: Snapshot, limit: NonZeroUsize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new(initial)
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if let Some(limit) = self.limit {
            let overflow = self.entries.len().saturating_sub(limit.get());
            if overflow > 0 {
                self.entries.drain(..overflow);
            }
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Steps back one entry, returning the snapshot to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn snap(shade: u8) -> Snapshot {
        Snapshot::new(RgbaImage::from_pixel(1, 1, Rgba([shade, shade, shade, 255])))
    }

    #[test]
    fn starts_with_single_entry() {
        let history = History::new(snap(0));
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_and_redo_walk_the_cursor() {
        let mut history = History::new(snap(0));
        history.push(snap(1));
        history.push(snap(2));

        assert_eq!(history.undo(), Some(&snap(1)));
        assert_eq!(history.undo(), Some(&snap(0)));
        assert_eq!(history.undo(), None);
        assert_eq!(history.cursor(), 0);

        assert_eq!(history.redo(), Some(&snap(1)));
        assert_eq!(history.redo(), Some(&snap(2)));
        assert_eq!(history.redo(), None);
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn push_after_undo_discards_redo_branch() {
        let mut history = History::new(snap(0));
        history.push(snap(1));
        history.push(snap(2));
        history.undo();
        history.undo();

        history.push(snap(9));

        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.current(), &snap(9));
        assert!(!history.can_redo());
    }

    #[test]
    fn limit_evicts_oldest() {
        let limit = NonZeroUsize::new(3).unwrap();
        let mut history = History::with_limit(snap(0), limit);
        for shade in 1..=5 {
            history.push(snap(shade));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.current(), &snap(5));
        history.undo();
        history.undo();
        assert_eq!(history.current(), &snap(3));
        assert!(!history.can_undo());
    }
}
