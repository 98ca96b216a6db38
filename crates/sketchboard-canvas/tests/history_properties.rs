use std::num::NonZeroUsize;

use proptest::prelude::*;
use sketchboard_canvas::{History, Rgba, RgbaImage, Snapshot};

#[derive(Debug, Clone)]
enum Op {
    Push(u8),
    Undo,
    Redo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::Push),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

fn snap(shade: u8) -> Snapshot {
    Snapshot::new(RgbaImage::from_pixel(1, 1, Rgba([shade, 0, 0, 255])))
}

/// A plain vector-and-index model of the history.
#[derive(Debug)]
struct Model {
    entries: Vec<u8>,
    cursor: usize,
    limit: Option<usize>,
}

impl Model {
    fn apply(&mut self, op: &Op) {
        match op {
            Op::Push(shade) => {
                self.entries.truncate(self.cursor + 1);
                self.entries.push(*shade);
                if let Some(limit) = self.limit {
                    while self.entries.len() > limit {
                        self.entries.remove(0);
                    }
                }
                self.cursor = self.entries.len() - 1;
            }
            Op::Undo => self.cursor = self.cursor.saturating_sub(1),
            Op::Redo => {
                if self.cursor + 1 < self.entries.len() {
                    self.cursor += 1;
                }
            }
        }
    }
}

fn apply(history: &mut History, op: &Op) {
    match op {
        Op::Push(shade) => history.push(snap(*shade)),
        Op::Undo => {
            history.undo();
        }
        Op::Redo => {
            history.redo();
        }
    }
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds(ops in prop::collection::vec(op(), 0..64)) {
        let mut history = History::new(snap(0));
        for op in &ops {
            apply(&mut history, op);
            prop_assert!(history.len() >= 1);
            prop_assert!(history.cursor() < history.len());
            prop_assert_eq!(history.can_undo(), history.cursor() > 0);
            prop_assert_eq!(history.can_redo(), history.cursor() + 1 < history.len());
        }
    }

    #[test]
    fn matches_reference_model(
        ops in prop::collection::vec(op(), 0..64),
        limit in prop::option::of(1usize..8),
    ) {
        let mut history = match limit.and_then(NonZeroUsize::new) {
            Some(limit) => History::with_limit(snap(0), limit),
            None => History::new(snap(0)),
        };
        let mut model = Model { entries: vec![0], cursor: 0, limit };

        for op in &ops {
            apply(&mut history, op);
            model.apply(op);
            prop_assert_eq!(history.len(), model.entries.len());
            prop_assert_eq!(history.cursor(), model.cursor);
            prop_assert_eq!(history.current(), &snap(model.entries[model.cursor]));
        }
    }

    #[test]
    fn push_always_clears_redo(ops in prop::collection::vec(op(), 0..32), shade in any::<u8>()) {
        let mut history = History::new(snap(0));
        for op in &ops {
            apply(&mut history, op);
        }
        history.push(snap(shade));
        prop_assert!(!history.can_redo());
        prop_assert_eq!(history.current(), &snap(shade));
    }
}
