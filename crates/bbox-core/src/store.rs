//! Ordered box collection: the authoritative list of annotations.
//!
//! A box's index is its position in the store. Indices are recomputed by
//! every removal, so callers must treat them as valid only until the next
//! membership change.

use crate::model::{Bbox, Bounds};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxStore {
    boxes: Vec<Bbox>,
}

impl BoxStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_boxes(boxes: Vec<Bbox>) -> Self {
        Self { boxes }
    }

    /// Append a box. Returns the new box's index.
    pub fn add(&mut self, bbox: Bbox) -> usize {
        self.boxes.push(bbox);
        self.boxes.len() - 1
    }

    /// Remove every index in `indices` in a single pass.
    ///
    /// Indices refer to the pre-removal collection, so `{1, 3}` removes the
    /// second and fourth boxes regardless of order. Out-of-range entries and
    /// repeats are ignored. Returns `true` if anything was removed.
    pub fn remove_at(&mut self, indices: &[usize]) -> bool {
        let before = self.boxes.len();
        let mut position = 0;
        self.boxes.retain(|_| {
            let keep = !indices.contains(&position);
            position += 1;
            keep
        });
        self.boxes.len() != before
    }

    /// Replace the whole collection.
    pub fn replace_all(&mut self, boxes: Vec<Bbox>) {
        self.boxes = boxes;
    }

    /// Apply `label` to every index in `indices`. Returns the indices that
    /// were actually relabeled (out-of-range ones are skipped).
    pub fn relabel(&mut self, indices: &[usize], label: &str) -> Vec<usize> {
        let mut touched = Vec::new();
        for &i in indices {
            if touched.contains(&i) {
                continue;
            }
            if let Some(b) = self.boxes.get_mut(i) {
                b.label = label.to_string();
                touched.push(i);
            }
        }
        touched
    }

    /// Overwrite the geometry of one box. No-op for an out-of-range index.
    pub fn set_bounds(&mut self, index: usize, bounds: Bounds) -> bool {
        match self.boxes.get_mut(index) {
            Some(b) => {
                b.bounds = bounds;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Bbox> {
        self.boxes.get(index)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bbox> {
        self.boxes.iter()
    }

    pub fn as_slice(&self) -> &[Bbox] {
        &self.boxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labeled(n: usize) -> BoxStore {
        BoxStore::from_boxes(
            (0..n)
                .map(|i| {
                    Bbox::new(
                        Bounds::new(i as f64 * 10.0, 0.0, 5.0, 5.0),
                        format!("box{i}"),
                    )
                })
                .collect(),
        )
    }

    fn labels(store: &BoxStore) -> Vec<&str> {
        store.iter().map(|b| b.label.as_str()).collect()
    }

    #[test]
    fn add_returns_index() {
        let mut store = BoxStore::new();
        assert_eq!(store.add(Bbox::default()), 0);
        assert_eq!(store.add(Bbox::default()), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_is_simultaneous() {
        let mut store = labeled(4);
        assert!(store.remove_at(&[3, 1]));
        assert_eq!(labels(&store), vec!["box0", "box2"]);
    }

    #[test]
    fn remove_ignores_out_of_range_and_repeats() {
        let mut store = labeled(3);
        assert!(store.remove_at(&[0, 0, 7]));
        assert_eq!(labels(&store), vec!["box1", "box2"]);
        assert!(!store.remove_at(&[9]));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn relabel_applies_to_every_index() {
        let mut store = labeled(3);
        let touched = store.relabel(&[0, 2, 5], "cat");
        assert_eq!(touched, vec![0, 2]);
        assert_eq!(labels(&store), vec!["cat", "box1", "cat"]);
    }

    #[test]
    fn set_bounds_out_of_range_is_noop() {
        let mut store = labeled(1);
        assert!(!store.set_bounds(4, Bounds::new(1.0, 1.0, 1.0, 1.0)));
        assert!(store.set_bounds(0, Bounds::new(1.0, 1.0, 1.0, 1.0)));
        assert_eq!(store.get(0).unwrap().bounds, Bounds::new(1.0, 1.0, 1.0, 1.0));
    }
}
