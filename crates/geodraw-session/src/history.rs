//! Undo/redo of the in-progress vertex list.
//!
//! Each entry is a full snapshot of the points before the action that
//! replaced them. History is linear: any new action clears the redo stack.

use geodraw_geometry::LatLng;

/// Manages undo/redo with point snapshots
#[derive(Debug, Clone)]
pub struct PointHistory {
    /// Snapshots that can be restored by undo
    undo_stack: Vec<Vec<LatLng>>,
    /// Snapshots that can be restored by redo
    redo_stack: Vec<Vec<LatLng>>,
    /// Maximum entries kept on each stack
    max_history: usize,
}

impl PointHistory {
    /// Create a new history keeping at most `max_history` entries per stack
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history: max_history.max(1),
        }
    }

    /// Save current points before mutation
    pub fn save_state(&mut self, points: &[LatLng]) {
        push_bounded(&mut self.undo_stack, points.to_vec(), self.max_history);
        self.redo_stack.clear();
    }

    /// Step back, returning the points to restore
    pub fn undo(&mut self, current: &[LatLng]) -> Option<Vec<LatLng>> {
        let previous = self.undo_stack.pop()?;
        push_bounded(&mut self.redo_stack, current.to_vec(), self.max_history);
        Some(previous)
    }

    /// Step forward, returning the points to restore
    pub fn redo(&mut self, current: &[LatLng]) -> Option<Vec<LatLng>> {
        let next = self.redo_stack.pop()?;
        push_bounded(&mut self.undo_stack, current.to_vec(), self.max_history);
        Some(next)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get the number of undo states available
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo states available
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for PointHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

fn push_bounded(stack: &mut Vec<Vec<LatLng>>, entry: Vec<LatLng>, max: usize) {
    stack.push(entry);
    if stack.len() > max {
        let excess = stack.len() - max;
        stack.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn p(i: usize) -> LatLng {
        LatLng::new(i as f64, -(i as f64))
    }

    /// Append points one by one, recording history like a drawing session
    fn draw(history: &mut PointHistory, n: usize) -> Vec<LatLng> {
        let mut points = Vec::new();
        for i in 0..n {
            history.save_state(&points);
            points.push(p(i));
        }
        points
    }

    #[test]
    fn empty_history_is_a_no_op() {
        let mut history = PointHistory::default();
        assert!(history.undo(&[p(0)]).is_none());
        assert!(history.redo(&[p(0)]).is_none());
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn new_action_clears_redo() {
        let mut history = PointHistory::default();
        let mut points = draw(&mut history, 3);
        points = history.undo(&points).unwrap();
        assert!(history.can_redo());

        history.save_state(&points);
        points.push(p(9));
        assert!(!history.can_redo());
        assert!(history.redo(&points).is_none());
    }

    #[test]
    fn history_is_bounded() {
        let mut history = PointHistory::new(3);
        let mut points = draw(&mut history, 10);
        assert_eq!(history.undo_count(), 3);

        for _ in 0..3 {
            points = history.undo(&points).unwrap();
        }
        assert_eq!(points.len(), 7);
        assert!(history.undo(&points).is_none());
    }

    proptest! {
        #[test]
        fn undo_all_then_redo_all_is_identity(n in 1usize..40) {
            let mut history = PointHistory::default();
            let drawn = draw(&mut history, n);

            let mut points = drawn.clone();
            for _ in 0..n {
                points = history.undo(&points).unwrap();
            }
            prop_assert!(points.is_empty());
            prop_assert!(!history.can_undo());

            for _ in 0..n {
                points = history.redo(&points).unwrap();
            }
            prop_assert_eq!(points, drawn);
            prop_assert!(!history.can_redo());
        }
    }
}
