//! Editor tuning knobs.

use serde::{Deserialize, Serialize};

use crate::constraint::Strength;

/// Thresholds and policies of the edit pipeline and its drag helpers.
///
/// Distances are in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo entries kept before the oldest is evicted.
    pub history_capacity: usize,
    /// Drag distance past which an edge detaches onto a new tab.
    pub detach_threshold: f64,
    /// Drag distance past which an area changes its alignment.
    pub alignment_threshold: f64,
    /// Distance at which a dragged edge snaps onto an existing tab.
    pub snap_distance: f64,
    /// Distance at which a new edge snaps onto a neighbour's inner tab.
    pub new_tab_snap_distance: f64,
    /// Distance within which a point counts as lying on a tab.
    pub tab_tolerance: f64,
    /// Drag distance past which a free edge is hard resized.
    pub hard_resize_threshold: f64,
    /// Strength of the temporary constraints pinning freely placed edges.
    pub edit_helper_penalty: Strength,
    /// Allow areas to be placed and resized away from existing tabs.
    pub free_placement: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: 64,
            detach_threshold: 10.0,
            alignment_threshold: 10.0,
            snap_distance: 10.0,
            new_tab_snap_distance: 15.0,
            tab_tolerance: 1.0,
            hard_resize_threshold: 25.0,
            edit_helper_penalty: Strength::Strong,
            free_placement: false,
        }
    }
}

impl EditorConfig {
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_detach_threshold(mut self, threshold: f64) -> Self {
        self.detach_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_alignment_threshold(mut self, threshold: f64) -> Self {
        self.alignment_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_snap_distance(mut self, distance: f64) -> Self {
        self.snap_distance = distance;
        self
    }

    #[must_use]
    pub fn with_new_tab_snap_distance(mut self, distance: f64) -> Self {
        self.new_tab_snap_distance = distance;
        self
    }

    #[must_use]
    pub fn with_tab_tolerance(mut self, tolerance: f64) -> Self {
        self.tab_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_hard_resize_threshold(mut self, threshold: f64) -> Self {
        self.hard_resize_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_edit_helper_penalty(mut self, strength: Strength) -> Self {
        self.edit_helper_penalty = strength;
        self
    }

    #[must_use]
    pub fn with_free_placement(mut self, enabled: bool) -> Self {
        self.free_placement = enabled;
        self
    }

    /// Hard resizing only exists with free placement.
    #[must_use]
    pub fn effective_hard_resize_threshold(&self) -> f64 {
        if self.free_placement {
            self.hard_resize_threshold
        } else {
            f64::INFINITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_drag_thresholds() {
        let config = EditorConfig::default();
        assert_eq!(config.history_capacity, 64);
        assert_eq!(config.snap_distance, 10.0);
        assert_eq!(config.new_tab_snap_distance, 15.0);
        assert_eq!(config.edit_helper_penalty, Strength::Strong);
        assert!(!config.free_placement);
        assert!(config.effective_hard_resize_threshold().is_infinite());
    }

    #[test]
    fn builders_compose() {
        let config = EditorConfig::default()
            .with_history_capacity(3)
            .with_free_placement(true)
            .with_hard_resize_threshold(40.0);
        assert_eq!(config.history_capacity, 3);
        assert_eq!(config.effective_hard_resize_threshold(), 40.0);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"free_placement": true, "edit_helper_penalty": "medium"}"#)
                .expect("valid config");
        assert!(config.free_placement);
        assert_eq!(config.edit_helper_penalty, Strength::Medium);
        assert_eq!(config.tab_tolerance, 1.0);
    }
}
