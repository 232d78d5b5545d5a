//! Heuristic detection of moved or renamed files
//!
//! A file present only in the "before" snapshot and a file present only in
//! the "after" snapshot are treated as the same file when their basenames
//! match and their sizes are within a relative tolerance. Each after-side
//! candidate can be claimed by at most one before-side entry.

use super::size_map::{SizeEntry, SizeMap};
use crate::snapshot::{basename, dirname};
use log::debug;
use serde::{Deserialize, Serialize};

/// Default relative size tolerance for move matching
pub const DEFAULT_MOVE_TOLERANCE: f64 = 0.10;

/// Move details attached to a merged entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInfo {
    /// Path in the before snapshot
    pub old_path: String,
    /// Path in the after snapshot
    pub new_path: String,
    /// `"<basename> (moved from <old dir> to <new dir>)"`
    pub display_name: String,
}

impl MoveInfo {
    /// Describe a move between two recorded paths
    pub fn new(old_path: &str, new_path: &str) -> Self {
        let display_name = format!(
            "{} (moved from {} to {})",
            basename(new_path),
            dirname(old_path),
            dirname(new_path)
        );
        Self {
            old_path: old_path.to_string(),
            new_path: new_path.to_string(),
            display_name,
        }
    }
}

/// A matched (before-only, after-only) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveMatch {
    /// Key in the before snapshot
    pub old_key: String,
    /// Key in the after snapshot; the merged entry is stored under this key
    pub new_key: String,
    /// Shared basename
    pub basename: String,
}

/// Maps after move reconciliation
#[derive(Debug, Clone, Default)]
pub struct MoveOutcome {
    /// Before map with moved entries re-keyed to their new path
    pub before: SizeMap,
    /// After map with moved entries annotated
    pub after: SizeMap,
    /// Every recorded move, in detection order
    pub moves: Vec<MoveMatch>,
}

/// Detects moves between two size maps
#[derive(Debug, Clone, Copy)]
pub struct MoveDetector {
    tolerance: f64,
}

impl Default for MoveDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_TOLERANCE)
    }
}

impl MoveDetector {
    /// Create a detector with the given relative tolerance (0.10 = 10%)
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Relative tolerance in use
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Whether two sizes are close enough to be the same file
    ///
    /// Relative difference is measured against the mean of both sizes.
    /// Two zero sizes are similar; a zero and a non-zero size never are.
    ///
    /// # Examples
    ///
    /// ```
    /// use size_analyzer::engine::MoveDetector;
    ///
    /// let detector = MoveDetector::default();
    /// assert!(detector.sizes_similar(1000, 1040));
    /// assert!(!detector.sizes_similar(1000, 1200));
    /// assert!(detector.sizes_similar(0, 0));
    /// assert!(!detector.sizes_similar(0, 1));
    /// ```
    pub fn sizes_similar(&self, a: u64, b: u64) -> bool {
        match (a, b) {
            (0, 0) => true,
            (0, _) | (_, 0) => false,
            _ => {
                let mean = (a as f64 + b as f64) / 2.0;
                (a.abs_diff(b) as f64) / mean <= self.tolerance
            }
        }
    }

    /// Find moves and merge each matched pair into one entry keyed by its new path
    pub fn detect(&self, mut before: SizeMap, mut after: SizeMap) -> MoveOutcome {
        let only_before: Vec<String> = before
            .keys()
            .filter(|k| !after.contains_key(k))
            .map(str::to_string)
            .collect();
        let only_after: Vec<String> = after
            .keys()
            .filter(|k| !before.contains_key(k))
            .map(str::to_string)
            .collect();

        let mut consumed = vec![false; only_after.len()];
        let mut moves = Vec::new();

        for old_key in &only_before {
            let Some(old_entry) = before.get(old_key) else {
                continue;
            };
            let name = basename(old_key);

            let candidate = only_after.iter().enumerate().find(|(i, new_key)| {
                !consumed[*i]
                    && basename(new_key) == name
                    && after
                        .get(new_key)
                        .is_some_and(|e| self.sizes_similar(old_entry.size, e.size))
            });

            if let Some((i, new_key)) = candidate {
                consumed[i] = true;
                moves.push(MoveMatch {
                    old_key: old_key.clone(),
                    new_key: new_key.clone(),
                    basename: name.to_string(),
                });
            }
        }

        for found in &moves {
            let (Some(old_entry), Some(new_entry)) =
                (before.remove(&found.old_key), after.remove(&found.new_key))
            else {
                continue;
            };

            let info = MoveInfo::new(&old_entry.original_path, &new_entry.original_path);
            debug!("Detected move: {}", info.display_name);

            before.insert(
                found.new_key.clone(),
                SizeEntry {
                    size: old_entry.size,
                    original_path: old_entry.original_path,
                    move_info: Some(info.clone()),
                },
            );
            after.insert(
                found.new_key.clone(),
                SizeEntry {
                    size: new_entry.size,
                    original_path: new_entry.original_path,
                    move_info: Some(info),
                },
            );
        }

        MoveOutcome {
            before,
            after,
            moves,
        }
    }
}
