//! Broad-phase candidate pair generation.
//!
//! Both strategies work on indices into an id-sorted snapshot and return
//! each unordered pair at most once, as `(i, j)` with `i < j`, sorted.
//! The narrow phase then runs on exactly those pairs, so switching strategy
//! never changes which events are reported, only how many shape tests run.

use glam::DVec2;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Every pair of the snapshot.
pub fn brute_force_pairs(count: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(count.saturating_mul(count.saturating_sub(1)) / 2);
    for i in 0..count {
        for j in (i + 1)..count {
            pairs.push((i, j));
        }
    }
    pairs
}

type Bucket = SmallVec<[usize; 8]>;

/// Most cells a single box may occupy. Larger boxes (relative to the cell
/// size) go to the oversized list and are paired with every entry.
pub const MAX_CELLS_PER_ENTRY: f64 = 256.0;

/// Uniform spatial hash keyed by integer cell coordinates.
///
/// An entry is inserted into every cell its bounding box touches, so two
/// overlapping boxes always share at least one cell.
pub struct SpatialGrid {
    cell_size: f64,
    cells: FxHashMap<(i64, i64), Bucket>,
    entries: Vec<usize>,
    oversized: Vec<usize>,
}

impl SpatialGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: FxHashMap::default(),
            entries: Vec::new(),
            oversized: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
        self.oversized.clear();
    }

    /// Number of entries that did not fit in the grid.
    pub fn oversized_count(&self) -> usize {
        self.oversized.len()
    }

    /// Insert an index with its bounding box.
    pub fn insert(&mut self, index: usize, min: DVec2, max: DVec2) {
        self.entries.push(index);
        let (x0, x1) = ((min.x / self.cell_size).floor(), (max.x / self.cell_size).floor());
        let (y0, y1) = ((min.y / self.cell_size).floor(), (max.y / self.cell_size).floor());
        let covered = (x1 - x0 + 1.0) * (y1 - y0 + 1.0);
        // Also catches coordinates past the i64 range, where casts saturate.
        if !(covered.is_finite() && covered <= MAX_CELLS_PER_ENTRY) {
            self.oversized.push(index);
            return;
        }
        for cx in (x0 as i64)..=(x1 as i64) {
            for cy in (y0 as i64)..=(y1 as i64) {
                self.cells.entry((cx, cy)).or_default().push(index);
            }
        }
    }

    /// Unique candidate pairs, sorted.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
        for bucket in self.cells.values() {
            for (n, &a) in bucket.iter().enumerate() {
                for &b in &bucket[n + 1..] {
                    let pair = if a < b { (a, b) } else { (b, a) };
                    seen.insert(pair);
                }
            }
        }
        for &a in &self.oversized {
            for &b in &self.entries {
                if a != b {
                    seen.insert(if a < b { (a, b) } else { (b, a) });
                }
            }
        }
        let mut pairs: Vec<(usize, usize)> = seen.into_iter().collect();
        pairs.sort_unstable();
        pairs
    }
}

/// Candidate pairs from a grid built over the given bounding boxes.
pub fn grid_pairs(cell_size: f64, boxes: &[(DVec2, DVec2)]) -> Vec<(usize, usize)> {
    let mut grid = SpatialGrid::new(cell_size);
    for (index, (min, max)) in boxes.iter().enumerate() {
        grid.insert(index, *min, *max);
    }
    grid.pairs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brute_force_lists_each_pair_once() {
        assert_eq!(brute_force_pairs(3), vec![(0, 1), (0, 2), (1, 2)]);
        assert!(brute_force_pairs(1).is_empty());
        assert!(brute_force_pairs(0).is_empty());
    }

    #[test]
    fn grid_dedups_pairs_sharing_many_cells() {
        // Two large boxes overlapping across a 3x3 block of cells.
        let boxes = [
            (DVec2::new(0.0, 0.0), DVec2::new(30.0, 30.0)),
            (DVec2::new(5.0, 5.0), DVec2::new(25.0, 25.0)),
        ];
        assert_eq!(grid_pairs(10.0, &boxes), vec![(0, 1)]);
    }

    #[test]
    fn grid_separates_far_boxes() {
        let boxes = [
            (DVec2::new(0.0, 0.0), DVec2::new(4.0, 4.0)),
            (DVec2::new(100.0, 100.0), DVec2::new(104.0, 104.0)),
            (DVec2::new(2.0, 2.0), DVec2::new(6.0, 6.0)),
        ];
        assert_eq!(grid_pairs(16.0, &boxes), vec![(0, 2)]);
    }

    #[test]
    fn grid_handles_negative_coordinates() {
        let boxes = [
            (DVec2::new(-12.0, -3.0), DVec2::new(-8.0, 1.0)),
            (DVec2::new(-9.0, -1.0), DVec2::new(-5.0, 3.0)),
        ];
        assert_eq!(grid_pairs(4.0, &boxes), vec![(0, 1)]);
    }

    #[test]
    fn boxes_spanning_too_many_cells_pair_with_everything() {
        let mut grid = SpatialGrid::new(1e-4);
        grid.insert(0, DVec2::new(-16.0, -16.0), DVec2::new(16.0, 16.0));
        grid.insert(1, DVec2::new(500.0, 500.0), DVec2::new(500.0, 500.0));
        grid.insert(2, DVec2::new(10.0, 10.0), DVec2::new(40.0, 40.0));
        assert_eq!(grid.oversized_count(), 2);
        assert_eq!(grid.pairs(), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn far_coordinates_do_not_overflow_cells() {
        let boxes = [
            (DVec2::new(-1e300, 0.0), DVec2::new(1e300, 1.0)),
            (DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0)),
        ];
        assert_eq!(grid_pairs(64.0, &boxes), vec![(0, 1)]);
    }
}
