use glam::Vec2;

use std::collections::HashMap;

use crate::math::Aabb;
use crate::types::BroadphaseStats;

/// Uniform grid: cell coord -> list of entry indices whose AABB touches the cell.
pub struct UniformGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
    entries: usize,
}

impl UniformGrid {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size: cell_size.max(1e-5), cells: HashMap::new(), entries: 0 }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Empty every cell. Cells occupied by the previous build keep their
    /// allocation for one more frame; cells that were already empty are dropped,
    /// so the map tracks the region the bodies currently cover.
    pub fn clear(&mut self) {
        self.cells.retain(|_, list| {
            let keep = !list.is_empty();
            list.clear();
            keep
        });
        self.entries = 0;
    }

    /// Number of cell keys currently held, occupied or not.
    pub fn cell_capacity(&self) -> usize {
        self.cells.len()
    }

    /// Rebuild from per-entry bounds; entry `i` is `aabbs[i]`.
    pub fn rebuild(&mut self, aabbs: &[Aabb]) {
        self.clear();
        for (i, bb) in aabbs.iter().enumerate() {
            self.insert(i, bb.min, bb.max);
        }
    }

    pub fn insert(&mut self, idx: usize, min: Vec2, max: Vec2) {
        if !(min.is_finite() && max.is_finite()) {
            return;
        }
        let (ix0, iy0) = self.world_to_cell(min);
        let (ix1, iy1) = self.world_to_cell(max);
        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                self.cells.entry((ix, iy)).or_default().push(idx);
            }
        }
        self.entries += 1;
    }

    pub fn world_to_cell(&self, p: Vec2) -> (i32, i32) {
        ((p.x / self.cell_size).floor() as i32, (p.y / self.cell_size).floor() as i32)
    }

    /// Unique candidate pairs `(lo, hi)` sorted ascending. `skip` filters pairs
    /// before they are collected (e.g. static-static).
    pub fn candidate_pairs(&self, mut skip: impl FnMut(usize, usize) -> bool) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for indices in self.cells.values() {
            for i0 in 0..indices.len() {
                for i1 in (i0 + 1)..indices.len() {
                    let a = indices[i0];
                    let b = indices[i1];
                    let key = if a < b { (a, b) } else { (b, a) };
                    if skip(key.0, key.1) {
                        continue;
                    }
                    pairs.push(key);
                }
            }
        }
        // HashMap iteration order is arbitrary; sorting makes the solve order reproducible.
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    /// Entries whose cells cover the given region (may contain false positives).
    pub fn query_region(&self, region: &Aabb) -> Vec<usize> {
        let (ix0, iy0) = self.world_to_cell(region.min);
        let (ix1, iy1) = self.world_to_cell(region.max);
        let mut out = Vec::new();
        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                if let Some(list) = self.cells.get(&(ix, iy)) {
                    out.extend_from_slice(list);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Debug/perf stats for the current build.
    pub fn stats(&self, skip: impl FnMut(usize, usize) -> bool) -> BroadphaseStats {
        let mut candidate_pairs: usize = 0;
        let mut cells = 0;
        for v in self.cells.values() {
            let n = v.len();
            if n > 0 {
                cells += 1;
            }
            if n >= 2 {
                candidate_pairs += n * (n - 1) / 2;
            }
        }
        BroadphaseStats {
            entries: self.entries,
            cells,
            candidate_pairs,
            unique_pairs: self.candidate_pairs(skip).len(),
        }
    }
}
