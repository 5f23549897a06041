//! Broad phase: tile index ranges for a box, and a uniform grid bucketing
//! obstacles per frame.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::types::Aabb;

/// Inclusive tile index range. Indices may be negative or past the map edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileRange {
    pub col_min: i32,
    pub col_max: i32,
    pub row_min: i32,
    pub row_max: i32,
}

impl TileRange {
    pub fn len(&self) -> usize {
        let cols = (self.col_max - self.col_min + 1).max(0) as usize;
        let rows = (self.row_max - self.row_min + 1).max(0) as usize;
        cols * rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major `(col, row)` walk.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (c0, c1) = (self.col_min, self.col_max);
        (self.row_min..=self.row_max).flat_map(move |row| (c0..=c1).map(move |col| (col, row)))
    }
}

#[inline]
fn lower_index(v: f32, size: f32) -> i32 {
    (v / size).floor() as i32
}

/// Index of the last cell a max edge reaches into. An edge lying exactly on a
/// grid line does not reach the next cell.
#[inline]
fn upper_index(min: i32, v: f32, size: f32) -> i32 {
    ((v / size).ceil() as i32 - 1).max(min)
}

/// Minimal tile range covering `aabb`.
pub fn query_range(aabb: &Aabb, tile_size: f32) -> TileRange {
    let ts = tile_size.max(1e-5);
    let col_min = lower_index(aabb.left, ts);
    let row_min = lower_index(aabb.top, ts);
    TileRange {
        col_min,
        col_max: upper_index(col_min, aabb.right, ts),
        row_min,
        row_max: upper_index(row_min, aabb.bottom, ts),
    }
}

/// Uniform grid rebuilt every frame: cell coord -> list of caller indices.
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
    len: usize,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size: cell_size.max(1e-5), cells: HashMap::new(), len: 0 }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of inserted items.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.len = 0;
    }

    pub fn cell_of(&self, p: Vec2) -> (i32, i32) {
        (lower_index(p.x, self.cell_size), lower_index(p.y, self.cell_size))
    }

    /// Bucket `index` into every cell its box covers.
    pub fn insert(&mut self, index: usize, aabb: &Aabb) {
        let r = query_range(aabb, self.cell_size);
        for (cx, cy) in r.iter() {
            self.cells.entry((cx, cy)).or_default().push(index);
        }
        self.len += 1;
    }

    fn bucket(&self, cell: (i32, i32)) -> &[usize] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Items in the cell containing `p` and its 8 neighbors, deduplicated.
    pub fn get_nearby(&self, p: Vec2) -> Vec<usize> {
        let (cx, cy) = self.cell_of(p);
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for iy in cy - 1..=cy + 1 {
            for ix in cx - 1..=cx + 1 {
                for &idx in self.bucket((ix, iy)) {
                    if seen.insert(idx) {
                        out.push(idx);
                    }
                }
            }
        }
        out
    }

    /// Items sharing at least one cell with `aabb`, deduplicated.
    pub fn query_aabb(&self, aabb: &Aabb) -> Vec<usize> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for cell in query_range(aabb, self.cell_size).iter() {
            for &idx in self.bucket(cell) {
                if seen.insert(idx) {
                    out.push(idx);
                }
            }
        }
        out
    }
}
