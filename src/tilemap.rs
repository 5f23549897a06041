//! Static tile grid plus the per-code property table.
//!
//! Codes 0, 1 and 2 are reserved for empty, solid and one-way. Everything else is
//! whatever the caller's table says. Out-of-range lookups answer "empty".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::SolidSource;
use crate::broadphase::{query_range, TileRange};
use crate::error::ConfigError;
use crate::types::*;

pub const TILE_EMPTY: TileCode = 0;
pub const TILE_SOLID: TileCode = 1;
pub const TILE_ONE_WAY: TileCode = 2;

/// Collision behavior of a tile code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileProperties {
    pub solid: bool,
    /// Blocks only from above; implies nothing about `solid`.
    pub one_way: bool,
    /// Reported as a hazard when a body touches it.
    pub damaging: bool,
}

impl TileProperties {
    pub const EMPTY: Self = Self { solid: false, one_way: false, damaging: false };
    pub const SOLID: Self = Self { solid: true, one_way: false, damaging: false };
    pub const ONE_WAY: Self = Self { solid: false, one_way: true, damaging: false };

    /// Takes part in collision resolution at all.
    #[inline]
    pub fn collides(&self) -> bool {
        self.solid || self.one_way
    }
}

/// On-disk form: rows of codes plus optional property overrides.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TilemapDesc {
    pub tile_size: f32,
    pub rows: Vec<Vec<TileCode>>,
    #[serde(default)]
    pub properties: HashMap<TileCode, TileProperties>,
}

#[derive(Clone, Debug)]
pub struct Tilemap {
    width: u32,
    height: u32,
    tile_size: f32,
    cells: Vec<TileCode>,
    properties: HashMap<TileCode, TileProperties>,
}

fn default_properties() -> HashMap<TileCode, TileProperties> {
    let mut props = HashMap::new();
    props.insert(TILE_EMPTY, TileProperties::EMPTY);
    props.insert(TILE_SOLID, TileProperties::SOLID);
    props.insert(TILE_ONE_WAY, TileProperties::ONE_WAY);
    props
}

impl Tilemap {
    /// Build from row-major cells. Rejects zero dimensions, bad tile sizes and
    /// cell counts that don't match `width * height`.
    pub fn new(width: u32, height: u32, tile_size: f32, cells: Vec<TileCode>) -> Result<Self, ConfigError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(tile_size));
        }
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyTilemap { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(ConfigError::CellCount { expected, found: cells.len() });
        }
        log::debug!("tilemap {width}x{height} @ {tile_size}px");
        Ok(Self { width, height, tile_size, cells, properties: default_properties() })
    }

    /// All-empty map.
    pub fn empty(width: u32, height: u32, tile_size: f32) -> Result<Self, ConfigError> {
        Self::new(width, height, tile_size, vec![TILE_EMPTY; width as usize * height as usize])
    }

    /// Build from a 2D array (`rows[row][col]`).
    pub fn from_rows<R: AsRef<[TileCode]>>(rows: &[R], tile_size: f32) -> Result<Self, ConfigError> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * rows.len());
        for (i, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != width {
                return Err(ConfigError::RaggedRow { row: i, expected: width, found: r.len() });
            }
            cells.extend_from_slice(r);
        }
        Self::new(width as u32, rows.len() as u32, tile_size, cells)
    }

    pub fn from_desc(desc: TilemapDesc) -> Result<Self, ConfigError> {
        let mut map = Self::from_rows(&desc.rows, desc.tile_size)?;
        for (code, props) in desc.properties {
            map.set_properties(code, props);
        }
        Ok(map)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let desc: TilemapDesc = serde_json::from_str(s)?;
        Self::from_desc(desc)
    }

    pub fn to_desc(&self) -> TilemapDesc {
        let rows = self.cells.chunks(self.width as usize).map(|r| r.to_vec()).collect();
        TilemapDesc { tile_size: self.tile_size, rows, properties: self.properties.clone() }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Register or replace the behavior of a tile code.
    pub fn set_properties(&mut self, code: TileCode, props: TileProperties) {
        self.properties.insert(code, props);
    }

    /// Unknown codes behave as empty.
    pub fn properties_of(&self, code: TileCode) -> TileProperties {
        self.properties.get(&code).copied().unwrap_or(TileProperties::EMPTY)
    }

    #[inline]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    /// Tile code at `(col, row)`; [`TILE_EMPTY`] outside the map.
    pub fn get(&self, col: i32, row: i32) -> TileCode {
        self.index(col, row).map(|i| self.cells[i]).unwrap_or(TILE_EMPTY)
    }

    pub fn properties(&self, col: i32, row: i32) -> TileProperties {
        self.properties_of(self.get(col, row))
    }

    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        self.properties(col, row).solid
    }

    /// Between-tick edit (level editing, pickups). Returns false outside the map.
    pub fn set(&mut self, col: i32, row: i32, code: TileCode) -> bool {
        match self.index(col, row) {
            Some(i) => {
                self.cells[i] = code;
                true
            }
            None => false,
        }
    }

    /// Reset a cell to empty, returning what was there.
    pub fn clear(&mut self, col: i32, row: i32) -> Option<TileCode> {
        let i = self.index(col, row)?;
        Some(std::mem::replace(&mut self.cells[i], TILE_EMPTY))
    }

    /// World-space rectangle of a cell (valid for any index, in or out of range).
    pub fn tile_rect(&self, col: i32, row: i32) -> Aabb {
        let ts = self.tile_size;
        Aabb::new(col as f32 * ts, row as f32 * ts, (col + 1) as f32 * ts, (row + 1) as f32 * ts)
    }

    pub fn range_for(&self, aabb: &Aabb) -> TileRange {
        query_range(aabb, self.tile_size)
    }

    /// Cells with `damaging` set that `aabb` strictly overlaps.
    pub fn hazards_touching(&self, aabb: &Aabb, out: &mut Vec<(i32, i32)>) {
        for (col, row) in self.range_for(aabb).iter() {
            if self.properties(col, row).damaging && aabb.overlaps(&self.tile_rect(col, row)) {
                out.push((col, row));
            }
        }
    }
}

impl SolidSource for Tilemap {
    fn candidates(&self, aabb: &Aabb, _exclude: Option<ColKey>, out: &mut Vec<Solid>) {
        for (col, row) in self.range_for(aabb).iter() {
            let code = self.get(col, row);
            let props = self.properties_of(code);
            if !props.collides() {
                continue;
            }
            out.push(Solid {
                aabb: self.tile_rect(col, row),
                // A tile that is both solid and one-way blocks everywhere.
                one_way: props.one_way && !props.solid,
                origin: SolidOrigin::Tile { col, row, code },
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> Tilemap {
        Tilemap::from_rows(
            &[
                [0u16, 0, 0, 0],
                [0, 2, 2, 0],
                [1, 1, 1, 1],
            ],
            32.0,
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_and_out_of_range() {
        let m = map();
        assert_eq!(m.get(0, 2), TILE_SOLID);
        assert_eq!(m.get(1, 1), TILE_ONE_WAY);
        assert_eq!(m.get(-1, 0), TILE_EMPTY);
        assert_eq!(m.get(4, 0), TILE_EMPTY);
        assert_eq!(m.get(0, 99), TILE_EMPTY);
        assert!(!m.is_solid(-5, -5));
        assert!(m.is_solid(3, 2));
    }

    #[test]
    fn test_construction_rejections() {
        assert!(matches!(Tilemap::empty(0, 4, 16.0), Err(ConfigError::EmptyTilemap { .. })));
        assert!(matches!(Tilemap::empty(4, 4, -16.0), Err(ConfigError::InvalidTileSize(_))));
        assert!(matches!(Tilemap::empty(4, 4, 0.0), Err(ConfigError::InvalidTileSize(_))));
        assert!(matches!(Tilemap::new(2, 2, 8.0, vec![0; 3]), Err(ConfigError::CellCount { .. })));
        let ragged: Vec<Vec<TileCode>> = vec![vec![0, 0], vec![0]];
        assert!(matches!(Tilemap::from_rows(&ragged, 8.0), Err(ConfigError::RaggedRow { row: 1, .. })));
    }

    #[test]
    fn test_edit_between_ticks() {
        let mut m = map();
        assert_eq!(m.clear(2, 2), Some(TILE_SOLID));
        assert!(!m.is_solid(2, 2));
        assert!(m.set(0, 0, TILE_SOLID));
        assert!(!m.set(-1, 0, TILE_SOLID));
        assert_eq!(m.clear(10, 10), None);
    }

    #[test]
    fn test_candidates_only_in_range() {
        let m = map();
        let mut out = Vec::new();
        // Body standing on row 2, straddling cols 0 and 1.
        let body = Aabb::new(20.0, 60.0, 44.0, 70.0);
        m.candidates(&body, None, &mut out);
        let tiles: Vec<_> = out
            .iter()
            .map(|s| match s.origin {
                SolidOrigin::Tile { col, row, .. } => (col, row, s.one_way),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(tiles, vec![(1, 1, true), (0, 2, false), (1, 2, false)]);
    }

    #[test]
    fn test_custom_codes_and_hazards() {
        let json = r#"{ "tile_size": 10.0, "rows": [[0, 3], [1, 1]], "properties": { "3": { "damaging": true } } }"#;
        let m = Tilemap::from_json_str(json).unwrap();
        assert!(m.properties(1, 0).damaging);
        assert!(!m.properties(1, 0).collides());
        let mut hits = Vec::new();
        m.hazards_touching(&Aabb::new(12.0, 2.0, 18.0, 8.0), &mut hits);
        assert_eq!(hits, vec![(1, 0)]);
        hits.clear();
        // Touching the hazard's edge is not an overlap.
        m.hazards_touching(&Aabb::new(0.0, 2.0, 10.0, 8.0), &mut hits);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_desc_roundtrip_keeps_cells() {
        let m = map();
        let back = Tilemap::from_desc(m.to_desc()).unwrap();
        assert_eq!(back.width(), 4);
        assert_eq!(back.height(), 3);
        assert_eq!(back.get(2, 1), TILE_ONE_WAY);
    }
}
