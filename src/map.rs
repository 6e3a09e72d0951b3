// Section-addressed map storage. Map coordinates resolve to a section through
// the mapmap, then to a cell inside that section.
use std::ops::Range;

use itertools::{iproduct, Itertools, MinMaxResult};
use log::debug;

use crate::{
    common::{
        Attribute, Rect, SectionIdx, TileId, TilePos, SECTION_HEIGHT, SECTION_WIDTH, TILE_SIZE,
    },
    error::{FormatError, LookupError},
};

const SECTION_BYTES: usize = (SECTION_WIDTH * SECTION_HEIGHT) as usize;

/// A 32x30 grid of bytes: tile ids in the map layer, attributes in the
/// attribute layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub cells: [[u8; SECTION_WIDTH as usize]; SECTION_HEIGHT as usize],
}

impl Default for Section {
    fn default() -> Self {
        Self {
            cells: [[0; SECTION_WIDTH as usize]; SECTION_HEIGHT as usize],
        }
    }
}

impl Section {
    pub fn filled(value: u8) -> Self {
        Self {
            cells: [[value; SECTION_WIDTH as usize]; SECTION_HEIGHT as usize],
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut section = Section::default();
        for (row, chunk) in section
            .cells
            .iter_mut()
            .zip(data.chunks_exact(SECTION_WIDTH as usize))
        {
            row.copy_from_slice(chunk);
        }
        section
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }
}

/// Split a layer into whole sections; a trailing partial section is dropped.
pub fn sections_from_bytes(data: &[u8]) -> Vec<Section> {
    data.chunks_exact(SECTION_BYTES).map(Section::from_bytes).collect()
}

/// Grid of section indices describing how sections tile into the whole map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapMap {
    pub width: u16,
    pub height: u16,
    pub data: Vec<SectionIdx>,
}

impl MapMap {
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < 4 {
            return Err(FormatError::MapMapTooShort {
                expected: 4,
                actual: data.len(),
            });
        }
        let width = u16::from_be_bytes([data[0], data[1]]);
        let height = u16::from_be_bytes([data[2], data[3]]);
        let cells = width as usize * height as usize;
        let entries = &data[4..];
        if entries.len() < cells {
            return Err(FormatError::MapMapTooShort {
                expected: 4 + cells,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data: entries[..cells].to_vec(),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct Map {
    sections: Vec<Section>,
    attr_sections: Vec<Section>,
    mapmap: MapMap,
}

impl Map {
    /// Assemble a map, checking that every mapmap entry names a section that
    /// exists in both layers.
    pub fn new(
        sections: Vec<Section>,
        attr_sections: Vec<Section>,
        mapmap: MapMap,
    ) -> Result<Self, FormatError> {
        let available = sections.len().min(attr_sections.len());
        for (position, &section) in mapmap.data.iter().enumerate() {
            if section as usize >= available {
                return Err(FormatError::SectionMissing {
                    position,
                    section: section as usize,
                    available,
                });
            }
        }
        debug!(
            "Map: {} sections, {} attribute sections, {}x{} mapmap",
            sections.len(),
            attr_sections.len(),
            mapmap.width,
            mapmap.height
        );
        Ok(Self {
            sections,
            attr_sections,
            mapmap,
        })
    }

    pub fn from_bytes(
        map_data: &[u8],
        attr_data: &[u8],
        mapmap_data: &[u8],
    ) -> Result<Self, FormatError> {
        Self::new(
            sections_from_bytes(map_data),
            sections_from_bytes(attr_data),
            MapMap::from_bytes(mapmap_data)?,
        )
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn attr_sections(&self) -> &[Section] {
        &self.attr_sections
    }

    pub fn mapmap(&self) -> &MapMap {
        &self.mapmap
    }

    pub fn map_width(&self) -> u16 {
        self.mapmap.width
    }

    pub fn map_height(&self) -> u16 {
        self.mapmap.height
    }

    pub fn section(&self, index: usize) -> Result<&Section, LookupError> {
        self.sections.get(index).ok_or(LookupError::Section {
            index,
            len: self.sections.len(),
        })
    }

    pub fn attr_section(&self, index: usize) -> Result<&Section, LookupError> {
        self.attr_sections.get(index).ok_or(LookupError::Section {
            index,
            len: self.attr_sections.len(),
        })
    }

    /// Row-major mapmap position for a map coordinate, or `None` when the
    /// coordinate lies outside the map.
    pub fn get_section_address(&self, pos: TilePos) -> Option<usize> {
        let section_row = pos.row.div_euclid(SECTION_HEIGHT);
        let section_col = pos.col.div_euclid(SECTION_WIDTH);
        if section_row < 0
            || section_row >= self.mapmap.height as i32
            || section_col < 0
            || section_col >= self.mapmap.width as i32
        {
            return None;
        }
        Some(section_row as usize * self.mapmap.width as usize + section_col as usize)
    }

    fn lookup(&self, layer: &[Section], pos: TilePos) -> u8 {
        let Some(address) = self.get_section_address(pos) else {
            return 0;
        };
        // Entries were validated against both layers in `Map::new`.
        let section = &layer[self.mapmap.data[address] as usize];
        section.get(
            pos.row.rem_euclid(SECTION_HEIGHT) as usize,
            pos.col.rem_euclid(SECTION_WIDTH) as usize,
        )
    }

    pub fn get_tile(&self, pos: TilePos) -> TileId {
        self.lookup(&self.sections, pos)
    }

    pub fn get_attr(&self, pos: TilePos) -> Attribute {
        self.lookup(&self.attr_sections, pos)
    }

    pub fn get_tiles_in_area(&self, rows: Range<i32>, cols: Range<i32>) -> TiledArea {
        let origin = TilePos::new(rows.start, cols.start);
        let height = rows.len();
        let width = cols.len();
        let cells = iproduct!(rows, cols)
            .map(|(row, col)| {
                let pos = TilePos::new(row, col);
                (self.get_tile(pos), self.get_attr(pos))
            })
            .collect();
        TiledArea {
            origin,
            width,
            height,
            cells,
        }
    }
}

/// Snapshot of tile ids and attributes over a rectangular range of the map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TiledArea {
    pub origin: TilePos,
    pub width: usize,
    pub height: usize,
    cells: Vec<(TileId, Attribute)>,
}

impl TiledArea {
    /// Cell at a position relative to the area's origin.
    pub fn get(&self, row: usize, col: usize) -> Option<(TileId, Attribute)> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&(tile, _)| tile == 0)
    }

    /// Pixel box spanning the non-zero cells, relative to the area's origin.
    ///
    /// The box runs from the first to the last occupied cell, so a single
    /// occupied cell (or a single row/column of them) yields zero width
    /// and/or height. An empty area yields a zero-size box at the origin.
    pub fn hitbox(&self) -> Rect {
        let occupied: Vec<(usize, usize)> = self
            .cells
            .iter()
            .enumerate()
            .filter(|&(_, &(tile, _))| tile != 0)
            .map(|(i, _)| (i / self.width, i % self.width))
            .collect();
        let span = |r: MinMaxResult<usize>| match r {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(x) => Some((x, x)),
            MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
        };
        let rows = span(occupied.iter().map(|&(row, _)| row).minmax());
        let cols = span(occupied.iter().map(|&(_, col)| col).minmax());
        match (rows, cols) {
            (Some((top, bottom)), Some((left, right))) => Rect::new(
                left as i32 * TILE_SIZE,
                top as i32 * TILE_SIZE,
                (right - left) as i32 * TILE_SIZE,
                (bottom - top) as i32 * TILE_SIZE,
            ),
            _ => Rect::default(),
        }
    }
}
