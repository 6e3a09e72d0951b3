use std::ops::Index;

use crate::{
    common::{PixelValue, TILE_SIZE},
    error::LookupError,
};

const TILE_BYTES: usize = (TILE_SIZE * TILE_SIZE) as usize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tile {
    pub pixels: [[PixelValue; TILE_SIZE as usize]; TILE_SIZE as usize],
}

impl Tile {
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut pixels = [[0; TILE_SIZE as usize]; TILE_SIZE as usize];
        for (row, chunk) in pixels.iter_mut().zip(data.chunks_exact(TILE_SIZE as usize)) {
            row.copy_from_slice(chunk);
        }
        Self { pixels }
    }

    pub fn pixel(&self, col: usize, row: usize) -> PixelValue {
        self.pixels[row][col]
    }
}

/// Ordered tile bitmaps. Map tile ids are 1-based into this list.
#[derive(Clone, Debug, Default)]
pub struct TileCatalog {
    tiles: Vec<Tile>,
}

impl TileCatalog {
    /// Split raw tile data into 8x8 tiles. A trailing partial tile is dropped.
    pub fn from_bytes(data: &[u8]) -> Self {
        let tiles = data.chunks_exact(TILE_BYTES).map(Tile::from_bytes).collect();
        Self { tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Tile, LookupError> {
        self.tiles.get(index).ok_or(LookupError::Tile {
            index,
            len: self.tiles.len(),
        })
    }
}

impl From<Vec<Tile>> for TileCatalog {
    fn from(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }
}

// Panicking access for callers that have already validated the index.
impl Index<usize> for TileCatalog {
    type Output = Tile;

    fn index(&self, index: usize) -> &Tile {
        &self.tiles[index]
    }
}
