// Turns (tile id, attribute) pairs into pixel surfaces, memoized per pair.
use hashbrown::{hash_map::Entry, HashMap};
use log::warn;

use crate::{
    common::{Attribute, TileId, TILE_SIZE},
    error::LookupError,
    palette::BackgroundPalettes,
    surface::Surface,
    tile::{Tile, TileCatalog},
};

/// Pixel transform selected by the high nibble of an attribute byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transform {
    Identity,
    MirrorHorizontal,
    // Codes 2-15 have no defined behavior yet and render like `Identity`.
    Reserved(u8),
}

impl Transform {
    pub fn from_code(code: u8) -> Self {
        match code & 0xF {
            0 => Transform::Identity,
            1 => Transform::MirrorHorizontal,
            c => Transform::Reserved(c),
        }
    }

    /// Destination column for source column `col`.
    pub fn apply_to_col(self, col: i32) -> i32 {
        match self {
            Transform::MirrorHorizontal => TILE_SIZE - 1 - col,
            Transform::Identity | Transform::Reserved(_) => col,
        }
    }
}

pub fn attr_palette(attr: Attribute) -> u8 {
    attr & 0xF
}

pub fn attr_transform(attr: Attribute) -> Transform {
    Transform::from_code(attr >> 4)
}

/// Render a single tile into a fresh 8x8 surface.
pub fn rasterize_tile<S: Surface>(
    tile: &Tile,
    attr: Attribute,
    palettes: &BackgroundPalettes,
) -> S {
    let palette = attr_palette(attr);
    let transform = attr_transform(attr);
    if let Transform::Reserved(code) = transform {
        warn!("Attribute 0x{attr:02X} uses reserved transform {code}; drawing untransformed.");
    }
    let mut surface = S::blank(TILE_SIZE, TILE_SIZE);
    for row in 0..TILE_SIZE {
        for col in 0..TILE_SIZE {
            let value = tile.pixel(col as usize, row as usize);
            let color = if value > 0 {
                palettes.lookup_background_color(palette, value)
            } else {
                palettes.lookup_universal_background_color()
            };
            surface.set_pixel(transform.apply_to_col(col), row, color);
        }
    }
    surface
}

/// Cache of rendered tiles keyed by (tile id, attribute). Must be cleared
/// whenever the cartridge it was filled from is replaced.
pub struct Rasterizer<S> {
    cache: HashMap<(TileId, Attribute), S>,
}

impl<S: Surface> Default for Rasterizer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> Rasterizer<S> {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Surface for a non-zero tile id. Fails when `tile_id - 1` is not in the
    /// catalog.
    pub fn surface_for_tile(
        &mut self,
        tiles: &TileCatalog,
        palettes: &BackgroundPalettes,
        tile_id: TileId,
        attr: Attribute,
    ) -> Result<&S, LookupError> {
        match self.cache.entry((tile_id, attr)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let index = (tile_id as usize).wrapping_sub(1);
                let tile = tiles.get(index)?;
                Ok(entry.insert(rasterize_tile(tile, attr, palettes)))
            }
        }
    }
}
