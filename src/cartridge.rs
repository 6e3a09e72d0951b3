// Decoder for the cartridge container: a header of five big-endian offsets
// followed by the palette, tile, map, attribute and mapmap sections.
use std::{fmt::Display, ops::Range};

use log::info;

use crate::{
    error::FormatError,
    map::Map,
    palette::{BackgroundPalettes, PALETTE_SECTION_LEN},
    tile::TileCatalog,
};

pub const HEADER_LEN: usize = 20;
const SECTION_COUNT: usize = 5;

// Byte offset into the cartridge image. Kept distinct from plain counts so the
// two don't get mixed up when slicing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CartAddr(usize);

impl Display for CartAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:X}", self.0)?;
        Ok(())
    }
}

/// Section offsets decoded from the header, in file order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub palette_offset: usize,
    pub tile_offset: usize,
    pub map_offset: usize,
    pub attr_offset: usize,
    pub mapmap_offset: usize,
}

impl Header {
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < HEADER_LEN {
            return Err(FormatError::HeaderTooShort(data.len()));
        }
        let mut offsets = [CartAddr(0); SECTION_COUNT];
        for (i, offset) in offsets.iter_mut().enumerate() {
            *offset = read_u32_be(data, CartAddr(i * 4));
        }
        for (i, &offset) in offsets.iter().enumerate() {
            if offset.0 > data.len() {
                return Err(FormatError::OffsetPastEnd {
                    index: i,
                    offset: offset.0,
                    len: data.len(),
                });
            }
            if i > 0 && offset < offsets[i - 1] {
                return Err(FormatError::OffsetsOutOfOrder {
                    index: i,
                    offset: offset.0,
                    previous: offsets[i - 1].0,
                });
            }
        }
        info!(
            "palette: {}, tile: {}, map: {}, attr: {}, mapmap: {}",
            offsets[0], offsets[1], offsets[2], offsets[3], offsets[4]
        );
        Ok(Self {
            palette_offset: offsets[0].0,
            tile_offset: offsets[1].0,
            map_offset: offsets[2].0,
            attr_offset: offsets[3].0,
            mapmap_offset: offsets[4].0,
        })
    }

    /// Byte ranges of the five sections. Each runs to the next offset; the
    /// mapmap runs to the end of the image.
    pub fn ranges(&self, len: usize) -> [Range<usize>; SECTION_COUNT] {
        [
            self.palette_offset..self.tile_offset,
            self.tile_offset..self.map_offset,
            self.map_offset..self.attr_offset,
            self.attr_offset..self.mapmap_offset,
            self.mapmap_offset..len,
        ]
    }
}

// Bounds are checked by the caller.
fn read_u32_be(data: &[u8], addr: CartAddr) -> CartAddr {
    let b = &data[addr.0..addr.0 + 4];
    CartAddr(u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize)
}

/// Everything decoded from a cartridge image. Immutable once loaded.
#[derive(Clone, Debug, Default)]
pub struct Cartridge {
    pub palettes: BackgroundPalettes,
    pub tiles: TileCatalog,
    pub map: Map,
}

impl Cartridge {
    pub fn load(data: &[u8]) -> Result<Self, FormatError> {
        let header = Header::parse(data)?;
        let [palette, tiles, map, attr, mapmap] = header.ranges(data.len());

        let palette_data = &data[palette];
        if palette_data.len() < PALETTE_SECTION_LEN {
            return Err(FormatError::PaletteTooShort(palette_data.len()));
        }
        let palettes = BackgroundPalettes::from_bytes(palette_data);
        let tiles = TileCatalog::from_bytes(&data[tiles]);
        let map = Map::from_bytes(&data[map], &data[attr], &data[mapmap])?;
        info!(
            "Loaded cartridge: {} tiles, {} sections, {}x{} map",
            tiles.len(),
            map.sections().len(),
            map.map_width(),
            map.map_height()
        );
        Ok(Self {
            palettes,
            tiles,
            map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(offsets: [u32; 5]) -> Vec<u8> {
        offsets.iter().flat_map(|o| o.to_be_bytes()).collect()
    }

    #[test]
    fn short_header_is_rejected() {
        assert_eq!(Header::parse(&[0; 19]), Err(FormatError::HeaderTooShort(19)));
    }

    #[test]
    fn decreasing_offsets_are_rejected() {
        let mut data = header([20, 40, 30, 40, 40]);
        data.resize(64, 0);
        assert!(matches!(
            Header::parse(&data),
            Err(FormatError::OffsetsOutOfOrder { index: 2, .. })
        ));
    }

    #[test]
    fn offset_past_end_is_rejected() {
        let mut data = header([20, 33, 33, 33, 100]);
        data.resize(40, 0);
        assert!(matches!(
            Header::parse(&data),
            Err(FormatError::OffsetPastEnd { index: 4, offset: 100, len: 40 })
        ));
    }

    #[test]
    fn equal_offsets_make_empty_sections() {
        let mut data = header([20, 33, 33, 33, 33]);
        data.resize(37, 0);
        let parsed = Header::parse(&data).expect("valid header");
        let ranges = parsed.ranges(data.len());
        assert_eq!(ranges[1], 33..33);
        assert_eq!(ranges[4], 33..37);
    }

    #[test]
    fn palette_section_too_short() {
        let mut data = header([20, 25, 25, 25, 25]);
        data.resize(29, 0);
        assert_eq!(
            Cartridge::load(&data).map(|_| ()),
            Err(FormatError::PaletteTooShort(5))
        );
    }
}
