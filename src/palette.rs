// Fixed 64-color master palette and the per-cartridge background palettes
// that select from it.
use serde::Serialize;

use crate::common::{ColorIdx, ColorRGB, PixelValue};

const fn rgb(red: u8, green: u8, blue: u8) -> ColorRGB {
    ColorRGB::new(red, green, blue)
}

pub const MASTER_PALETTE: [ColorRGB; 64] = [
    rgb(84, 84, 84),
    rgb(0, 30, 116),
    rgb(8, 16, 144),
    rgb(48, 0, 136),
    rgb(68, 0, 100),
    rgb(92, 0, 48),
    rgb(84, 4, 0),
    rgb(60, 24, 0),
    rgb(32, 42, 0),
    rgb(8, 58, 0),
    rgb(0, 64, 0),
    rgb(0, 60, 0),
    rgb(0, 50, 60),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
    rgb(152, 150, 152),
    rgb(8, 76, 196),
    rgb(48, 50, 236),
    rgb(92, 30, 228),
    rgb(136, 20, 176),
    rgb(160, 20, 100),
    rgb(152, 34, 32),
    rgb(120, 60, 0),
    rgb(84, 90, 0),
    rgb(40, 114, 0),
    rgb(8, 124, 0),
    rgb(0, 118, 40),
    rgb(0, 102, 120),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
    rgb(236, 238, 236),
    rgb(76, 154, 236),
    rgb(120, 124, 236),
    rgb(176, 98, 236),
    rgb(228, 84, 236),
    rgb(236, 88, 180),
    rgb(236, 106, 100),
    rgb(212, 136, 32),
    rgb(160, 170, 0),
    rgb(116, 196, 0),
    rgb(76, 208, 32),
    rgb(56, 204, 108),
    rgb(56, 180, 204),
    rgb(60, 60, 60),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
    rgb(236, 238, 236),
    rgb(168, 204, 236),
    rgb(188, 188, 236),
    rgb(212, 178, 236),
    rgb(236, 174, 236),
    rgb(236, 174, 212),
    rgb(236, 180, 176),
    rgb(228, 196, 144),
    rgb(204, 210, 120),
    rgb(180, 222, 120),
    rgb(168, 226, 144),
    rgb(152, 226, 180),
    rgb(160, 214, 228),
    rgb(160, 162, 160),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
];

pub const SUB_PALETTE_COUNT: usize = 4;

// Size of the palette section: background color plus four triples.
pub const PALETTE_SECTION_LEN: usize = 1 + SUB_PALETTE_COUNT * 3;

pub fn master_color(idx: ColorIdx) -> ColorRGB {
    MASTER_PALETTE[(idx & 0x3F) as usize]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BackgroundPalettes {
    pub background: ColorIdx,
    pub sub_palettes: [[ColorIdx; 3]; SUB_PALETTE_COUNT],
}

impl Default for BackgroundPalettes {
    fn default() -> Self {
        Self {
            background: 0x0F,
            sub_palettes: [[0, 1, 2], [3, 4, 5], [6, 7, 8], [9, 10, 11]],
        }
    }
}

impl BackgroundPalettes {
    /// Decode the palette section. The caller guarantees at least
    /// `PALETTE_SECTION_LEN` bytes; anything after that is ignored.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut sub_palettes = [[0; 3]; SUB_PALETTE_COUNT];
        for (i, triple) in sub_palettes.iter_mut().enumerate() {
            triple.copy_from_slice(&data[1 + i * 3..4 + i * 3]);
        }
        Self {
            background: data[0],
            sub_palettes,
        }
    }

    pub fn lookup_universal_background_color(&self) -> ColorRGB {
        master_color(self.background)
    }

    /// Resolve a tile pixel value through a sub-palette. Value 0, values past 3
    /// and unknown sub-palettes all fall back to the universal background.
    pub fn lookup_background_color(&self, palette: u8, value: PixelValue) -> ColorRGB {
        match (self.sub_palettes.get(palette as usize), value) {
            (Some(triple), 1..=3) => master_color(triple[value as usize - 1]),
            _ => self.lookup_universal_background_color(),
        }
    }
}
