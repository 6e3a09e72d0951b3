#![allow(dead_code)]

use tilescroll::{
    cartridge::Cartridge,
    common::{Point, TilePos, QUAD_HEIGHT, QUAD_WIDTH, SECTION_HEIGHT, SECTION_WIDTH, TILE_SIZE},
    surface::{PixelBuffer, Surface},
};

/// Assembles a cartridge image in memory.
pub struct CartBuilder {
    pub palette: Vec<u8>,
    pub tiles: Vec<[u8; 64]>,
    pub sections: Vec<Vec<u8>>,
    pub attr_sections: Vec<Vec<u8>>,
    pub mapmap_width: u16,
    pub mapmap_height: u16,
    pub mapmap: Vec<u8>,
}

impl Default for CartBuilder {
    fn default() -> Self {
        Self {
            palette: vec![
                0x0F, 0x01, 0x11, 0x21, 0x06, 0x16, 0x26, 0x09, 0x19, 0x29, 0x0C, 0x1C, 0x2C,
            ],
            tiles: vec![],
            sections: vec![],
            attr_sections: vec![],
            mapmap_width: 0,
            mapmap_height: 0,
            mapmap: vec![],
        }
    }
}

impl CartBuilder {
    pub fn tile(mut self, pixels: [u8; 64]) -> Self {
        self.tiles.push(pixels);
        self
    }

    /// Add a section and its attribute section, each computed per (row, col).
    pub fn section(
        mut self,
        tile: impl Fn(usize, usize) -> u8,
        attr: impl Fn(usize, usize) -> u8,
    ) -> Self {
        let cells = |f: &dyn Fn(usize, usize) -> u8| -> Vec<u8> {
            (0..SECTION_HEIGHT as usize)
                .flat_map(|row| (0..SECTION_WIDTH as usize).map(move |col| (row, col)))
                .map(|(row, col)| f(row, col))
                .collect()
        };
        self.sections.push(cells(&tile));
        self.attr_sections.push(cells(&attr));
        self
    }

    pub fn mapmap(mut self, width: u16, height: u16, entries: Vec<u8>) -> Self {
        self.mapmap_width = width;
        self.mapmap_height = height;
        self.mapmap = entries;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let palette = self.palette.clone();
        let tiles: Vec<u8> = self.tiles.iter().flatten().copied().collect();
        let map: Vec<u8> = self.sections.concat();
        let attrs: Vec<u8> = self.attr_sections.concat();
        let mut mapmap = vec![];
        mapmap.extend(self.mapmap_width.to_be_bytes());
        mapmap.extend(self.mapmap_height.to_be_bytes());
        mapmap.extend(&self.mapmap);

        let mut data = vec![0; 20];
        let mut offsets = vec![];
        for body in [palette, tiles, map, attrs, mapmap] {
            offsets.push(data.len() as u32);
            data.extend(body);
        }
        for (i, offset) in offsets.iter().enumerate() {
            data[i * 4..i * 4 + 4].copy_from_slice(&offset.to_be_bytes());
        }
        data
    }

    pub fn load(&self) -> Cartridge {
        Cartridge::load(&self.build()).expect("valid cartridge")
    }
}

/// Tile whose pixel value at (col, row) is `(col + row + seed) % 4`.
pub fn diagonal_tile(seed: u8) -> [u8; 64] {
    let mut pixels = [0; 64];
    for (i, p) in pixels.iter_mut().enumerate() {
        *p = ((i % 8 + i / 8) as u8 + seed) % 4;
    }
    pixels
}

/// A 3x2-section map with varied tiles, sub-palettes and mirroring, including
/// empty cells and an out-of-range sub-palette.
pub fn patterned_cartridge() -> Cartridge {
    let mut builder = CartBuilder::default();
    for seed in 0..4 {
        builder = builder.tile(diagonal_tile(seed));
    }
    builder
        .section(
            |row, col| ((row * 7 + col * 3) % 5) as u8,
            |row, col| ((row + col * 2) % 5) as u8 | if (row + col) % 3 == 0 { 0x10 } else { 0 },
        )
        .section(
            |row, col| ((row * 3 + col * 5 + 2) % 5) as u8,
            |row, col| ((row * 2 + col) % 4) as u8 | if col % 2 == 0 { 0x10 } else { 0x20 },
        )
        .mapmap(3, 2, vec![0, 1, 0, 1, 1, 0])
        .load()
}

/// Per-pixel rendering of the view whose top-left sits on map pixel `origin`,
/// computed straight from the map without any caching.
pub fn reference_view(cart: &Cartridge, origin: Point) -> PixelBuffer {
    let mut view = PixelBuffer::blank(QUAD_WIDTH, QUAD_HEIGHT);
    let background = cart.palettes.lookup_universal_background_color();
    for y in 0..QUAD_HEIGHT {
        for x in 0..QUAD_WIDTH {
            let px = origin.x + x;
            let py = origin.y + y;
            let pos = TilePos::new(py.div_euclid(TILE_SIZE), px.div_euclid(TILE_SIZE));
            let tile_id = cart.map.get_tile(pos);
            let color = if tile_id == 0 {
                background
            } else {
                let attr = cart.map.get_attr(pos);
                let tile = &cart.tiles[tile_id as usize - 1];
                let col = px.rem_euclid(TILE_SIZE);
                let src_col = if attr >> 4 == 1 { TILE_SIZE - 1 - col } else { col };
                let value = tile.pixel(src_col as usize, py.rem_euclid(TILE_SIZE) as usize);
                if value == 0 {
                    background
                } else {
                    cart.palettes.lookup_background_color(attr & 0xF, value)
                }
            };
            view.set_pixel(x, y, color);
        }
    }
    view
}
