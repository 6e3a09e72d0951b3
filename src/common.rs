use std::ops::{Add, Sub};

pub type TileId = u8; // 1-based index into the tile catalog (0 = no tile)
pub type Attribute = u8; // Low nibble: sub-palette, high nibble: transform
pub type ColorIdx = u8; // Index into the 64-entry master palette
pub type PixelValue = u8; // Tile pixel value (0 = background, 1-3 = sub-palette color)
pub type SectionIdx = u8; // Index into the map's section list

pub const TILE_SIZE: i32 = 8;
pub const SECTION_WIDTH: i32 = 32;
pub const SECTION_HEIGHT: i32 = 30;

// Pixel extent of one section, which is also the size of the visible window.
pub const QUAD_WIDTH: i32 = SECTION_WIDTH * TILE_SIZE;
pub const QUAD_HEIGHT: i32 = SECTION_HEIGHT * TILE_SIZE;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColorRGB {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorRGB {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Position on the map grid, in tiles. Either component may be negative or lie
/// past the end of the map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TilePos {
    pub row: i32,
    pub col: i32,
}

impl TilePos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Generic 2D integer point, used for pixel positions and pixel deltas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersection of two rectangles; empty rectangles come back with zero size.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        if right <= left || bottom <= top {
            return Rect::new(left, top, 0, 0);
        }
        Rect::new(left, top, right - left, bottom - top)
    }
}
