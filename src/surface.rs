// Raster surface capability required by the scroll buffer, plus the in-memory
// RGB implementation used for headless rendering.
use crate::common::{ColorRGB, Point, Rect};

pub trait Surface {
    /// A surface of the given size, filled with black.
    fn blank(width: i32, height: i32) -> Self
    where
        Self: Sized;

    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    /// Fill `rect`, clipped to the surface.
    fn fill(&mut self, color: ColorRGB, rect: Rect);

    /// Copy `area` of `source` (all of it when `None`) so that its top-left
    /// lands on `dest`. Clipped against both surfaces.
    fn blit(&mut self, source: &Self, dest: Point, area: Option<Rect>)
    where
        Self: Sized;

    fn set_pixel(&mut self, x: i32, y: i32, color: ColorRGB) {
        self.fill(color, Rect::new(x, y, 1, 1));
    }

    fn pixel(&self, x: i32, y: i32) -> Option<ColorRGB>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: i32,
    height: i32,
    pixels: Vec<ColorRGB>,
}

impl PixelBuffer {
    pub fn pixels(&self) -> &[ColorRGB] {
        &self.pixels
    }

    /// Packed RGBA bytes, row-major, for image encoders.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * 4);
        for c in &self.pixels {
            data.extend([c.red, c.green, c.blue, 0xFF]);
        }
        data
    }

    fn offset(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }
}

impl Surface for PixelBuffer {
    fn blank(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![ColorRGB::default(); (width * height) as usize],
        }
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn fill(&mut self, color: ColorRGB, rect: Rect) {
        let clipped = rect.intersect(&self.bounds());
        for y in clipped.y..clipped.y + clipped.height {
            let start = self.offset(clipped.x, y);
            self.pixels[start..start + clipped.width as usize].fill(color);
        }
    }

    fn blit(&mut self, source: &Self, dest: Point, area: Option<Rect>) {
        let area = area.unwrap_or(source.bounds()).intersect(&source.bounds());
        if area.is_empty() {
            return;
        }
        // Clip the destination rectangle, then shift the source area to match.
        let target = Rect::new(dest.x, dest.y, area.width, area.height).intersect(&self.bounds());
        if target.is_empty() {
            return;
        }
        let src_x = area.x + (target.x - dest.x);
        let src_y = area.y + (target.y - dest.y);
        for row in 0..target.height {
            let src = source.offset(src_x, src_y + row);
            let dst = self.offset(target.x, target.y + row);
            let len = target.width as usize;
            self.pixels[dst..dst + len].copy_from_slice(&source.pixels[src..src + len]);
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: ColorRGB) {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            let i = self.offset(x, y);
            self.pixels[i] = color;
        }
    }

    fn pixel(&self, x: i32, y: i32) -> Option<ColorRGB> {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            Some(self.pixels[self.offset(x, y)])
        } else {
            None
        }
    }
}
