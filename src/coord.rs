// Wraparound coordinate over the 2x2 quadrant ring used by the scroll buffer.
use crate::common::{Point, QUAD_HEIGHT, QUAD_WIDTH, SECTION_HEIGHT, SECTION_WIDTH, TILE_SIZE};

// Full ring extent, in pixels.
pub const RING_WIDTH: i32 = 2 * QUAD_WIDTH;
pub const RING_HEIGHT: i32 = 2 * QUAD_HEIGHT;

/// A position inside the quadrant ring, decomposed into the quadrant it falls
/// in, the tile within that quadrant and the pixel within that tile.
///
/// Every component stays normalized: `quadrant` is 0 or 1 on each axis,
/// `tile` lies within one section and `pixel` within one tile. Moving past
/// either edge of the ring wraps around to the opposite edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocalCoord {
    quadrant: Point,
    tile: Point,
    pixel: Point,
}

// Split a ring-local pixel offset along one axis into (quadrant, tile, pixel).
fn decompose(total: i32, quad_extent: i32) -> (i32, i32, i32) {
    let quadrant = total / quad_extent;
    let in_quadrant = total % quad_extent;
    (quadrant, in_quadrant / TILE_SIZE, in_quadrant % TILE_SIZE)
}

impl LocalCoord {
    pub fn new(quadrant: Point, tile: Point, pixel: Point) -> Self {
        Self::default().moved(
            quadrant.x * QUAD_WIDTH + tile.x * TILE_SIZE + pixel.x,
            quadrant.y * QUAD_HEIGHT + tile.y * TILE_SIZE + pixel.y,
        )
    }

    pub fn quadrant(&self) -> Point {
        self.quadrant
    }

    pub fn tile(&self) -> Point {
        self.tile
    }

    pub fn pixel(&self) -> Point {
        self.pixel
    }

    /// Row-major index (0-3) of the quadrant holding this coordinate.
    pub fn quadrant_index(&self) -> usize {
        (self.quadrant.y * 2 + self.quadrant.x) as usize
    }

    /// Offset of this coordinate inside its quadrant, in pixels.
    pub fn in_quadrant_pixels(&self) -> Point {
        Point::new(
            self.tile.x * TILE_SIZE + self.pixel.x,
            self.tile.y * TILE_SIZE + self.pixel.y,
        )
    }

    /// Flat pixel offset from ring-local (0, 0).
    pub fn as_pixels(&self) -> Point {
        Point::new(
            self.quadrant.x * QUAD_WIDTH + self.tile.x * TILE_SIZE + self.pixel.x,
            self.quadrant.y * QUAD_HEIGHT + self.tile.y * TILE_SIZE + self.pixel.y,
        )
    }

    /// Flat tile offset from ring-local (0, 0).
    pub fn as_tiles(&self) -> Point {
        Point::new(
            self.quadrant.x * SECTION_WIDTH + self.tile.x,
            self.quadrant.y * SECTION_HEIGHT + self.tile.y,
        )
    }

    /// A new coordinate displaced by `(dx, dy)` pixels, wrapped into the ring.
    pub fn moved(&self, dx: i32, dy: i32) -> LocalCoord {
        let total = self.as_pixels();
        // Both terms are below the ring extent, so the sum cannot overflow.
        let x = (total.x + dx.rem_euclid(RING_WIDTH)) % RING_WIDTH;
        let y = (total.y + dy.rem_euclid(RING_HEIGHT)) % RING_HEIGHT;
        let (qx, tx, px) = decompose(x, QUAD_WIDTH);
        let (qy, ty, py) = decompose(y, QUAD_HEIGHT);
        LocalCoord {
            quadrant: Point::new(qx, qy),
            tile: Point::new(tx, ty),
            pixel: Point::new(px, py),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_normalized(c: &LocalCoord) {
        assert!((0..2).contains(&c.quadrant().x), "{c:?}");
        assert!((0..2).contains(&c.quadrant().y), "{c:?}");
        assert!((0..SECTION_WIDTH).contains(&c.tile().x), "{c:?}");
        assert!((0..SECTION_HEIGHT).contains(&c.tile().y), "{c:?}");
        assert!((0..TILE_SIZE).contains(&c.pixel().x), "{c:?}");
        assert!((0..TILE_SIZE).contains(&c.pixel().y), "{c:?}");
    }

    #[test]
    fn decomposes_small_moves() {
        let c = LocalCoord::default().moved(13, 9);
        assert_eq!(c.quadrant(), Point::new(0, 0));
        assert_eq!(c.tile(), Point::new(1, 1));
        assert_eq!(c.pixel(), Point::new(5, 1));
        assert_eq!(c.as_pixels(), Point::new(13, 9));
        assert_eq!(c.as_tiles(), Point::new(1, 1));
    }

    #[test]
    fn crosses_into_next_quadrant() {
        let c = LocalCoord::default().moved(QUAD_WIDTH + 8, QUAD_HEIGHT);
        assert_eq!(c.quadrant(), Point::new(1, 1));
        assert_eq!(c.tile(), Point::new(1, 0));
        assert_eq!(c.quadrant_index(), 3);
        assert_eq!(c.as_tiles(), Point::new(SECTION_WIDTH + 1, SECTION_HEIGHT));
    }

    #[test]
    fn negative_moves_wrap_to_far_edge() {
        let c = LocalCoord::default().moved(-1, -1);
        assert_eq!(c.as_pixels(), Point::new(RING_WIDTH - 1, RING_HEIGHT - 1));
        assert_eq!(c.quadrant(), Point::new(1, 1));
        assert_eq!(c.tile(), Point::new(SECTION_WIDTH - 1, SECTION_HEIGHT - 1));
        assert_eq!(c.pixel(), Point::new(7, 7));
    }

    #[test]
    fn stays_normalized_for_any_delta() {
        let deltas = [
            0, 1, -1, 7, -7, 8, -8, 255, -255, 256, -256, 511, -511, 512, -513, 4097, -9999,
            i32::MAX,
            i32::MIN,
            i32::MAX - 3,
            i32::MIN + 1,
        ];
        let starts = [
            LocalCoord::default(),
            LocalCoord::default().moved(300, 200),
            LocalCoord::default().moved(-3, 479),
        ];
        for start in starts {
            for &dx in &deltas {
                for &dy in &deltas {
                    let c = start.moved(dx, dy);
                    assert_normalized(&c);
                }
            }
        }
    }

    #[test]
    fn moves_are_additive() {
        let start = LocalCoord::default().moved(37, 11);
        for (a, b) in [(5, 9), (-40, 13), (300, 300), (-600, 77), (511, -1)] {
            assert_eq!(start.moved(a, 0).moved(b, 0), start.moved(a + b, 0));
            assert_eq!(start.moved(0, a).moved(0, b), start.moved(0, a + b));
        }
    }

    #[test]
    fn extreme_deltas_wrap_like_their_remainder() {
        let start = LocalCoord::default().moved(100, 0);
        let c = start.moved(i32::MAX, i32::MIN);
        assert_eq!(
            c,
            start.moved(i32::MAX.rem_euclid(RING_WIDTH), i32::MIN.rem_euclid(RING_HEIGHT))
        );
        assert_normalized(&c);
    }

    #[test]
    fn new_normalizes_components() {
        let c = LocalCoord::new(Point::new(0, 0), Point::new(SECTION_WIDTH, 0), Point::new(9, 0));
        assert_eq!(c.quadrant(), Point::new(1, 0));
        assert_eq!(c.tile(), Point::new(1, 0));
        assert_eq!(c.pixel(), Point::new(1, 0));
    }
}
