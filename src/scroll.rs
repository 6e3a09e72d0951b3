// Incremental raster cache for a scrolling view over the map.
//
// Four section-sized buffers form a 2x2 ring that holds the map tiles in
// [view_col, view_col + 64) x [view_row, view_row + 60), where (view_row,
// view_col) is the map tile under the view's top-left corner. A map tile
// always lives at ring position ((col - map_offset.col) mod 64,
// (row - map_offset.row) mod 60), so scrolling only repaints the tiles that
// enter that window; nothing already cached is moved or redrawn.
use std::{ops::Range, sync::Arc};

use itertools::{iproduct, Itertools};
use log::debug;

use crate::{
    cartridge::Cartridge,
    common::{
        Point, Rect, TilePos, QUAD_HEIGHT, QUAD_WIDTH, SECTION_HEIGHT, SECTION_WIDTH, TILE_SIZE,
    },
    coord::LocalCoord,
    error::LookupError,
    rasterizer::Rasterizer,
    surface::Surface,
};

pub const RING_COLS: i32 = 2 * SECTION_WIDTH;
pub const RING_ROWS: i32 = 2 * SECTION_HEIGHT;

// Physical buffer playing each visual role (top-left, top-right, bottom-left,
// bottom-right), indexed by the quadrant that holds the view's top-left.
const ROLE_PERMUTATIONS: [[usize; 4]; 4] = [
    [0, 1, 2, 3],
    [1, 0, 3, 2],
    [2, 3, 0, 1],
    [3, 2, 1, 0],
];

// Map lines newly inside the window when its start moves from `old` to `new`.
fn exposed(old: i32, new: i32, extent: i32) -> Range<i32> {
    if new > old {
        (old + extent).max(new)..new + extent
    } else if new < old {
        new..old.min(new + extent)
    } else {
        new..new
    }
}

// Furthest the view's top-left tile may sit from map tile (0, 0) on either
// axis. The ring reaches one ring width either side of the view, and every
// tile it holds must keep an i32 pixel position.
const VIEW_TILE_LIMIT: i64 = (i32::MAX / TILE_SIZE - 2 * RING_COLS) as i64;

fn checked_view_origin(x: i64, y: i64) -> Result<Point, LookupError> {
    let limit = VIEW_TILE_LIMIT * TILE_SIZE as i64;
    if x.abs() > limit || y.abs() > limit {
        return Err(LookupError::Position { x, y });
    }
    Ok(Point::new(x as i32, y as i32))
}

// Every map tile held by the ring when the view starts on `view`.
fn ring_cells(view: TilePos) -> impl Iterator<Item = TilePos> {
    iproduct!(view.row..view.row + RING_ROWS, view.col..view.col + RING_COLS)
        .map(|(row, col)| TilePos::new(row, col))
}

// Tiles entering the ring when the view moves from `old` to `view`: the
// exposed columns over every ring row, then the exposed rows over the
// remaining columns.
fn exposed_cells(old: TilePos, view: TilePos) -> Vec<TilePos> {
    let cols = exposed(old.col, view.col, RING_COLS);
    let rows = exposed(old.row, view.row, RING_ROWS);
    let mut cells = iproduct!(cols.clone(), view.row..view.row + RING_ROWS)
        .map(|(col, row)| TilePos::new(row, col))
        .collect_vec();
    cells.extend(
        iproduct!(rows, view.col..view.col + RING_COLS)
            .filter(|(_, col)| !cols.contains(col))
            .map(|(row, col)| TilePos::new(row, col)),
    );
    cells
}

// Fails on the first non-empty cell whose tile is missing from the catalog.
fn check_tiles(
    cartridge: &Cartridge,
    cells: impl IntoIterator<Item = TilePos>,
) -> Result<(), LookupError> {
    for pos in cells {
        let tile_id = cartridge.map.get_tile(pos);
        if tile_id != 0 {
            cartridge.tiles.get(tile_id as usize - 1)?;
        }
    }
    Ok(())
}

pub struct ScrollBuffer<S> {
    cartridge: Arc<Cartridge>,
    rasterizer: Rasterizer<S>,
    quadrants: [S; 4],
    coord: LocalCoord,
    map_offset: TilePos,
}

impl<S: Surface> ScrollBuffer<S> {
    /// Build the ring with the view's top-left on map tile `origin`, painting
    /// every cell once.
    pub fn new(
        cartridge: Arc<Cartridge>,
        rasterizer: Rasterizer<S>,
        origin: TilePos,
    ) -> Result<Self, LookupError> {
        checked_view_origin(
            origin.col as i64 * TILE_SIZE as i64,
            origin.row as i64 * TILE_SIZE as i64,
        )?;
        let mut buffer = Self {
            cartridge,
            rasterizer,
            quadrants: std::array::from_fn(|_| S::blank(QUAD_WIDTH, QUAD_HEIGHT)),
            coord: LocalCoord::default(),
            map_offset: origin,
        };
        buffer.redraw_all()?;
        Ok(buffer)
    }

    /// A surface sized for `render`.
    pub fn view_surface() -> S {
        S::blank(QUAD_WIDTH, QUAD_HEIGHT)
    }

    pub fn cartridge(&self) -> &Arc<Cartridge> {
        &self.cartridge
    }

    pub fn rasterizer(&self) -> &Rasterizer<S> {
        &self.rasterizer
    }

    pub fn quadrants(&self) -> &[S; 4] {
        &self.quadrants
    }

    pub fn coord(&self) -> LocalCoord {
        self.coord
    }

    /// Map tile corresponding to ring-local tile (0, 0).
    pub fn map_offset(&self) -> TilePos {
        self.map_offset
    }

    /// Map tile under the view's top-left pixel.
    pub fn view_tile(&self) -> TilePos {
        let tiles = self.coord.as_tiles();
        TilePos::new(self.map_offset.row + tiles.y, self.map_offset.col + tiles.x)
    }

    /// Absolute map pixel at the view's top-left.
    pub fn view_origin(&self) -> Point {
        let pixels = self.coord.as_pixels();
        Point::new(
            self.map_offset.col * TILE_SIZE + pixels.x,
            self.map_offset.row * TILE_SIZE + pixels.y,
        )
    }

    /// Translate an absolute map pixel into view coordinates.
    pub fn map_to_view(&self, map_point: Point) -> Point {
        map_point - self.view_origin()
    }

    /// Swap in a reloaded cartridge. Cached tiles are dropped and the whole ring
    /// is repainted at the current position. A cartridge missing any tile the
    /// ring needs is rejected and the buffer keeps the old one.
    pub fn reload(&mut self, cartridge: Arc<Cartridge>) -> Result<usize, LookupError> {
        check_tiles(&cartridge, ring_cells(self.view_tile()))?;
        self.cartridge = cartridge;
        self.rasterizer.clear();
        self.redraw_all()
    }

    /// Repaint every cell of the ring. Returns the number of cells painted.
    pub fn redraw_all(&mut self) -> Result<usize, LookupError> {
        let view = self.view_tile();
        check_tiles(&self.cartridge, ring_cells(view))?;
        let mut painted = 0;
        for pos in ring_cells(view) {
            self.paint(pos)?;
            painted += 1;
        }
        Ok(painted)
    }

    /// Move the view by `(dx, dy)` pixels and repaint the tiles that entered the
    /// cached window. Returns the number of cells painted. On error the view
    /// and the ring are left as they were.
    pub fn scroll(&mut self, dx: i32, dy: i32) -> Result<usize, LookupError> {
        let old_view = self.view_tile();
        let current = self.view_origin();
        let origin =
            checked_view_origin(current.x as i64 + dx as i64, current.y as i64 + dy as i64)?;
        let view = TilePos::new(origin.y.div_euclid(TILE_SIZE), origin.x.div_euclid(TILE_SIZE));
        let cells = exposed_cells(old_view, view);
        check_tiles(&self.cartridge, cells.iter().copied())?;

        self.coord = self.coord.moved(dx, dy);
        let tiles = self.coord.as_tiles();
        // Only ever changes by whole ring widths, so cached cells stay valid.
        self.map_offset = TilePos::new(view.row - tiles.y, view.col - tiles.x);
        for &pos in &cells {
            self.paint(pos)?;
        }
        debug!(
            "scroll ({dx}, {dy}): view at tile {},{}, repainted {} cells",
            view.row,
            view.col,
            cells.len()
        );
        Ok(cells.len())
    }

    /// Ring position caching map tile `pos`.
    pub fn ring_position(&self, pos: TilePos) -> Point {
        Point::new(
            (pos.col - self.map_offset.col).rem_euclid(RING_COLS),
            (pos.row - self.map_offset.row).rem_euclid(RING_ROWS),
        )
    }

    fn paint(&mut self, pos: TilePos) -> Result<(), LookupError> {
        let ring = self.ring_position(pos);
        let quadrant = ((ring.y / SECTION_HEIGHT) * 2 + ring.x / SECTION_WIDTH) as usize;
        let cell = Rect::new(
            (ring.x % SECTION_WIDTH) * TILE_SIZE,
            (ring.y % SECTION_HEIGHT) * TILE_SIZE,
            TILE_SIZE,
            TILE_SIZE,
        );

        let cart = &self.cartridge;
        let target = &mut self.quadrants[quadrant];
        target.fill(cart.palettes.lookup_universal_background_color(), cell);
        let tile_id = cart.map.get_tile(pos);
        if tile_id != 0 {
            let attr = cart.map.get_attr(pos);
            let tile = self
                .rasterizer
                .surface_for_tile(&cart.tiles, &cart.palettes, tile_id, attr)?;
            target.blit(tile, Point::new(cell.x, cell.y), None);
        }
        Ok(())
    }

    /// Composite the current view into `target` (at least one section in size).
    pub fn render(&self, target: &mut S) {
        let roles = ROLE_PERMUTATIONS[self.coord.quadrant_index()];
        let offset = self.coord.in_quadrant_pixels();
        let width = QUAD_WIDTH - offset.x;
        let height = QUAD_HEIGHT - offset.y;
        let slices = [
            (Rect::new(offset.x, offset.y, width, height), Point::new(0, 0)),
            (Rect::new(0, offset.y, offset.x, height), Point::new(width, 0)),
            (Rect::new(offset.x, 0, width, offset.y), Point::new(0, height)),
            (Rect::new(0, 0, offset.x, offset.y), Point::new(width, height)),
        ];
        for (role, (area, dest)) in slices.into_iter().enumerate() {
            if !area.is_empty() {
                target.blit(&self.quadrants[roles[role]], dest, Some(area));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposed_ranges() {
        assert_eq!(exposed(0, 1, 64), 64..65);
        assert_eq!(exposed(10, 7, 64), 7..10);
        assert_eq!(exposed(5, 5, 64), 5..5);
        // Jumps further than the window repaint the whole window once.
        assert_eq!(exposed(0, 100, 64), 100..164);
        assert_eq!(exposed(100, 0, 64), 0..64);
    }

    #[test]
    fn exposed_cells_cover_strip_once() {
        let cells = exposed_cells(TilePos::new(0, 0), TilePos::new(1, 1));
        assert_eq!(cells.len(), (RING_ROWS + RING_COLS - 1) as usize);
        assert!(cells.iter().all_unique());
        assert!(cells.contains(&TilePos::new(RING_ROWS, RING_COLS)));
        assert!(cells.contains(&TilePos::new(1, RING_COLS)));
        assert!(cells.contains(&TilePos::new(RING_ROWS, 1)));
    }

    #[test]
    fn view_origin_limits() {
        let limit = VIEW_TILE_LIMIT * TILE_SIZE as i64;
        assert!(checked_view_origin(limit, -limit).is_ok());
        assert_eq!(
            checked_view_origin(limit + 1, 0),
            Err(LookupError::Position { x: limit + 1, y: 0 })
        );
        // The furthest ring tile still has a pixel position.
        assert!((VIEW_TILE_LIMIT + RING_COLS as i64 + 1) * TILE_SIZE as i64 <= i32::MAX as i64);
    }

    #[test]
    fn permutations_swap_by_parity() {
        for (quadrant, roles) in ROLE_PERMUTATIONS.iter().enumerate() {
            for (role, &buffer) in roles.iter().enumerate() {
                assert_eq!(buffer, quadrant ^ role);
            }
        }
    }
}
