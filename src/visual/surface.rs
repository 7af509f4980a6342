//! Pixel surfaces the waterfall draws into.
//!
//! A surface is a grid of cells. Each cell carries a background colour (the
//! pixel) and optionally a glyph laid over it, which is how overlay text ends
//! up on the same grid as the spectrogram.

use super::colour::Rgb8;

/// A character drawn on top of a cell's background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub symbol: char,
    pub colour: Rgb8,
}

/// One pixel of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub background: Rgb8,
    pub glyph: Option<Glyph>,
}

impl Cell {
    /// A plain pixel with no glyph.
    pub const fn solid(colour: Rgb8) -> Self {
        Self {
            background: colour,
            glyph: None,
        }
    }

    /// A glyph over a background colour.
    pub const fn text(symbol: char, colour: Rgb8, background: Rgb8) -> Self {
        Self {
            background,
            glyph: Some(Glyph { symbol, colour }),
        }
    }
}

/// Drawing surface contract used by the renderer and overlay.
///
/// Writes outside the surface are clipped silently; reads outside return
/// `None`.
pub trait Surface {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn cell(&self, x: usize, y: usize) -> Option<Cell>;

    fn set_cell(&mut self, x: usize, y: usize, cell: Cell);

    /// Background colour at `(x, y)`.
    fn pixel(&self, x: usize, y: usize) -> Option<Rgb8> {
        self.cell(x, y).map(|cell| cell.background)
    }

    /// Paints `(x, y)`, dropping any glyph that was there.
    fn set_pixel(&mut self, x: usize, y: usize, colour: Rgb8) {
        self.set_cell(x, y, Cell::solid(colour));
    }

    fn fill(&mut self, colour: Rgb8) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.set_pixel(x, y, colour);
            }
        }
    }

    /// Draws row `y` from `x0` to `x1` inclusive.
    fn draw_hline(&mut self, colour: Rgb8, x0: usize, y: usize, x1: usize) {
        if y >= self.height() || self.width() == 0 {
            return;
        }
        let end = x1.min(self.width() - 1);
        for x in x0..=end {
            self.set_pixel(x, y, colour);
        }
    }

    /// Copies all of `source` with its top-left corner at `(dst_x, dst_y)`.
    fn blit(&mut self, source: &dyn Surface, dst_x: usize, dst_y: usize) {
        for y in 0..source.height() {
            for x in 0..source.width() {
                if let Some(cell) = source.cell(x, y) {
                    self.set_cell(dst_x + x, dst_y + y, cell);
                }
            }
        }
    }
}

/// In-memory surface, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl PixelGrid {
    /// Creates a black grid. Zero-sized grids are allowed (an empty text
    /// sprite is one); the renderer refuses them as a display target.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks() refuses a zero size
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl Surface for PixelGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    fn fill(&mut self, colour: Rgb8) {
        self.cells.fill(Cell::solid(colour));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb8 = Rgb8::new(255, 0, 0);

    #[test]
    fn test_new_grid_is_black() {
        let grid = PixelGrid::new(4, 3);
        assert_eq!(grid.rows().count(), 3);
        assert!(grid
            .rows()
            .flatten()
            .all(|cell| *cell == Cell::solid(Rgb8::BLACK)));
    }

    #[test]
    fn test_out_of_bounds_access_is_clipped() {
        let mut grid = PixelGrid::new(2, 2);
        grid.set_pixel(5, 0, RED);
        grid.set_pixel(0, 5, RED);
        assert_eq!(grid.pixel(2, 0), None);
        assert!(grid.rows().flatten().all(|cell| cell.background == Rgb8::BLACK));
    }

    #[test]
    fn test_hline_is_inclusive_and_clipped() {
        let mut grid = PixelGrid::new(5, 2);
        grid.draw_hline(RED, 1, 1, 3);
        let row: Vec<Rgb8> = (0..5).map(|x| grid.pixel(x, 1).unwrap()).collect();
        assert_eq!(row, vec![Rgb8::BLACK, RED, RED, RED, Rgb8::BLACK]);

        grid.draw_hline(RED, 0, 0, 100);
        assert!((0..5).all(|x| grid.pixel(x, 0) == Some(RED)));

        // Off-surface rows are ignored
        grid.draw_hline(RED, 0, 9, 4);
    }

    #[test]
    fn test_blit_copies_glyphs_with_offset() {
        let mut sprite = PixelGrid::new(2, 1);
        sprite.set_cell(0, 0, Cell::text('h', Rgb8::WHITE, Rgb8::BLACK));
        sprite.set_cell(1, 0, Cell::text('i', Rgb8::WHITE, Rgb8::BLACK));

        let mut grid = PixelGrid::new(3, 2);
        grid.fill(RED);
        grid.blit(&sprite, 2, 1);

        assert_eq!(grid.cell(2, 1).and_then(|c| c.glyph).map(|g| g.symbol), Some('h'));
        // Second glyph falls off the right edge
        assert_eq!(grid.pixel(1, 1), Some(RED));
        assert_eq!(grid.pixel(2, 0), Some(RED));
    }

    #[test]
    fn test_set_pixel_drops_glyph() {
        let mut grid = PixelGrid::new(1, 1);
        grid.set_cell(0, 0, Cell::text('x', Rgb8::WHITE, Rgb8::BLACK));
        grid.set_pixel(0, 0, RED);
        assert_eq!(grid.cell(0, 0), Some(Cell::solid(RED)));
    }
}
