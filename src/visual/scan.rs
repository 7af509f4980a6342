//! Scanline position of the scrolling waterfall.
//!
//! New rows are written bottom-up: the scan row starts at the last row,
//! moves up by one per unpaused frame and wraps back to the bottom once it
//! passes the top. The wrap is the only periodic event the display has.

use super::error::VisualError;

/// Emitted when the scan row wraps from the top back to the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrapped;

/// Current scan row and the height it wraps at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanState {
    row: usize,
    height: usize,
}

impl ScanState {
    /// Starts scanning at the bottom row of a surface `height` rows tall.
    ///
    /// # Errors
    /// - If `height` is zero
    pub fn new(height: usize) -> Result<Self, VisualError> {
        if height == 0 {
            return Err(VisualError::InvalidDimensions { width: 0, height });
        }
        Ok(Self {
            row: height - 1,
            height,
        })
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Moves one row up unless `paused`.
    ///
    /// Returns `Some(Wrapped)` when the move took the row past the top.
    pub fn advance(&mut self, paused: bool) -> Option<Wrapped> {
        if paused {
            return None;
        }
        if self.row == 0 {
            self.row = self.height - 1;
            Some(Wrapped)
        } else {
            self.row -= 1;
            None
        }
    }

    /// Restarts at the bottom of a surface of the new height.
    ///
    /// # Errors
    /// - If `height` is zero; the current state is left untouched
    pub fn on_resize(&mut self, height: usize) -> Result<(), VisualError> {
        *self = Self::new(height)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_bottom() {
        let scan = ScanState::new(24).unwrap();
        assert_eq!(scan.row(), 23);
        assert!(ScanState::new(0).is_err());
    }

    #[test]
    fn test_full_cycle_wraps_once() {
        for height in [1, 2, 17, 480] {
            let mut scan = ScanState::new(height).unwrap();
            let wraps = (0..height)
                .filter_map(|_| scan.advance(false))
                .count();
            assert_eq!(wraps, 1);
            assert_eq!(scan.row(), height - 1);
        }
    }

    #[test]
    fn test_wrap_happens_on_leaving_top_row() {
        let mut scan = ScanState::new(3).unwrap();
        assert_eq!(scan.advance(false), None);
        assert_eq!(scan.advance(false), None);
        assert_eq!(scan.row(), 0);
        assert_eq!(scan.advance(false), Some(Wrapped));
        assert_eq!(scan.row(), 2);
    }

    #[test]
    fn test_paused_never_moves() {
        let mut scan = ScanState::new(10).unwrap();
        scan.advance(false);
        for _ in 0..100 {
            assert_eq!(scan.advance(true), None);
        }
        assert_eq!(scan.row(), 8);
    }

    #[test]
    fn test_resize_resets_row() {
        let mut scan = ScanState::new(100).unwrap();
        for _ in 0..30 {
            scan.advance(false);
        }
        scan.on_resize(50).unwrap();
        assert_eq!(scan.row(), 49);
        assert_eq!(scan.height(), 50);
    }

    #[test]
    fn test_zero_height_resize_is_rejected() {
        let mut scan = ScanState::new(10).unwrap();
        scan.advance(false);
        assert!(scan.on_resize(0).is_err());
        assert_eq!(scan.row(), 8);
        assert_eq!(scan.height(), 10);
    }
}
