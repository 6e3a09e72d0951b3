use std::path::PathBuf;

use crate::common::Point;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Scroll the view by a pixel delta.
    Scroll { dx: i32, dy: i32 },
    /// Move the camera target to an absolute map pixel.
    Follow(Point),
    /// Re-read the cartridge from disk.
    Reload,
    /// Write the current view to a PNG file.
    Snapshot(PathBuf),
}
