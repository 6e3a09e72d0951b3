use std::fmt;

/// A cartridge image that cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    HeaderTooShort(usize),
    OffsetsOutOfOrder { index: usize, offset: usize, previous: usize },
    OffsetPastEnd { index: usize, offset: usize, len: usize },
    PaletteTooShort(usize),
    MapMapTooShort { expected: usize, actual: usize },
    SectionMissing { position: usize, section: usize, available: usize },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderTooShort(len) => {
                write!(f, "cartridge is {len} bytes, shorter than its 20-byte header")
            }
            Self::OffsetsOutOfOrder {
                index,
                offset,
                previous,
            } => write!(
                f,
                "header offset {index} (0x{offset:X}) precedes the previous offset (0x{previous:X})"
            ),
            Self::OffsetPastEnd { index, offset, len } => write!(
                f,
                "header offset {index} (0x{offset:X}) is past the end of the {len}-byte cartridge"
            ),
            Self::PaletteTooShort(len) => {
                write!(f, "palette section is {len} bytes, expected at least 13")
            }
            Self::MapMapTooShort { expected, actual } => write!(
                f,
                "mapmap section holds {actual} bytes, expected {expected}"
            ),
            Self::SectionMissing {
                position,
                section,
                available,
            } => write!(
                f,
                "mapmap entry {position} refers to section {section}, but only {available} exist"
            ),
        }
    }
}

impl std::error::Error for FormatError {}

/// An explicit index that falls outside the loaded asset data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    Tile { index: usize, len: usize },
    Section { index: usize, len: usize },
    // A view origin, in map pixels, too far out for the ring's tile arithmetic.
    Position { x: i64, y: i64 },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tile { index, len } => {
                write!(f, "tile index {index} out of range (catalog holds {len})")
            }
            Self::Section { index, len } => {
                write!(f, "section index {index} out of range (map holds {len})")
            }
            Self::Position { x, y } => {
                write!(f, "view origin ({x}, {y}) is outside the addressable map area")
            }
        }
    }
}

impl std::error::Error for LookupError {}
