pub mod camera;
pub mod cartridge;
pub mod common;
pub mod coord;
pub mod error;
pub mod map;
pub mod message;
pub mod palette;
pub mod persist;
pub mod rasterizer;
pub mod scroll;
pub mod state;
pub mod surface;
pub mod tile;
pub mod update;
