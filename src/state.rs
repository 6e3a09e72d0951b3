use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    camera::{Camera, FollowMode},
    cartridge::Cartridge,
    common::TilePos,
    persist,
    rasterizer::Rasterizer,
    scroll::{ScrollBuffer, RING_COLS, RING_ROWS},
    surface::PixelBuffer,
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    pub frames: u32,
    // Per-frame scroll in pixels.
    pub scroll_dx: i32,
    pub scroll_dy: i32,
    pub follow_mode: FollowMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("frames"),
            frames: 60,
            scroll_dx: 1,
            scroll_dy: 0,
            follow_mode: FollowMode::Center,
        }
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "tilescroll")
        .context("Unable to open config directory.")?;
    Ok(project_dirs.config_dir().join("config.json"))
}

/// A loaded cartridge and the view scrolling over it.
pub struct Session {
    pub cartridge_path: PathBuf,
    pub config: Config,
    pub buffer: ScrollBuffer<PixelBuffer>,
    pub camera: Camera,
    pub frame: PixelBuffer,
    // Cells repainted by the most recent scroll, reload or initial paint.
    pub last_redraw: usize,
}

impl Session {
    pub fn open(path: &Path, config: Config, start: TilePos) -> Result<Self> {
        let cartridge = persist::load_cartridge(path)?;
        Self::new(path.to_owned(), cartridge, config, start)
    }

    pub fn new(
        cartridge_path: PathBuf,
        cartridge: Cartridge,
        config: Config,
        start: TilePos,
    ) -> Result<Self> {
        let buffer = ScrollBuffer::new(Arc::new(cartridge), Rasterizer::new(), start)
            .with_context(|| format!("Unable to draw {}", cartridge_path.display()))?;
        let camera = Camera::new(buffer.view_origin(), config.follow_mode);
        Ok(Self {
            cartridge_path,
            config,
            buffer,
            camera,
            frame: ScrollBuffer::<PixelBuffer>::view_surface(),
            last_redraw: (RING_COLS * RING_ROWS) as usize,
        })
    }

    /// Composite the current view into `self.frame`.
    pub fn render_frame(&mut self) -> &PixelBuffer {
        self.buffer.render(&mut self.frame);
        &self.frame
    }
}
