use std::{
    fs,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use json_pretty_compact::PrettyCompactFormatter;
use log::info;
use serde::Serialize;
use serde_json::Serializer;

use crate::{
    cartridge::Cartridge,
    state::Config,
    surface::{PixelBuffer, Surface},
};

/// Load the config file, falling back to defaults when it doesn't exist yet.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    info!("Loading config {}", path.display());
    let bytes = fs::read(path).with_context(|| format!("Unable to read {}", path.display()))?;
    let config = serde_json::from_slice(&bytes)
        .with_context(|| format!("Malformed config {}", path.display()))?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let mut bytes = vec![];
    config.serialize(&mut Serializer::with_formatter(
        &mut bytes,
        PrettyCompactFormatter::new(),
    ))?;
    let dir = path.parent().context("Config path has no parent directory")?;
    fs::create_dir_all(dir)?;
    fs::write(path, &bytes).with_context(|| format!("Unable to write {}", path.display()))?;
    info!("Saved config {}", path.display());
    Ok(())
}

pub fn load_cartridge(path: &Path) -> Result<Cartridge> {
    info!("Loading cartridge {}", path.display());
    let data = fs::read(path).with_context(|| format!("Unable to read {}", path.display()))?;
    let cart = Cartridge::load(&data)
        .with_context(|| format!("Malformed cartridge {}", path.display()))?;
    Ok(cart)
}

pub fn frame_path(dir: &Path, frame: u32) -> PathBuf {
    dir.join(format!("{frame:06}.png"))
}

pub fn save_png(path: &Path, surface: &PixelBuffer) -> Result<()> {
    info!("Saving {}", path.display());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        surface.width() as u32,
        surface.height() as u32,
    );
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&surface.to_rgba())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FollowMode;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tilescroll-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_config_gives_defaults() {
        let dir = scratch_dir("missing");
        let config = load_config(&dir.join("config.json")).expect("defaults");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn saved_config_reads_back() {
        let dir = scratch_dir("saved");
        let path = dir.join("nested").join("config.json");
        let config = Config {
            output_dir: PathBuf::from("shots"),
            frames: 12,
            scroll_dx: -3,
            scroll_dy: 2,
            follow_mode: FollowMode::Static,
        };
        save_config(&path, &config).expect("save");
        let text = fs::read_to_string(&path).expect("written");
        let raw: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(raw["follow_mode"], 1);
        assert_eq!(load_config(&path).expect("load"), config);
        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let dir = scratch_dir("partial");
        let path = dir.join("config.json");
        fs::create_dir_all(&dir).expect("dir");
        fs::write(&path, br#"{"frames": 5}"#).expect("write");
        let config = load_config(&path).expect("load");
        assert_eq!(config.frames, 5);
        assert_eq!(config.scroll_dx, Config::default().scroll_dx);
        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn frame_paths_are_zero_padded() {
        assert_eq!(
            frame_path(Path::new("out"), 7),
            Path::new("out").join("000007.png")
        );
    }
}
