use std::{
    path::{Path, PathBuf},
    sync::mpsc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use notify::{RecursiveMode, Watcher};

use tilescroll::{
    common::{Point, TilePos, QUAD_HEIGHT, QUAD_WIDTH},
    message::Message,
    persist,
    state::{self, Config, Session},
    update::update,
};

#[derive(Parser)]
#[command(name = "tilescroll")]
#[command(version, about = "Headless viewer for scrolling tile map cartridges", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a summary of each cartridge matching the given glob patterns
    Info {
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Scroll across a cartridge, writing one PNG per frame
    Render {
        /// Path to the cartridge image
        cart: PathBuf,

        /// Number of frames to write
        #[arg(long)]
        frames: Option<u32>,

        /// Horizontal scroll per frame, in pixels
        #[arg(long, allow_hyphen_values = true)]
        dx: Option<i32>,

        /// Vertical scroll per frame, in pixels
        #[arg(long, allow_hyphen_values = true)]
        dy: Option<i32>,

        /// Map row under the view's top-left at the first frame
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        start_row: i32,

        /// Map column under the view's top-left at the first frame
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        start_col: i32,

        /// Output directory for frames
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Move a target by (dx, dy) each frame and let the camera follow it
        #[arg(long)]
        follow: bool,
    },

    /// Re-render a snapshot whenever the cartridge changes on disk
    Watch {
        /// Path to the cartridge image
        cart: PathBuf,

        /// Output directory for snapshots
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show or create the config file
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn config_path(cli_path: &Option<PathBuf>) -> Result<PathBuf> {
    match cli_path {
        Some(path) => Ok(path.clone()),
        None => state::get_config_path(),
    }
}

fn info(patterns: &[String]) -> Result<()> {
    let mut found = 0;
    for pattern in patterns {
        for entry in glob::glob(pattern).with_context(|| format!("Bad pattern {pattern}"))? {
            let path = entry?;
            found += 1;
            match persist::load_cartridge(&path) {
                Ok(cart) => {
                    println!("{}:", path.display());
                    println!("  tiles:              {}", cart.tiles.len());
                    println!("  sections:           {}", cart.map.sections().len());
                    println!("  attribute sections: {}", cart.map.attr_sections().len());
                    println!(
                        "  map:                {}x{} sections",
                        cart.map.map_width(),
                        cart.map.map_height()
                    );
                    println!("  palettes:           {}", serde_json::to_string(&cart.palettes)?);
                }
                Err(e) => error!("{}: {:#}", path.display(), e),
            }
        }
    }
    if found == 0 {
        bail!("No cartridges matched {}", patterns.join(" "));
    }
    Ok(())
}

fn render(mut session: Session, follow: bool) -> Result<()> {
    let config = session.config.clone();
    let step = Point::new(config.scroll_dx, config.scroll_dy);
    let mut target = session.buffer.view_origin() + Point::new(QUAD_WIDTH / 2, QUAD_HEIGHT / 2);
    let mut total_redraw = 0;
    for frame in 0..config.frames {
        if frame > 0 {
            let message = if follow {
                target = target + step;
                Message::Follow(target)
            } else {
                Message::Scroll {
                    dx: step.x,
                    dy: step.y,
                }
            };
            if !update(&mut session, message) {
                bail!("Stopped at frame {frame}");
            }
            total_redraw += session.last_redraw;
        }
        let path = persist::frame_path(&config.output_dir, frame);
        if !update(&mut session, Message::Snapshot(path)) {
            bail!("Stopped at frame {frame}");
        }
    }
    info!(
        "Wrote {} frames to {}, {} cells repainted while scrolling",
        config.frames,
        config.output_dir.display(),
        total_redraw
    );
    Ok(())
}

fn watch(mut session: Session) -> Result<()> {
    let snapshot = session.config.output_dir.join("snapshot.png");
    update(&mut session, Message::Snapshot(snapshot.clone()));

    let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
    let mut watcher = notify::recommended_watcher(tx)?;
    watcher.watch(&session.cartridge_path, RecursiveMode::NonRecursive)?;
    info!("Watching {}", session.cartridge_path.display());

    for res in rx {
        match res {
            Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                if update(&mut session, Message::Reload) {
                    update(&mut session, Message::Snapshot(snapshot.clone()));
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Watch error: {}", e),
        }
    }
    Ok(())
}

fn init_config(path: &Path, init: bool) -> Result<()> {
    if path.exists() || !init {
        let config = persist::load_config(path)?;
        println!("{}", path.display());
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    persist::save_config(path, &Config::default())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config_path = config_path(&cli.config_file)?;
    match cli.command {
        Commands::Info { patterns } => info(&patterns),
        Commands::Render {
            cart,
            frames,
            dx,
            dy,
            start_row,
            start_col,
            out,
            follow,
        } => {
            let mut config = persist::load_config(&config_path)?;
            config.frames = frames.unwrap_or(config.frames);
            config.scroll_dx = dx.unwrap_or(config.scroll_dx);
            config.scroll_dy = dy.unwrap_or(config.scroll_dy);
            config.output_dir = out.unwrap_or(config.output_dir);
            let session = Session::open(&cart, config, TilePos::new(start_row, start_col))?;
            render(session, follow)
        }
        Commands::Watch { cart, out } => {
            let mut config = persist::load_config(&config_path)?;
            config.output_dir = out.unwrap_or(config.output_dir);
            let session = Session::open(&cart, config, TilePos::default())?;
            watch(session)
        }
        Commands::Config { init } => init_config(&config_path, init),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run(Cli::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
