use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info};

use crate::{message::Message, persist, state::Session};

/// Apply a message to the session. Failures are logged and leave the session
/// usable; returns whether the message was applied.
pub fn update(session: &mut Session, message: Message) -> bool {
    let description = format!("{message:?}");
    match handle(session, message) {
        Ok(()) => true,
        Err(e) => {
            error!("Error handling {}: {}\n{}", description, e, e.backtrace());
            false
        }
    }
}

fn handle(session: &mut Session, message: Message) -> Result<()> {
    match message {
        Message::Scroll { dx, dy } => {
            session.last_redraw = session.buffer.scroll(dx, dy)?;
            session.camera.position = session.buffer.view_origin();
        }
        Message::Follow(target) => {
            // The camera only moves once the buffer has accepted the scroll.
            let mut camera = session.camera;
            let delta = camera.follow(target);
            session.last_redraw = session.buffer.scroll(delta.x, delta.y)?;
            session.camera = camera;
        }
        Message::Reload => {
            // A cartridge that fails to load or to draw leaves the previous one on screen.
            let cartridge = persist::load_cartridge(&session.cartridge_path)?;
            session.last_redraw = session.buffer.reload(Arc::new(cartridge))?;
            info!(
                "Reloaded {}, repainted {} cells",
                session.cartridge_path.display(),
                session.last_redraw
            );
        }
        Message::Snapshot(path) => {
            let frame = session.render_frame();
            persist::save_png(&path, frame)
                .with_context(|| format!("Unable to write snapshot {}", path.display()))?;
        }
    }
    Ok(())
}
