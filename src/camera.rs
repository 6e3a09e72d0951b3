use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::common::{Point, QUAD_HEIGHT, QUAD_WIDTH};

#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum FollowMode {
    #[default]
    Center = 0,
    Static = 1,
}

/// Tracks the view's top-left in map pixels and turns target movement into
/// scroll deltas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Camera {
    pub position: Point,
    pub mode: FollowMode,
}

impl Camera {
    pub fn new(position: Point, mode: FollowMode) -> Self {
        Self { position, mode }
    }

    /// Point the camera at `target` and return how far the view has to scroll.
    pub fn follow(&mut self, target: Point) -> Point {
        match self.mode {
            FollowMode::Static => Point::default(),
            FollowMode::Center => {
                let new_position = Point::new(
                    target.x.saturating_sub(QUAD_WIDTH / 2),
                    target.y.saturating_sub(QUAD_HEIGHT / 2),
                );
                let delta = Point::new(
                    new_position.x.saturating_sub(self.position.x),
                    new_position.y.saturating_sub(self.position.y),
                );
                self.position = new_position;
                delta
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_mode_keeps_target_centered() {
        let mut camera = Camera::new(Point::new(0, 0), FollowMode::Center);
        let delta = camera.follow(Point::new(QUAD_WIDTH / 2 + 5, QUAD_HEIGHT / 2 - 3));
        assert_eq!(delta, Point::new(5, -3));
        let same = camera.follow(Point::new(QUAD_WIDTH / 2 + 5, QUAD_HEIGHT / 2 - 3));
        assert_eq!(same, Point::default());
    }

    #[test]
    fn far_targets_saturate() {
        let mut camera = Camera::new(Point::new(10, 0), FollowMode::Center);
        let delta = camera.follow(Point::new(i32::MIN, i32::MAX));
        assert_eq!(camera.position, Point::new(i32::MIN, i32::MAX - QUAD_HEIGHT / 2));
        assert_eq!(delta, Point::new(i32::MIN, i32::MAX - QUAD_HEIGHT / 2));
    }

    #[test]
    fn static_mode_never_scrolls() {
        let mut camera = Camera::new(Point::new(40, 40), FollowMode::Static);
        assert_eq!(camera.follow(Point::new(1000, 1000)), Point::default());
        assert_eq!(camera.position, Point::new(40, 40));
    }

    #[test]
    fn follow_mode_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&FollowMode::Static).expect("serialize"), "1");
        let mode: FollowMode = serde_json::from_str("0").expect("deserialize");
        assert_eq!(mode, FollowMode::Center);
    }
}
