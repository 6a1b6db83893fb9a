use crate::config::{CameraConfig, CameraMode};
use crate::gfx::{math::Vec3, render::Transform};
use log::debug;

// Closer than this to the target counts as arrived.
const SNAP_DISTANCE: f32 = 1e-3;

/// View collaborator. In follow mode it eases toward the middle of the road.
pub struct CameraRig {
    config: CameraConfig,
    transform: Transform,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Self {
        let transform = Transform::at(config.position).with_rotation(config.rotation);
        Self { config, transform }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Where the camera wants to be for a road centred at `road_center`.
    fn target(&self, road_center: Vec3) -> Vec3 {
        match self.config.mode {
            CameraMode::Fixed => self.config.position,
            CameraMode::FollowRoad => road_center + self.config.road_offset,
        }
    }

    pub fn update(&mut self, dt: f32, road_center: Vec3) {
        let target = self.target(road_center);
        let position = self.transform.position;
        if position == target {
            return;
        }
        let k = 1.0 - (-self.config.follow_smoothness.max(0.0) * dt.max(0.0)).exp();
        let next = position.lerp(target, k);
        if next.distance(target) < SNAP_DISTANCE {
            debug!("[Camera] Settled at {}", target);
            self.transform.position = target;
        } else {
            self.transform.position = next;
        }
    }

    /// Snaps straight back to the configured pose.
    pub fn reset(&mut self) {
        self.transform = Transform::at(self.config.position).with_rotation(self.config.rotation);
    }
}
