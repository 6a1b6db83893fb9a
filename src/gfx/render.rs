use super::math::Vec3;
use crate::features::{EntityId, EntityKind};
use log::{debug, warn};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::at(Vec3::ZERO)
    }
}

/// Write-only seam to whatever draws the scene. Nothing is ever queried back.
pub trait RenderSink {
    fn create(&mut self, id: EntityId, transform: Transform);
    fn set_transform(&mut self, id: EntityId, transform: Transform);
    fn set_opacity(&mut self, id: EntityId, alpha: f32);
    fn set_text(&mut self, id: EntityId, text: &str);
    fn destroy(&mut self, id: EntityId);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub transform: Transform,
    pub opacity: f32,
    pub text: Option<String>,
}

/// Keeps the last known state of every visual and logs the traffic.
///
/// The host runs headless with this sink; tests use it to observe what the
/// core asked the renderer to do.
#[derive(Debug, Default)]
pub struct SceneLog {
    visuals: HashMap<EntityId, Visual>,
    pub created: usize,
    pub destroyed: usize,
}

impl SceneLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn visual(&self, id: EntityId) -> Option<&Visual> {
        self.visuals.get(&id)
    }

    pub fn live_count(&self) -> usize {
        self.visuals.len()
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.visuals.keys().filter(|id| id.kind == kind).count()
    }

    fn with_visual(&mut self, id: EntityId, op: &str, f: impl FnOnce(&mut Visual)) {
        match self.visuals.get_mut(&id) {
            Some(visual) => f(visual),
            None => debug!("{} on unknown visual {}", op, id),
        }
    }
}

impl RenderSink for SceneLog {
    fn create(&mut self, id: EntityId, transform: Transform) {
        debug!("create {} at {}", id, transform.position);
        let visual = Visual {
            transform,
            opacity: 1.0,
            text: None,
        };
        if self.visuals.insert(id, visual).is_some() {
            warn!("Visual {} created twice", id);
        }
        self.created += 1;
    }

    fn set_transform(&mut self, id: EntityId, transform: Transform) {
        self.with_visual(id, "set_transform", |v| v.transform = transform);
    }

    fn set_opacity(&mut self, id: EntityId, alpha: f32) {
        self.with_visual(id, "set_opacity", |v| v.opacity = alpha.clamp(0.0, 1.0));
    }

    fn set_text(&mut self, id: EntityId, text: &str) {
        self.with_visual(id, "set_text", |v| v.text = Some(text.to_string()));
    }

    fn destroy(&mut self, id: EntityId) {
        if let Some(last) = self.visuals.remove(&id) {
            debug!(
                "destroy {} at {} (opacity {:.2}, text {:?})",
                id, last.transform.position, last.opacity, last.text
            );
            self.destroyed += 1;
        } else {
            warn!("Destroy of unknown visual {}", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_lifecycle_of_visuals() {
        let mut scene = SceneLog::new();
        let id = EntityId::new(EntityKind::Star, 1);
        scene.create(id, Transform::at(Vec3::UP));
        scene.set_opacity(id, 0.25);
        assert_eq!(scene.visual(id).map(|v| v.opacity), Some(0.25));
        assert_eq!(scene.count_of(EntityKind::Star), 1);

        scene.destroy(id);
        scene.destroy(id);
        assert_eq!(scene.live_count(), 0);
        assert_eq!(scene.destroyed, 1);
    }
}
