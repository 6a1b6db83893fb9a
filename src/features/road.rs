use super::{Entity, EntityId, EntityKind, Step};
use crate::config::RoadConfig;
use crate::gfx::{
    anim::{Easing, Timeline},
    math::Vec3,
    render::{RenderSink, Transform},
};
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entrance {
    /// Whole segment scales up from nothing.
    Onboarding,
    /// Segment stretches out along the growth axis.
    Growth,
}

#[derive(Debug, Clone)]
pub enum SegmentPhase {
    Entering { entrance: Entrance, tl: Timeline },
    Settled,
    Removed,
}

pub struct RoadSegment {
    id: EntityId,
    transform: Transform,
    full_scale: Vec3,
    axis: Vec3,
    phase: SegmentPhase,
    /// Time past the end of the entrance on the tick it settled.
    leftover: f32,
}

impl RoadSegment {
    fn new(
        id: EntityId,
        position: Vec3,
        full_scale: Vec3,
        axis: Vec3,
        entering: Option<(Entrance, Timeline)>,
        sink: &mut dyn RenderSink,
    ) -> Self {
        let mut segment = Self {
            id,
            transform: Transform::at(position).with_scale(full_scale),
            full_scale,
            axis,
            phase: SegmentPhase::Settled,
            leftover: 0.0,
        };
        if let Some((entrance, tl)) = entering {
            segment.transform.scale = segment.scale_at(entrance, 0.0);
            segment.phase = SegmentPhase::Entering { entrance, tl };
        }
        sink.create(id, segment.transform);
        segment
    }

    fn scale_at(&self, entrance: Entrance, t: f32) -> Vec3 {
        match entrance {
            Entrance::Onboarding => self.full_scale * t,
            Entrance::Growth => {
                let a = self.axis.abs();
                Vec3::new(
                    self.full_scale.x * (1.0 - a.x + a.x * t),
                    self.full_scale.y * (1.0 - a.y + a.y * t),
                    self.full_scale.z * (1.0 - a.z + a.z * t),
                )
            }
        }
    }

    pub fn entrance(&self) -> Option<Entrance> {
        match &self.phase {
            SegmentPhase::Entering { entrance, .. } => Some(*entrance),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.phase, SegmentPhase::Settled)
    }

}

impl Entity for RoadSegment {
    fn id(&self) -> EntityId {
        self.id
    }

    fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) -> Step {
        let (entrance, t, done) = match &mut self.phase {
            SegmentPhase::Entering { entrance, tl } => {
                let t = tl.advance(dt);
                self.leftover = tl.overshoot();
                (*entrance, t, tl.is_complete())
            }
            SegmentPhase::Settled => return Step::Running,
            SegmentPhase::Removed => return Step::Idle,
        };

        self.transform.scale = if done { self.full_scale } else { self.scale_at(entrance, t) };
        sink.set_transform(self.id, self.transform);
        if done {
            debug!("[Road] {} settled", self.id);
            self.phase = SegmentPhase::Settled;
        }
        Step::Running
    }

    fn terminate(&mut self, sink: &mut dyn RenderSink) {
        if !self.is_terminal() {
            self.phase = SegmentPhase::Removed;
            sink.destroy(self.id);
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.phase, SegmentPhase::Removed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEvent {
    /// Every initial segment has finished its entrance.
    Onboarded { count: usize },
    /// A grown segment reached full length.
    Grown { count: usize },
}

/// Append-only run of road segments laid end to end from `origin`.
pub struct SegmentChain {
    config: RoadConfig,
    axis: Vec3,
    segments: Vec<RoadSegment>,
    cursor: Vec3,
    next_index: u32,
    pending_onboarding: usize,
    events: Vec<ChainEvent>,
}

impl SegmentChain {
    pub fn new(config: RoadConfig) -> Self {
        let axis = config.axis.normalize_or(Vec3::FORWARD);
        let cursor = config.origin;
        Self {
            config,
            axis,
            segments: Vec::new(),
            cursor,
            next_index: 0,
            pending_onboarding: 0,
            events: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.segments.len()
    }

    pub fn total_length(&self) -> f32 {
        self.segments.len() as f32 * self.config.segment_length
    }

    /// Midpoint of the whole span, for camera follow.
    pub fn center(&self) -> Vec3 {
        self.config.origin + self.axis * (self.total_length() / 2.0)
    }

    pub fn is_onboarding(&self) -> bool {
        self.pending_onboarding > 0
            || self.segments.iter().any(|s| s.entrance() == Some(Entrance::Onboarding))
    }

    pub fn is_growing(&self) -> bool {
        self.segments.iter().any(|s| s.entrance().is_some())
    }

    fn initial_count(&self) -> usize {
        self.config.initial_segments.min(self.config.max_segments)
    }

    /// How long the staged entrance of the initial segments takes.
    pub fn onboarding_duration(&self) -> f32 {
        self.initial_count() as f32 * self.config.onboarding_duration.max(0.0)
    }

    fn append(&mut self, entering: Option<(Entrance, Timeline)>, sink: &mut dyn RenderSink) {
        self.next_index += 1;
        let id = EntityId::new(EntityKind::RoadSegment, self.next_index);
        let full_scale = Vec3::new(self.config.road_width, 1.0, self.config.segment_length);
        let segment = RoadSegment::new(id, self.cursor, full_scale, self.axis, entering, sink);
        self.segments.push(segment);
        self.cursor += self.axis * self.config.segment_length;
    }

    fn append_onboarding(&mut self, sink: &mut dyn RenderSink) {
        self.pending_onboarding -= 1;
        let tl = Timeline::new(self.config.onboarding_duration).with_easing(Easing::SmoothStep);
        self.append(Some((Entrance::Onboarding, tl)), sink);
    }

    /// Clears the chain and lays the initial segments one after another.
    pub fn initialize(&mut self, sink: &mut dyn RenderSink) {
        self.clear(sink);
        let initial = self.initial_count();
        if initial < self.config.initial_segments {
            warn!(
                "[Road] {} initial segments requested, capped at {}",
                self.config.initial_segments, initial
            );
        }
        info!("[Road] Initializing with {} segments", initial);
        self.pending_onboarding = initial;
        if initial > 0 {
            self.append_onboarding(sink);
        }
    }

    /// Appends one segment at the cursor. Returns whether anything was added.
    pub fn grow(&mut self, sink: &mut dyn RenderSink) -> bool {
        if !self.config.extension_enabled {
            info!("[Road] Extension disabled, no segment added");
            return false;
        }
        if self.count() + self.pending_onboarding >= self.config.max_segments {
            warn!("[Road] Max of {} segments reached", self.config.max_segments);
            return false;
        }
        if self.config.smooth_transition && self.is_growing() {
            warn!("[Road] Segment still animating, extension rejected");
            return false;
        }

        info!("[Road] Extending road (segments: {})", self.count());
        if self.config.smooth_transition {
            let tl = Timeline::new(self.config.extend_duration).with_easing(self.config.extend_easing);
            self.append(Some((Entrance::Growth, tl)), sink);
        } else {
            self.append(None, sink);
            self.events.push(ChainEvent::Grown { count: self.count() });
        }
        true
    }

    pub fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) -> Vec<ChainEvent> {
        let mut settled = Vec::new();
        for segment in &mut self.segments {
            let entrance = segment.entrance();
            segment.update(dt, sink);
            if let Some(entrance) = entrance {
                if segment.is_settled() {
                    settled.push((entrance, segment.leftover));
                }
            }
        }

        for (entrance, leftover) in settled {
            match entrance {
                Entrance::Onboarding => self.continue_onboarding(leftover, sink),
                Entrance::Growth => self.events.push(ChainEvent::Grown { count: self.count() }),
            }
        }

        std::mem::take(&mut self.events)
    }

    /// Brings in the next initial segment and hands it the time the previous
    /// one did not use, so the staged entrance lasts `onboarding_duration()`.
    fn continue_onboarding(&mut self, mut carry: f32, sink: &mut dyn RenderSink) {
        while self.pending_onboarding > 0 {
            self.append_onboarding(sink);
            let Some(segment) = self.segments.last_mut() else {
                return;
            };
            segment.update(carry, sink);
            if !segment.is_settled() {
                return;
            }
            carry = segment.leftover;
        }
        info!("[Road] {} initial segments in place", self.count());
        self.events.push(ChainEvent::Onboarded { count: self.count() });
    }

    fn clear(&mut self, sink: &mut dyn RenderSink) {
        for segment in &mut self.segments {
            segment.terminate(sink);
        }
        self.segments.clear();
        self.cursor = self.config.origin;
        self.next_index = 0;
        self.pending_onboarding = 0;
        self.events.clear();
    }

    pub fn reset(&mut self, sink: &mut dyn RenderSink) {
        info!("[Road] Reset");
        self.clear(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::render::SceneLog;

    fn growing(max: usize) -> SegmentChain {
        SegmentChain::new(RoadConfig {
            extension_enabled: true,
            max_segments: max,
            initial_segments: 0,
            ..RoadConfig::default()
        })
    }

    fn settle(chain: &mut SegmentChain, scene: &mut SceneLog) -> Vec<ChainEvent> {
        let mut events = Vec::new();
        for _ in 0..100 {
            events.extend(chain.update(0.1, scene));
        }
        events
    }

    #[test]
    fn grow_adds_one_and_shifts_center_by_half_a_segment() {
        let mut scene = SceneLog::new();
        let mut chain = growing(10);
        let before = chain.center();
        assert!(chain.grow(&mut scene));
        assert_eq!(chain.count(), 1);
        let shift = chain.center().distance(before);
        assert!((shift - 10.0).abs() < 1e-4);
        assert_eq!(chain.cursor, Vec3::new(0.0, 0.0, 20.0));
    }

    #[test]
    fn growth_is_capped_at_max() {
        let mut scene = SceneLog::new();
        let mut chain = growing(5);
        let mut accepted = Vec::new();
        for _ in 0..7 {
            accepted.push(chain.grow(&mut scene));
            settle(&mut chain, &mut scene);
        }
        assert_eq!(chain.count(), 5);
        assert_eq!(accepted, vec![true, true, true, true, true, false, false]);
    }

    #[test]
    fn growth_is_not_reentrant_while_animating() {
        let mut scene = SceneLog::new();
        let mut chain = growing(10);
        assert!(chain.grow(&mut scene));
        assert!(!chain.grow(&mut scene));
        chain.update(0.25, &mut scene);
        assert!(!chain.grow(&mut scene));
        let events = settle(&mut chain, &mut scene);
        assert_eq!(events, vec![ChainEvent::Grown { count: 1 }]);
        assert!(chain.grow(&mut scene));
    }

    #[test]
    fn instant_growth_without_smooth_transition() {
        let mut scene = SceneLog::new();
        let mut chain = growing(10);
        chain.config.smooth_transition = false;
        assert!(chain.grow(&mut scene));
        assert!(chain.grow(&mut scene));
        assert_eq!(chain.count(), 2);
        assert!(chain.segments.iter().all(|s| s.is_settled()));
        assert_eq!(chain.update(0.0, &mut scene).len(), 2);
    }

    #[test]
    fn disabled_extension_is_a_no_op() {
        let mut scene = SceneLog::new();
        let mut chain = SegmentChain::new(RoadConfig::default());
        assert!(!chain.grow(&mut scene));
        assert_eq!(chain.count(), 0);
        assert_eq!(scene.created, 0);
    }

    #[test]
    fn growth_stretches_along_axis_only() {
        let mut scene = SceneLog::new();
        let mut chain = growing(10);
        chain.grow(&mut scene);
        chain.update(0.25, &mut scene);
        let scale = chain.segments[0].transform.scale;
        assert_eq!(scale.x, 10.0);
        assert_eq!(scale.y, 1.0);
        assert!(scale.z > 0.0 && scale.z < 20.0);
    }

    #[test]
    fn onboarding_is_sequential() {
        let mut scene = SceneLog::new();
        let mut chain = SegmentChain::new(RoadConfig {
            initial_segments: 3,
            onboarding_duration: 1.0,
            ..RoadConfig::default()
        });
        chain.initialize(&mut scene);
        assert_eq!(chain.count(), 1);
        assert!((chain.onboarding_duration() - 3.0).abs() < 1e-6);

        chain.update(0.5, &mut scene);
        assert_eq!(chain.count(), 1);
        chain.update(0.5, &mut scene);
        assert_eq!(chain.count(), 2);
        assert_eq!(chain.segments.iter().filter(|s| s.entrance().is_some()).count(), 1);

        let events = settle(&mut chain, &mut scene);
        assert_eq!(chain.count(), 3);
        assert_eq!(events, vec![ChainEvent::Onboarded { count: 3 }]);
        assert!(!chain.is_onboarding());
    }

    #[test]
    fn initialize_reset_initialize_round_trip() {
        let mut scene = SceneLog::new();
        let mut chain = SegmentChain::new(RoadConfig {
            initial_segments: 2,
            ..RoadConfig::default()
        });
        chain.initialize(&mut scene);
        settle(&mut chain, &mut scene);
        let first = chain.count();

        chain.initialize(&mut scene);
        chain.reset(&mut scene);
        assert_eq!(chain.count(), 0);
        chain.initialize(&mut scene);
        settle(&mut chain, &mut scene);
        assert_eq!(chain.count(), first);
        assert_eq!(scene.count_of(EntityKind::RoadSegment), 2);
    }

    #[test]
    fn reset_twice_is_idempotent() {
        let mut scene = SceneLog::new();
        let mut chain = growing(10);
        chain.grow(&mut scene);
        chain.reset(&mut scene);
        let snapshot = (chain.count(), chain.cursor, chain.center());
        chain.reset(&mut scene);
        assert_eq!((chain.count(), chain.cursor, chain.center()), snapshot);
        assert_eq!(snapshot.0, 0);
        assert_eq!(snapshot.1, Vec3::ZERO);
    }

    #[test]
    fn cursor_tracks_count() {
        let mut scene = SceneLog::new();
        let mut chain = growing(10);
        chain.config.axis = Vec3::new(1.0, 0.0, 0.0);
        chain.axis = Vec3::new(1.0, 0.0, 0.0);
        for _ in 0..4 {
            chain.grow(&mut scene);
            settle(&mut chain, &mut scene);
            let expected = Vec3::new(chain.count() as f32 * 20.0, 0.0, 0.0);
            assert_eq!(chain.cursor, expected);
        }
    }

    #[test]
    fn onboarding_carries_leftover_time() {
        let mut scene = SceneLog::new();
        let mut chain = SegmentChain::new(RoadConfig {
            initial_segments: 3,
            onboarding_duration: 1.0,
            ..RoadConfig::default()
        });
        chain.initialize(&mut scene);

        let mut events = Vec::new();
        for _ in 0..4 {
            events.extend(chain.update(0.7, &mut scene));
        }
        assert!(events.is_empty());
        assert_eq!(chain.count(), 3);

        // 5 x 0.7 covers the 3.0s staged entrance.
        let events = chain.update(0.7, &mut scene);
        assert_eq!(events, vec![ChainEvent::Onboarded { count: 3 }]);
        assert!(!chain.is_onboarding());
    }

    #[test]
    fn zero_length_onboarding_lands_in_one_tick() {
        let mut scene = SceneLog::new();
        let mut chain = SegmentChain::new(RoadConfig {
            initial_segments: 4,
            onboarding_duration: 0.0,
            ..RoadConfig::default()
        });
        chain.initialize(&mut scene);
        let events = chain.update(0.0, &mut scene);
        assert_eq!(events, vec![ChainEvent::Onboarded { count: 4 }]);
        assert_eq!(chain.cursor, Vec3::new(0.0, 0.0, 80.0));
    }
}
