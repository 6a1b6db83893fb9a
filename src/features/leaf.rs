use super::spawner::{Spawn, Spawner};
use super::{Entity, EntityId, EntityKind, Step};
use crate::config::{LeafConfig, SpawnRegion, SpawnerConfig};
use crate::gfx::{anim::Timeline, math::Vec3, render::{RenderSink, Transform}};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Debug, Clone)]
pub enum LeafState {
    Drifting,
    Fading { tl: Timeline },
    Terminal,
}

/// A leaf drifts until it sinks below the despawn height or is told to fade.
/// Whichever happens first ends it.
pub struct Leaf {
    id: EntityId,
    transform: Transform,
    elapsed: f32,
    sway_phase: f32,
    fall_speed: f32,
    rotation_speed: f32,
    sway_amount: f32,
    sway_frequency: f32,
    despawn_height: f32,
    alpha: f32,
    state: LeafState,
}

impl Leaf {
    /// Starts a fade independent of where the leaf is in its drift.
    pub fn begin_fade(&mut self, duration: f32) -> bool {
        if !matches!(self.state, LeafState::Drifting) {
            return false;
        }
        self.state = LeafState::Fading {
            tl: Timeline::new(duration),
        };
        true
    }

    fn finish(&mut self, sink: &mut dyn RenderSink) {
        self.state = LeafState::Terminal;
        sink.destroy(self.id);
    }
}

impl Entity for Leaf {
    fn id(&self) -> EntityId {
        self.id
    }

    fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) -> Step {
        if self.is_terminal() {
            return Step::Idle;
        }
        let dt = dt.max(0.0);
        self.elapsed += dt;

        let sway = (self.elapsed * self.sway_frequency * TAU + self.sway_phase).sin() * self.sway_amount;
        let t = &mut self.transform;
        t.position.y -= self.fall_speed * dt;
        t.position.x += sway * dt;
        t.rotation.y = (t.rotation.y + self.rotation_speed * dt) % 360.0;
        t.rotation.x = (t.rotation.x + self.rotation_speed * 0.5 * dt) % 360.0;

        if let LeafState::Fading { tl } = &mut self.state {
            let progress = tl.advance(dt);
            self.alpha = 1.0 - progress;
            if tl.is_complete() {
                self.finish(sink);
                return Step::Completed;
            }
            sink.set_opacity(self.id, self.alpha);
        }

        if self.transform.position.y < self.despawn_height {
            self.finish(sink);
            return Step::Completed;
        }

        sink.set_transform(self.id, self.transform);
        Step::Running
    }

    fn terminate(&mut self, sink: &mut dyn RenderSink) {
        if !self.is_terminal() {
            self.finish(sink);
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state, LeafState::Terminal)
    }
}

impl Spawn for Leaf {
    type Settings = LeafConfig;
    const KIND: EntityKind = EntityKind::Leaf;

    fn spawn(
        id: EntityId,
        origin: Vec3,
        settings: &LeafConfig,
        rng: &mut StdRng,
        sink: &mut dyn RenderSink,
    ) -> Self {
        let [lo, hi] = settings.size_range;
        let size = rng.gen_range(lo.min(hi)..=lo.max(hi));
        let rotation = Vec3::new(
            rng.gen_range(0.0..360.0),
            rng.gen_range(0.0..360.0),
            rng.gen_range(0.0..360.0),
        );
        let transform = Transform::at(origin)
            .with_rotation(rotation)
            .with_scale(Vec3::splat(size));
        sink.create(id, transform);

        Leaf {
            id,
            transform,
            elapsed: 0.0,
            sway_phase: rng.gen_range(0.0..TAU),
            fall_speed: settings.fall_speed,
            rotation_speed: settings.rotation_speed,
            sway_amount: settings.sway_amount,
            sway_frequency: settings.sway_frequency,
            despawn_height: settings.despawn_height,
            alpha: 1.0,
            state: LeafState::Drifting,
        }
    }
}

impl LeafConfig {
    fn spawner_config(&self, anchor: Vec3) -> SpawnerConfig {
        let interval = if self.spawn_rate > 0.0 { 1.0 / self.spawn_rate } else { f32::MAX };
        SpawnerConfig {
            total: 0,
            interval,
            first_delay: 0.0,
            randomize_interval: false,
            min_interval: interval,
            max_interval: interval,
            max_live: self.max_leaves,
            region: self.region(anchor),
            seed: self.seed,
        }
    }

    /// Box in front of `anchor` at spawn height, one unit of vertical jitter.
    fn region(&self, anchor: Vec3) -> SpawnRegion {
        SpawnRegion {
            center: Vec3::new(anchor.x, self.spawn_height + 1.0, anchor.z + self.forward_distance),
            extents: Vec3::new(self.spawn_width / 2.0, 1.0, self.spawn_depth / 2.0),
        }
    }
}

/// The falling-leaves effect: a leaf spawner plus the fade-everything command.
pub struct LeafField {
    spawner: Spawner<Leaf>,
    config: LeafConfig,
}

impl LeafField {
    pub fn new(config: LeafConfig) -> Self {
        let spawner = Spawner::new("LeafField", config.spawner_config(Vec3::ZERO), config.clone());
        Self { spawner, config }
    }

    /// Re-centres the spawn box, e.g. in front of the camera.
    pub fn set_anchor(&mut self, anchor: Vec3) {
        self.spawner.config.region = self.config.region(anchor);
    }

    pub fn is_playing(&self) -> bool {
        self.spawner.is_spawning()
    }

    pub fn live_count(&self) -> usize {
        self.spawner.live_count()
    }

    pub fn start(&mut self) {
        if self.is_playing() {
            warn!("[LeafField] Leaves already falling");
            return;
        }
        info!("[LeafField] Leaves start falling");
        self.spawner.start();
    }

    /// Stops spawning and fades every live leaf at once, whatever its drift.
    pub fn fade_out_all(&mut self, duration: f32) {
        info!("[LeafField] Fading out {} leaves over {:.2}s", self.live_count(), duration);
        self.spawner.stop();
        let mut fading = 0;
        self.spawner.for_each_live_mut(|leaf| {
            if leaf.begin_fade(duration) {
                fading += 1;
            }
        });
        debug!("[LeafField] {} leaves fading", fading);
    }

    pub fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) {
        self.spawner.update(dt, sink);
    }

    pub fn reset(&mut self, sink: &mut dyn RenderSink) {
        self.spawner.reset(sink);
    }
}
