use super::{Entity, EntityId, EntityKind, Step};
use crate::config::{SpawnRegion, SpawnerConfig};
use crate::gfx::{math::Vec3, render::RenderSink};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// An entity a `Spawner` knows how to create.
pub trait Spawn: Entity + Sized {
    type Settings;

    const KIND: EntityKind;

    fn spawn(
        id: EntityId,
        origin: Vec3,
        settings: &Self::Settings,
        rng: &mut StdRng,
        sink: &mut dyn RenderSink,
    ) -> Self;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cadence {
    Stopped,
    Waiting { remaining: f32 },
}

pub struct Spawner<E: Spawn> {
    name: &'static str,
    pub config: SpawnerConfig,
    pub settings: E::Settings,
    live: Vec<E>,
    spawned: u32,
    cadence: Cadence,
    rng: StdRng,
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl SpawnRegion {
    pub fn sample(&self, rng: &mut StdRng) -> Vec3 {
        let e = self.extents.abs();
        self.center
            + Vec3::new(
                rng.gen_range(-e.x..=e.x),
                rng.gen_range(-e.y..=e.y),
                rng.gen_range(-e.z..=e.z),
            )
    }
}

impl<E: Spawn> Spawner<E> {
    pub fn new(name: &'static str, config: SpawnerConfig, settings: E::Settings) -> Self {
        let rng = seeded_rng(config.seed);
        Self {
            name,
            config,
            settings,
            live: Vec::new(),
            spawned: 0,
            cadence: Cadence::Stopped,
            rng,
        }
    }

    pub fn is_spawning(&self) -> bool {
        matches!(self.cadence, Cadence::Waiting { .. })
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    fn exhausted(&self) -> bool {
        self.config.total > 0 && self.spawned >= self.config.total
    }

    pub fn start(&mut self) -> bool {
        if self.is_spawning() {
            warn!("[{}] Already spawning, start ignored", self.name);
            return false;
        }
        if self.exhausted() {
            warn!(
                "[{}] All {} entities already spawned this run, reset first",
                self.name, self.config.total
            );
            return false;
        }

        let total = if self.config.total == 0 {
            "unbounded".to_string()
        } else {
            self.config.total.to_string()
        };
        info!(
            "[{}] Spawning started (total: {}, first in {:.2}s)",
            self.name, total, self.config.first_delay
        );
        self.cadence = Cadence::Waiting {
            remaining: self.config.first_delay.max(0.0),
        };
        true
    }

    /// Halts the cadence. Live entities keep running.
    pub fn stop(&mut self) {
        if self.is_spawning() {
            self.cadence = Cadence::Stopped;
            info!("[{}] Spawning stopped", self.name);
        }
    }

    pub fn spawn_one(&mut self, sink: &mut dyn RenderSink) -> Option<EntityId> {
        if self.live.len() >= self.config.max_live {
            warn!(
                "[{}] Live cap of {} reached, nothing spawned",
                self.name, self.config.max_live
            );
            return None;
        }
        if self.exhausted() {
            warn!(
                "[{}] Total of {} reached, nothing spawned",
                self.name, self.config.total
            );
            return None;
        }

        self.spawned += 1;
        let id = EntityId::new(E::KIND, self.spawned);
        let origin = self.config.region.sample(&mut self.rng);
        let entity = E::spawn(id, origin, &self.settings, &mut self.rng, sink);
        self.live.push(entity);
        debug!("[{}] Spawned {} at {}", self.name, id, origin);
        Some(id)
    }

    fn next_interval(&mut self) -> f32 {
        if self.config.randomize_interval {
            let lo = self.config.min_interval.min(self.config.max_interval);
            let hi = self.config.min_interval.max(self.config.max_interval);
            self.rng.gen_range(lo..=hi).max(0.0)
        } else {
            self.config.interval.max(0.0)
        }
    }

    /// Ticks every live entity, drops the terminal ones, then runs the spawn
    /// cadence. Entities spawned here get their first tick next frame.
    ///
    /// Returns the ids that completed naturally during this tick.
    pub fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) -> Vec<EntityId> {
        let mut completed = Vec::new();
        for entity in &mut self.live {
            if entity.update(dt, sink) == Step::Completed {
                completed.push(entity.id());
            }
        }
        self.live.retain(|e| !e.is_terminal());

        let due = match &mut self.cadence {
            Cadence::Waiting { remaining } => {
                *remaining -= dt;
                *remaining <= 0.0
            }
            Cadence::Stopped => false,
        };

        if due {
            self.spawn_one(sink);
            if self.exhausted() {
                info!("[{}] All {} entities spawned", self.name, self.spawned);
                self.cadence = Cadence::Stopped;
            } else {
                let next = self.next_interval();
                if let Cadence::Waiting { remaining } = &mut self.cadence {
                    *remaining = (*remaining + next).max(0.0);
                }
            }
        }

        completed
    }

    pub fn for_each_live_mut(&mut self, mut f: impl FnMut(&mut E)) {
        for entity in &mut self.live {
            f(entity);
        }
    }

    /// Stops, aborts every live entity without completion, clears the counter.
    pub fn reset(&mut self, sink: &mut dyn RenderSink) {
        self.cadence = Cadence::Stopped;
        for entity in &mut self.live {
            entity.terminate(sink);
        }
        let cleared = self.live.len();
        self.live.clear();
        self.spawned = 0;
        self.rng = seeded_rng(self.config.seed);
        info!("[{}] Reset ({} live entities cleared)", self.name, cleared);
    }
}
