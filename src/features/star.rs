use super::spawner::Spawn;
use super::{Entity, EntityId, EntityKind, Step};
use crate::config::StarConfig;
use crate::gfx::{anim::{lerp, Timeline}, math::Vec3, render::{RenderSink, Transform}};
use log::debug;
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounce {
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub enum StarPhase {
    Falling { tl: Timeline },
    Landing { stage: Bounce, tl: Timeline },
    Resting { remaining: f32 },
    FadingOut { tl: Timeline },
    Terminal,
}

impl StarPhase {
    pub fn name(&self) -> &'static str {
        match self {
            StarPhase::Falling { .. } => "Falling",
            StarPhase::Landing { .. } => "Landing",
            StarPhase::Resting { .. } => "Resting",
            StarPhase::FadingOut { .. } => "FadingOut",
            StarPhase::Terminal => "Terminal",
        }
    }
}

pub struct Star {
    id: EntityId,
    config: StarConfig,
    start: Vec3,
    target: Vec3,
    transform: Transform,
    alpha: f32,
    phase: StarPhase,
}

impl StarConfig {
    pub fn total_duration(&self) -> f32 {
        self.fall_duration + self.land_scale_duration + self.rest_duration + self.fade_out_duration
    }
}

impl Star {
    pub fn new(id: EntityId, origin: Vec3, config: StarConfig, sink: &mut dyn RenderSink) -> Self {
        let start = origin + Vec3::UP * config.drop_height;
        let target = Vec3::new(origin.x, config.ground_level, origin.z);
        let transform = Transform::at(start);
        sink.create(id, transform);
        sink.set_opacity(id, 1.0);
        debug!("[Star] {} drops from {} for {:.2}s", id, start, config.total_duration());

        let fall = Timeline::new(config.fall_duration).with_easing(config.fall_easing);
        Self {
            id,
            config,
            start,
            target,
            transform,
            alpha: 1.0,
            phase: StarPhase::Falling { tl: fall },
        }
    }

    fn half_bounce(&self) -> Timeline {
        Timeline::new(self.config.land_scale_duration / 2.0)
    }
}

impl Entity for Star {
    fn id(&self) -> EntityId {
        self.id
    }

    fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) -> Step {
        if self.is_terminal() {
            return Step::Idle;
        }

        // Leftover time from a finished phase flows into the next one.
        let mut budget = dt.max(0.0);
        loop {
            let next = match &mut self.phase {
                StarPhase::Falling { tl } => {
                    let t = tl.advance(budget);
                    let leftover = tl.overshoot();
                    let used = budget - leftover;
                    budget = leftover;
                    self.transform.position = self.start.lerp(self.target, t);
                    self.transform.rotation.z =
                        (self.transform.rotation.z + self.config.spin_speed * used) % 360.0;
                    if !tl.is_complete() {
                        None
                    } else {
                        self.transform.position = self.target;
                        Some(StarPhase::Landing {
                            stage: Bounce::Up,
                            tl: self.half_bounce(),
                        })
                    }
                }
                StarPhase::Landing { stage, tl } => {
                    let t = tl.advance(budget);
                    budget = tl.overshoot();
                    let peak = self.config.land_scale_bounce;
                    let scale = match stage {
                        Bounce::Up => lerp(1.0, peak, t),
                        Bounce::Down => lerp(peak, 1.0, t),
                    };
                    self.transform.scale = Vec3::splat(scale);
                    match (tl.is_complete(), *stage) {
                        (false, _) => None,
                        (true, Bounce::Up) => {
                            let mut tl = tl.clone();
                            tl.reset();
                            Some(StarPhase::Landing {
                                stage: Bounce::Down,
                                tl,
                            })
                        }
                        (true, Bounce::Down) => {
                            self.transform.scale = Vec3::ONE;
                            Some(StarPhase::Resting {
                                remaining: self.config.rest_duration,
                            })
                        }
                    }
                }
                StarPhase::Resting { remaining } => {
                    *remaining -= budget;
                    if *remaining > 0.0 {
                        budget = 0.0;
                        None
                    } else {
                        budget = -*remaining;
                        let fade = Timeline::new(self.config.fade_out_duration)
                            .with_easing(self.config.fade_easing);
                        Some(StarPhase::FadingOut { tl: fade })
                    }
                }
                StarPhase::FadingOut { tl } => {
                    let t = tl.advance(budget);
                    budget = tl.overshoot();
                    self.alpha = 1.0 - t;
                    sink.set_opacity(self.id, self.alpha);
                    if tl.is_complete() {
                        Some(StarPhase::Terminal)
                    } else {
                        None
                    }
                }
                StarPhase::Terminal => None,
            };

            match next {
                Some(StarPhase::Terminal) => {
                    self.alpha = 0.0;
                    self.phase = StarPhase::Terminal;
                    sink.destroy(self.id);
                    debug!("[Star] {} faded out", self.id);
                    return Step::Completed;
                }
                Some(phase) => {
                    debug!("[Star] {} -> {}", self.id, phase.name());
                    self.phase = phase;
                }
                None => break,
            }
        }

        sink.set_transform(self.id, self.transform);
        Step::Running
    }

    fn terminate(&mut self, sink: &mut dyn RenderSink) {
        if self.is_terminal() {
            return;
        }
        debug!("[Star] {} aborted during {}", self.id, self.phase.name());
        self.phase = StarPhase::Terminal;
        sink.destroy(self.id);
    }

    fn is_terminal(&self) -> bool {
        matches!(self.phase, StarPhase::Terminal)
    }
}

impl Spawn for Star {
    type Settings = StarConfig;
    const KIND: EntityKind = EntityKind::Star;

    fn spawn(
        id: EntityId,
        origin: Vec3,
        settings: &StarConfig,
        _rng: &mut StdRng,
        sink: &mut dyn RenderSink,
    ) -> Self {
        Star::new(id, origin, settings.clone(), sink)
    }
}
