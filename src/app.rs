use crate::config::{Config, SequenceConfig};
use crate::features::{
    camera::CameraRig,
    fade::{PriceTag, TaxText},
    leaf::LeafField,
    road::{ChainEvent, SegmentChain},
    spawner::Spawner,
    star::Star,
    EntityId,
};
use crate::gfx::{anim::Timeline, math::Vec3, render::RenderSink};
use log::{error, info, warn};
use serde::Serialize;

#[derive(Debug, Clone)]
pub enum SequencePhase {
    Idle,
    Delay { tl: Timeline },
    PriceReveal { tl: Timeline },
    LeafEffect { tl: Timeline },
    LeafFadeOut { tl: Timeline },
    RoadInit { tl: Timeline },
    TaxTextReveal { tl: Timeline },
    Done,
}

impl SequencePhase {
    pub fn name(&self) -> &'static str {
        match self {
            SequencePhase::Idle => "Idle",
            SequencePhase::Delay { .. } => "Delay",
            SequencePhase::PriceReveal { .. } => "PriceReveal",
            SequencePhase::LeafEffect { .. } => "LeafEffect",
            SequencePhase::LeafFadeOut { .. } => "LeafFadeOut",
            SequencePhase::RoadInit { .. } => "RoadInit",
            SequencePhase::TaxTextReveal { .. } => "TaxTextReveal",
            SequencePhase::Done => "Done",
        }
    }

    fn timeline_mut(&mut self) -> Option<&mut Timeline> {
        match self {
            SequencePhase::Delay { tl }
            | SequencePhase::PriceReveal { tl }
            | SequencePhase::LeafEffect { tl }
            | SequencePhase::LeafFadeOut { tl }
            | SequencePhase::RoadInit { tl }
            | SequencePhase::TaxTextReveal { tl } => Some(tl),
            SequencePhase::Idle | SequencePhase::Done => None,
        }
    }

    /// Seconds left before the phase's own wait runs out.
    pub fn remaining(&self) -> f32 {
        match self {
            SequencePhase::Delay { tl }
            | SequencePhase::PriceReveal { tl }
            | SequencePhase::LeafEffect { tl }
            | SequencePhase::LeafFadeOut { tl }
            | SequencePhase::RoadInit { tl }
            | SequencePhase::TaxTextReveal { tl } => tl.remaining(),
            SequencePhase::Idle | SequencePhase::Done => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShowEvent {
    PhaseEntered(&'static str),
    StarDisappeared(EntityId),
    RoadGrown { count: usize },
    RoadOnboarded { count: usize },
    PriceChanged(String),
    SequenceComplete,
}

/// Everything the show drives. Any member may be absent; the phases that
/// need it are then skipped with an error.
#[derive(Default)]
pub struct Cast {
    pub price_tag: Option<PriceTag>,
    pub tax_text: Option<TaxText>,
    pub leaves: Option<LeafField>,
    pub stars: Option<Spawner<Star>>,
    pub road: Option<SegmentChain>,
    pub camera: Option<CameraRig>,
}

impl Cast {
    pub fn from_config(config: &Config) -> Self {
        Self {
            price_tag: Some(PriceTag::new(config.price_tag.clone())),
            tax_text: Some(TaxText::new(config.tax_text.clone())),
            leaves: Some(LeafField::new(config.leaves.clone())),
            stars: Some(Spawner::new("StarSpawner", config.stars.clone(), config.star.clone())),
            road: Some(SegmentChain::new(config.road.clone())),
            camera: Some(CameraRig::new(config.camera.clone())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowStatus {
    pub phase: &'static str,
    pub phase_remaining: f32,
    pub running: bool,
    pub paused: bool,
    pub price: Option<String>,
    pub stars_live: usize,
    pub stars_spawned: u32,
    pub leaves_live: usize,
    pub road_segments: usize,
    pub road_length: f32,
}

pub struct Show {
    pub config: SequenceConfig,
    cast: Cast,
    phase: SequencePhase,
    base_time_scale: f32,
    time_scale: f32,
    paused: bool,
    events: Vec<ShowEvent>,
}

impl Show {
    pub fn new(config: &Config) -> Self {
        let mut show = Self::with_cast(config.sequence.clone(), Cast::from_config(config));
        show.set_time_scale(config.host.time_scale);
        show.base_time_scale = show.time_scale;
        show
    }

    pub fn with_cast(config: SequenceConfig, cast: Cast) -> Self {
        Self {
            config,
            cast,
            phase: SequencePhase::Idle,
            base_time_scale: 1.0,
            time_scale: 1.0,
            paused: false,
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.phase, SequencePhase::Idle | SequencePhase::Done)
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, SequencePhase::Done)
    }

    pub fn drain_events(&mut self) -> Vec<ShowEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn status(&self) -> ShowStatus {
        ShowStatus {
            phase: self.phase.name(),
            phase_remaining: self.phase.remaining(),
            running: self.is_running(),
            paused: self.paused,
            price: self.cast.price_tag.as_ref().map(|p| p.text().to_string()),
            stars_live: self.cast.stars.as_ref().map_or(0, |s| s.live_count()),
            stars_spawned: self.cast.stars.as_ref().map_or(0, |s| s.spawned()),
            leaves_live: self.cast.leaves.as_ref().map_or(0, |l| l.live_count()),
            road_segments: self.cast.road.as_ref().map_or(0, |r| r.count()),
            road_length: self.cast.road.as_ref().map_or(0.0, |r| r.total_length()),
        }
    }

    // Playback speed

    pub fn time_scale(&self) -> f32 {
        if self.paused {
            0.0
        } else {
            self.time_scale
        }
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        if scale < 0.0 || !scale.is_finite() {
            warn!("[Show] Ignoring time scale {}", scale);
            return;
        }
        self.time_scale = scale;
    }

    pub fn pause(&mut self) {
        if !self.paused {
            info!("[Show] Paused");
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            info!("[Show] Resumed");
            self.paused = false;
        }
    }

    // Trigger surface

    pub fn start(&mut self, sink: &mut dyn RenderSink) -> bool {
        if self.is_running() {
            warn!("[Show] Sequence already running ({}), start ignored", self.phase.name());
            return false;
        }
        if self.is_done() {
            info!("[Show] Replaying, resetting collaborators first");
            self.reset_cast(sink);
        }
        info!("[Show] Sequence started");
        self.phase = SequencePhase::Delay {
            tl: Timeline::new(self.config.start_delay),
        };
        self.announce();
        true
    }

    /// Force-stops everything without completions and returns to Idle.
    /// Pause and playback speed go back to their configured state.
    pub fn reset(&mut self, sink: &mut dyn RenderSink) {
        self.reset_cast(sink);
        self.phase = SequencePhase::Idle;
        self.paused = false;
        self.time_scale = self.base_time_scale;
        info!("[Show] Reset to Idle");
    }

    fn reset_cast(&mut self, sink: &mut dyn RenderSink) {
        let cast = &mut self.cast;
        if let Some(stars) = &mut cast.stars {
            stars.reset(sink);
        }
        if let Some(leaves) = &mut cast.leaves {
            leaves.reset(sink);
        }
        if let Some(tag) = &mut cast.price_tag {
            tag.reset(sink);
        }
        if let Some(tax) = &mut cast.tax_text {
            tax.reset(sink);
        }
        if let Some(road) = &mut cast.road {
            road.reset(sink);
        }
        if let Some(camera) = &mut cast.camera {
            camera.reset();
        }
    }

    pub fn set_price(&mut self, price: f32) {
        match &mut self.cast.price_tag {
            Some(tag) => {
                tag.set_price(price);
                let text = tag.text().to_string();
                self.events.push(ShowEvent::PriceChanged(text));
            }
            None => error!("[Show] No price tag, price {} dropped", price),
        }
    }

    pub fn update_price(&mut self, text: impl Into<String>) {
        let text = text.into();
        match &mut self.cast.price_tag {
            Some(tag) => {
                tag.update_price(text.clone());
                self.events.push(ShowEvent::PriceChanged(text));
            }
            None => error!("[Show] No price tag, price {:?} dropped", text),
        }
    }

    pub fn extend(&mut self, sink: &mut dyn RenderSink) -> bool {
        match &mut self.cast.road {
            Some(road) => road.grow(sink),
            None => {
                error!("[Show] No road to extend");
                false
            }
        }
    }

    pub fn spawn_one(&mut self, sink: &mut dyn RenderSink) -> Option<EntityId> {
        match &mut self.cast.stars {
            Some(stars) => stars.spawn_one(sink),
            None => {
                error!("[Show] No star spawner");
                None
            }
        }
    }

    pub fn start_spawning(&mut self) -> bool {
        match &mut self.cast.stars {
            Some(stars) => stars.start(),
            None => {
                error!("[Show] No star spawner to start");
                false
            }
        }
    }

    pub fn stop_spawning(&mut self) {
        match &mut self.cast.stars {
            Some(stars) => stars.stop(),
            None => error!("[Show] No star spawner to stop"),
        }
    }

    // Tick

    /// Advances every collaborator, dispatches star completions, then runs the
    /// sequence continuation. Anything created along the way is first ticked
    /// on the next frame.
    pub fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) {
        let dt = dt.max(0.0) * self.time_scale();
        if dt == 0.0 && self.paused {
            return;
        }

        let cast = &mut self.cast;
        if let Some(tag) = &mut cast.price_tag {
            tag.update(dt, sink);
        }
        if let Some(tax) = &mut cast.tax_text {
            tax.update(dt, sink);
        }
        if let Some(leaves) = &mut cast.leaves {
            leaves.update(dt, sink);
        }
        let vanished = match &mut cast.stars {
            Some(stars) => stars.update(dt, sink),
            None => Vec::new(),
        };
        if let Some(road) = &mut cast.road {
            for event in road.update(dt, sink) {
                self.events.push(match event {
                    ChainEvent::Onboarded { count } => ShowEvent::RoadOnboarded { count },
                    ChainEvent::Grown { count } => ShowEvent::RoadGrown { count },
                });
            }
        }

        for id in vanished {
            info!("[Show] {} disappeared", id);
            self.events.push(ShowEvent::StarDisappeared(id));
            if self.config.stars_extend_road {
                if let Some(road) = &mut self.cast.road {
                    road.grow(sink);
                }
            }
        }

        self.advance_sequence(dt, sink);

        let center = self.cast.road.as_ref().map_or(Vec3::ZERO, |r| r.center());
        if let Some(camera) = &mut self.cast.camera {
            camera.update(dt, center);
        }
    }

    fn advance_sequence(&mut self, dt: f32, sink: &mut dyn RenderSink) {
        let mut budget = dt;
        loop {
            let road_busy = matches!(self.phase, SequencePhase::RoadInit { .. })
                && self.cast.road.as_ref().is_some_and(SegmentChain::is_onboarding);
            let leftover = match self.phase.timeline_mut() {
                Some(tl) => {
                    tl.advance(budget);
                    if !tl.is_complete() {
                        return;
                    }
                    if road_busy {
                        // Hold at the end until the last segment has settled.
                        tl.elapsed = tl.duration;
                        return;
                    }
                    tl.overshoot()
                }
                None => return,
            };
            budget = leftover;

            let finished = std::mem::replace(&mut self.phase, SequencePhase::Idle);
            self.phase = self.next_phase(&finished, sink);
            self.announce();
            if self.is_done() {
                info!("[Show] Sequence complete");
                self.events.push(ShowEvent::SequenceComplete);
                return;
            }
        }
    }

    fn announce(&mut self) {
        info!("[Show] Phase: {}", self.phase.name());
        self.events.push(ShowEvent::PhaseEntered(self.phase.name()));
    }

    fn next_phase(&mut self, finished: &SequencePhase, sink: &mut dyn RenderSink) -> SequencePhase {
        match finished {
            SequencePhase::Idle => SequencePhase::Idle,
            SequencePhase::Delay { .. } => self.enter_price_reveal(sink),
            SequencePhase::PriceReveal { .. } => self.enter_leaf_effect(),
            SequencePhase::LeafEffect { .. } => self.enter_leaf_fade_out(),
            SequencePhase::LeafFadeOut { .. } => self.enter_road_init(sink),
            SequencePhase::RoadInit { .. } => self.enter_tax_text(sink),
            SequencePhase::TaxTextReveal { .. } | SequencePhase::Done => SequencePhase::Done,
        }
    }

    fn enter_price_reveal(&mut self, sink: &mut dyn RenderSink) -> SequencePhase {
        let wait = match &mut self.cast.price_tag {
            Some(tag) => {
                tag.play(sink);
                tag.total_duration()
            }
            None => {
                error!("[Show] No price tag, skipping price reveal");
                0.0
            }
        };
        SequencePhase::PriceReveal {
            tl: Timeline::new(wait),
        }
    }

    fn enter_leaf_effect(&mut self) -> SequencePhase {
        let anchor = self.cast.camera.as_ref().map(|c| c.position());
        let wait = match &mut self.cast.leaves {
            Some(leaves) => {
                if let Some(anchor) = anchor {
                    leaves.set_anchor(anchor);
                }
                leaves.start();
                self.config.leaf_effect_duration
            }
            None => {
                error!("[Show] No leaf field, skipping leaf effect");
                0.0
            }
        };
        SequencePhase::LeafEffect {
            tl: Timeline::new(wait),
        }
    }

    fn enter_leaf_fade_out(&mut self) -> SequencePhase {
        let wait = match &mut self.cast.leaves {
            Some(leaves) => {
                leaves.fade_out_all(self.config.leaf_fade_out_duration);
                self.config.leaf_fade_out_duration
            }
            None => 0.0,
        };
        SequencePhase::LeafFadeOut {
            tl: Timeline::new(wait),
        }
    }

    fn enter_road_init(&mut self, sink: &mut dyn RenderSink) -> SequencePhase {
        let wait = match &mut self.cast.road {
            Some(road) => {
                road.initialize(sink);
                road.onboarding_duration()
            }
            None => {
                error!("[Show] No road, skipping road init");
                0.0
            }
        };
        if self.config.stars_enabled {
            self.start_spawning();
        }
        SequencePhase::RoadInit {
            tl: Timeline::new(wait),
        }
    }

    fn enter_tax_text(&mut self, sink: &mut dyn RenderSink) -> SequencePhase {
        let amount = match &self.cast.price_tag {
            Some(tag) => tag.price_amount(),
            None => {
                warn!("[Show] No price tag, tax amount defaults to 0");
                0.0
            }
        };
        let wait = match &mut self.cast.tax_text {
            Some(tax) => {
                tax.show(amount, sink);
                tax.total_duration()
            }
            None => {
                error!("[Show] No tax text, skipping tax reveal");
                0.0
            }
        };
        SequencePhase::TaxTextReveal {
            tl: Timeline::new(wait),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::EntityKind;
    use crate::gfx::render::SceneLog;

    fn quick_config() -> Config {
        let mut config = Config::default();
        config.sequence.start_delay = 0.1;
        config.sequence.leaf_effect_duration = 0.5;
        config.sequence.leaf_fade_out_duration = 0.2;
        config.price_tag.fade_in_duration = 0.1;
        config.price_tag.display_duration = 0.1;
        config.price_tag.fade_out_duration = 0.1;
        config.tax_text.display_delay = 0.1;
        config.tax_text.fade_in_duration = 0.1;
        config.tax_text.display_duration = 0.1;
        config.tax_text.fade_out_duration = 0.1;
        config.road.onboarding_duration = 0.2;
        config.stars.total = 2;
        config.stars.interval = 0.1;
        config.stars.first_delay = 0.0;
        config.stars.seed = Some(1);
        config.leaves.seed = Some(2);
        config
    }

    fn run_until_done(show: &mut Show, scene: &mut SceneLog) -> Vec<ShowEvent> {
        let mut events = show.drain_events();
        for _ in 0..400 {
            show.update(0.05, scene);
            events.extend(show.drain_events());
            if show.is_done() {
                break;
            }
        }
        events
    }

    fn phases(events: &[ShowEvent]) -> Vec<&'static str> {
        events
            .iter()
            .filter_map(|e| match e {
                ShowEvent::PhaseEntered(name) => Some(*name),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn runs_phases_in_order() {
        let mut scene = SceneLog::new();
        let mut show = Show::new(&quick_config());
        assert!(show.start(&mut scene));
        let events = run_until_done(&mut show, &mut scene);
        assert_eq!(
            phases(&events),
            vec!["Delay", "PriceReveal", "LeafEffect", "LeafFadeOut", "RoadInit", "TaxTextReveal", "Done"]
        );
        assert!(events.contains(&ShowEvent::SequenceComplete));
        assert!(events.contains(&ShowEvent::RoadOnboarded { count: 1 }));
        assert_eq!(show.status().road_segments, 1);
    }

    #[test]
    fn second_start_is_ignored() {
        let mut scene = SceneLog::new();
        let mut show = Show::new(&quick_config());
        assert!(show.start(&mut scene));
        assert!(!show.start(&mut scene));
        let events = run_until_done(&mut show, &mut scene);
        let reveals = phases(&events).iter().filter(|p| **p == "PriceReveal").count();
        assert_eq!(reveals, 1);
    }

    #[test]
    fn reset_twice_is_idempotent() {
        let mut scene = SceneLog::new();
        let mut show = Show::new(&quick_config());
        show.start(&mut scene);
        for _ in 0..30 {
            show.update(0.05, &mut scene);
        }
        show.reset(&mut scene);
        let first = (show.phase.name(), show.status().road_segments, scene.live_count());
        show.reset(&mut scene);
        let second = (show.phase.name(), show.status().road_segments, scene.live_count());
        assert_eq!(first, ("Idle", 0, 0));
        assert_eq!(first, second);
    }

    #[test]
    fn reset_during_star_fade_never_grows_road() {
        let mut scene = SceneLog::new();
        let mut config = quick_config();
        config.road.extension_enabled = true;
        config.stars.total = 1;
        let mut show = Show::new(&config);

        assert!(show.start_spawning());
        show.update(0.0, &mut scene);
        show.update(2.5, &mut scene);
        let star = EntityId::new(EntityKind::Star, 1);
        let opacity = scene.visual(star).map(|v| v.opacity);
        assert!(opacity.is_some_and(|a| a > 0.0 && a < 1.0), "star not fading: {:?}", opacity);

        show.drain_events();
        show.reset(&mut scene);
        for _ in 0..20 {
            show.update(0.5, &mut scene);
        }
        let events = show.drain_events();
        assert!(!events.iter().any(|e| matches!(e, ShowEvent::StarDisappeared(_))));
        assert_eq!(show.status().road_segments, 0);
    }

    #[test]
    fn finished_star_grows_road() {
        let mut scene = SceneLog::new();
        let mut config = quick_config();
        config.road.extension_enabled = true;
        config.stars.total = 1;
        let mut show = Show::new(&config);

        show.spawn_one(&mut scene);
        for _ in 0..40 {
            show.update(0.1, &mut scene);
        }
        let events = show.drain_events();
        let vanished = events
            .iter()
            .filter(|e| matches!(e, ShowEvent::StarDisappeared(_)))
            .count();
        assert_eq!(vanished, 1);
        assert!(events.contains(&ShowEvent::RoadGrown { count: 1 }));
        assert_eq!(show.status().road_segments, 1);
    }

    #[test]
    fn finished_star_leaves_road_alone_when_extension_disabled() {
        let mut scene = SceneLog::new();
        let mut config = quick_config();
        config.stars.total = 1;
        let mut show = Show::new(&config);
        show.spawn_one(&mut scene);
        for _ in 0..40 {
            show.update(0.1, &mut scene);
        }
        assert_eq!(show.status().road_segments, 0);
    }

    #[test]
    fn tax_text_uses_price() {
        let mut scene = SceneLog::new();
        let mut show = Show::new(&quick_config());
        show.set_price(12.0);
        show.start(&mut scene);
        for _ in 0..400 {
            show.update(0.05, &mut scene);
            if show.phase.name() == "TaxTextReveal" {
                break;
            }
        }
        let text = scene.visual(TaxText::id()).and_then(|v| v.text.clone());
        assert_eq!(text.as_deref(), Some("12 tax\n= 24 m of road upkeep"));
    }

    #[test]
    fn missing_collaborators_degrade() {
        let mut scene = SceneLog::new();
        let mut show = Show::with_cast(quick_config().sequence, Cast::default());
        show.set_price(3.0);
        assert!(!show.extend(&mut scene));
        assert_eq!(show.spawn_one(&mut scene), None);
        assert!(show.start(&mut scene));
        let events = run_until_done(&mut show, &mut scene);
        assert!(show.is_done());
        assert_eq!(phases(&events).len(), 7);
    }

    #[test]
    fn pause_freezes_sequence() {
        let mut scene = SceneLog::new();
        let mut show = Show::new(&quick_config());
        show.start(&mut scene);
        show.pause();
        for _ in 0..10 {
            show.update(1.0, &mut scene);
        }
        assert_eq!(show.phase.name(), "Delay");
        show.resume();
        show.update(0.2, &mut scene);
        assert_eq!(show.phase.name(), "PriceReveal");
    }

    #[test]
    fn replay_after_done() {
        let mut scene = SceneLog::new();
        let mut show = Show::new(&quick_config());
        show.start(&mut scene);
        run_until_done(&mut show, &mut scene);
        assert!(show.is_done());
        assert!(show.start(&mut scene));
        assert_eq!(show.phase.name(), "Delay");
        assert_eq!(show.status().road_segments, 0);
        let events = run_until_done(&mut show, &mut scene);
        assert_eq!(phases(&events).last(), Some(&"Done"));
    }

    #[test]
    fn road_settles_before_tax_text_with_coarse_ticks() {
        let mut scene = SceneLog::new();
        let mut config = quick_config();
        config.sequence.start_delay = 0.0;
        config.sequence.leaf_effect_duration = 0.0;
        config.sequence.leaf_fade_out_duration = 0.0;
        config.sequence.stars_enabled = false;
        config.price_tag.fade_in_duration = 0.0;
        config.price_tag.display_duration = 0.0;
        config.price_tag.fade_out_duration = 0.0;
        config.road.initial_segments = 3;
        config.road.onboarding_duration = 1.0;
        let mut show = Show::new(&config);

        show.start(&mut scene);
        let mut events = show.drain_events();
        for _ in 0..20 {
            show.update(0.7, &mut scene);
            events.extend(show.drain_events());
        }
        let onboarded = events
            .iter()
            .position(|e| *e == ShowEvent::RoadOnboarded { count: 3 });
        let tax = events
            .iter()
            .position(|e| *e == ShowEvent::PhaseEntered("TaxTextReveal"));
        assert!(onboarded.is_some() && tax.is_some(), "{:?}", events);
        assert!(onboarded < tax, "{:?}", events);
    }

    #[test]
    fn reset_clears_pause() {
        let mut scene = SceneLog::new();
        let mut show = Show::new(&quick_config());
        show.start(&mut scene);
        show.pause();
        show.reset(&mut scene);
        assert!(!show.status().paused);
        assert_eq!(show.time_scale(), 1.0);

        show.start(&mut scene);
        for _ in 0..100 {
            show.update(0.1, &mut scene);
        }
        assert_ne!(show.phase.name(), "Delay");
    }

    #[test]
    fn time_scale_stretches_the_sequence() {
        let mut scene = SceneLog::new();
        let mut show = Show::new(&quick_config());
        show.set_time_scale(0.5);
        assert_eq!(show.time_scale(), 0.5);
        show.set_time_scale(-1.0);
        show.set_time_scale(f32::NAN);
        assert_eq!(show.time_scale(), 0.5);

        show.start(&mut scene);
        show.update(0.15, &mut scene);
        assert_eq!(show.phase.name(), "Delay");
        assert!((show.status().phase_remaining - 0.025).abs() < 1e-4);
        show.update(0.1, &mut scene);
        assert_eq!(show.phase.name(), "PriceReveal");

        show.pause();
        assert_eq!(show.time_scale(), 0.0);
        show.resume();
        assert_eq!(show.time_scale(), 0.5);

        show.reset(&mut scene);
        assert_eq!(show.time_scale(), 1.0);
    }

    #[test]
    fn zero_time_scale_holds_the_sequence() {
        let mut scene = SceneLog::new();
        let mut show = Show::new(&quick_config());
        show.set_time_scale(0.0);
        show.start(&mut scene);
        for _ in 0..10 {
            show.update(1.0, &mut scene);
        }
        assert_eq!(show.phase.name(), "Delay");
    }
}
