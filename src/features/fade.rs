use super::{Entity, EntityId, EntityKind, Step};
use crate::config::{PriceTagConfig, TaxTextConfig};
use crate::gfx::{
    anim::{lerp, Easing, Timeline},
    math::Vec3,
    render::{RenderSink, Transform},
};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

static PRICE_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"[¥$]?\s*(\d+\.?\d*)").ok());

/// Pulls the first number out of a price string such as `¥12.50`.
/// Anything unparsable yields 0.
pub fn parse_price(text: &str) -> f32 {
    let amount = PRICE_PATTERN
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f32>().ok());
    match amount {
        Some(amount) => amount,
        None => {
            warn!("Could not parse a price from {:?}, using 0", text);
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeStep {
    Delay(f32),
    FadeIn(f32),
    Hold(f32),
    FadeOut(f32),
    /// Moves up by `distance` while fading out.
    RiseOut { duration: f32, distance: f32 },
}

impl FadeStep {
    pub fn duration(&self) -> f32 {
        match *self {
            FadeStep::Delay(d) | FadeStep::FadeIn(d) | FadeStep::Hold(d) | FadeStep::FadeOut(d) => d,
            FadeStep::RiseOut { duration, .. } => duration,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FadeStep::Delay(_) => "Delay",
            FadeStep::FadeIn(_) => "FadeIn",
            FadeStep::Hold(_) => "Hold",
            FadeStep::FadeOut(_) => "FadeOut",
            FadeStep::RiseOut { .. } => "RiseOut",
        }
    }
}

#[derive(Debug, Clone)]
enum FadePhase {
    Step { index: usize, tl: Timeline },
    Terminal,
}

/// A UI element that walks an ordered list of fade steps, then disappears.
pub struct UiFade {
    id: EntityId,
    steps: Vec<FadeStep>,
    origin: Vec3,
    transform: Transform,
    alpha: f32,
    fade_easing: Easing,
    movement_easing: Easing,
    phase: FadePhase,
}

impl UiFade {
    pub fn new(
        id: EntityId,
        origin: Vec3,
        steps: Vec<FadeStep>,
        text: &str,
        sink: &mut dyn RenderSink,
    ) -> Self {
        let transform = Transform::at(origin);
        sink.create(id, transform);
        sink.set_opacity(id, 0.0);
        sink.set_text(id, text);

        let mut fade = Self {
            id,
            steps,
            origin,
            transform,
            alpha: 0.0,
            fade_easing: Easing::Linear,
            movement_easing: Easing::Linear,
            phase: FadePhase::Terminal,
        };
        fade.phase = fade.enter(0);
        fade
    }

    pub fn with_easing(mut self, fade_easing: Easing, movement_easing: Easing) -> Self {
        self.fade_easing = fade_easing;
        self.movement_easing = movement_easing;
        self
    }

    fn enter(&self, index: usize) -> FadePhase {
        match self.steps.get(index) {
            Some(step) => {
                debug!("[UiFade] {} -> {}", self.id, step.name());
                FadePhase::Step {
                    index,
                    tl: Timeline::new(step.duration()),
                }
            }
            None => FadePhase::Terminal,
        }
    }

    pub fn total_duration(&self) -> f32 {
        self.steps.iter().map(FadeStep::duration).sum()
    }

    fn apply(&mut self, step: FadeStep, t: f32) {
        match step {
            FadeStep::Delay(_) | FadeStep::Hold(_) => {}
            FadeStep::FadeIn(_) => self.alpha = self.fade_easing.apply(t),
            FadeStep::FadeOut(_) => self.alpha = 1.0 - self.fade_easing.apply(t),
            FadeStep::RiseOut { distance, .. } => {
                let lift = lerp(0.0, distance, self.movement_easing.apply(t));
                self.transform.position = self.origin + Vec3::UP * lift;
                self.alpha = 1.0 - self.fade_easing.apply(t);
            }
        }
    }
}

impl Entity for UiFade {
    fn id(&self) -> EntityId {
        self.id
    }

    fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) -> Step {
        let mut budget = dt.max(0.0);
        loop {
            let (index, t, leftover, done) = match &mut self.phase {
                FadePhase::Step { index, tl } => {
                    let t = tl.advance(budget);
                    (*index, t, tl.overshoot(), tl.is_complete())
                }
                FadePhase::Terminal => return Step::Idle,
            };
            budget = leftover;
            if let Some(step) = self.steps.get(index).copied() {
                self.apply(step, if done { 1.0 } else { t });
            }
            if !done {
                break;
            }

            self.phase = self.enter(index + 1);
            if matches!(self.phase, FadePhase::Terminal) {
                self.alpha = 0.0;
                sink.destroy(self.id);
                debug!("[UiFade] {} finished", self.id);
                return Step::Completed;
            }
        }

        sink.set_transform(self.id, self.transform);
        sink.set_opacity(self.id, self.alpha);
        Step::Running
    }

    fn terminate(&mut self, sink: &mut dyn RenderSink) {
        if !self.is_terminal() {
            self.phase = FadePhase::Terminal;
            self.alpha = 0.0;
            sink.destroy(self.id);
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.phase, FadePhase::Terminal)
    }
}

/// Shared plumbing for a UI element that plays one `UiFade` at a time.
struct FadeSlot {
    fade: Option<UiFade>,
}

impl FadeSlot {
    fn is_animating(&self) -> bool {
        self.fade.as_ref().is_some_and(|f| !f.is_terminal())
    }

    fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) -> Step {
        match &mut self.fade {
            Some(fade) => fade.update(dt, sink),
            None => Step::Idle,
        }
    }

    fn clear(&mut self, sink: &mut dyn RenderSink) {
        if let Some(mut fade) = self.fade.take() {
            fade.terminate(sink);
        }
    }
}

pub struct PriceTag {
    config: PriceTagConfig,
    text: String,
    text_dirty: bool,
    slot: FadeSlot,
}

impl PriceTag {
    pub fn new(config: PriceTagConfig) -> Self {
        let text = config.price.clone();
        Self {
            config,
            text,
            text_dirty: false,
            slot: FadeSlot { fade: None },
        }
    }

    pub fn id() -> EntityId {
        EntityId::new(EntityKind::PriceTag, 0)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_price(&mut self, price: f32) {
        self.update_price(format!("¥{:.2}", price));
    }

    pub fn update_price(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.text_dirty = true;
        info!("[PriceTag] Price set to {}", self.text);
    }

    /// Numeric value of the current price text.
    pub fn price_amount(&self) -> f32 {
        parse_price(&self.text)
    }

    pub fn total_duration(&self) -> f32 {
        self.config.fade_in_duration + self.config.display_duration + self.config.fade_out_duration
    }

    pub fn is_animating(&self) -> bool {
        self.slot.is_animating()
    }

    pub fn play(&mut self, sink: &mut dyn RenderSink) -> bool {
        if self.is_animating() {
            warn!("[PriceTag] Already animating, play ignored");
            return false;
        }
        self.slot.clear(sink);

        let steps = vec![
            FadeStep::FadeIn(self.config.fade_in_duration),
            FadeStep::Hold(self.config.display_duration),
            FadeStep::RiseOut {
                duration: self.config.fade_out_duration,
                distance: self.config.move_up_distance,
            },
        ];
        let fade = UiFade::new(Self::id(), self.config.initial_position, steps, &self.text, sink)
            .with_easing(self.config.fade_easing, self.config.movement_easing);
        info!("[PriceTag] Showing {} for {:.2}s", self.text, fade.total_duration());
        self.slot.fade = Some(fade);
        self.text_dirty = false;
        true
    }

    pub fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) -> Step {
        if self.text_dirty && self.is_animating() {
            sink.set_text(Self::id(), &self.text);
            self.text_dirty = false;
        }
        self.slot.update(dt, sink)
    }

    /// Hides the tag and rewinds its animation. The price text is kept.
    pub fn reset(&mut self, sink: &mut dyn RenderSink) {
        self.slot.clear(sink);
        self.text_dirty = false;
    }
}

pub struct TaxText {
    config: TaxTextConfig,
    slot: FadeSlot,
}

impl TaxText {
    pub fn new(config: TaxTextConfig) -> Self {
        Self {
            config,
            slot: FadeSlot { fade: None },
        }
    }

    pub fn id() -> EntityId {
        EntityId::new(EntityKind::TaxText, 0)
    }

    /// Fills the template with whole numbers, halves rounding away from zero.
    pub fn format(&self, amount: f32) -> String {
        let meters = amount * self.config.meters_per_unit;
        self.config
            .template
            .replace("{amount}", &format!("{}", amount.round()))
            .replace("{meters}", &format!("{}", meters.round()))
    }

    pub fn total_duration(&self) -> f32 {
        self.config.display_delay
            + self.config.fade_in_duration
            + self.config.display_duration
            + self.config.fade_out_duration
    }

    pub fn is_animating(&self) -> bool {
        self.slot.is_animating()
    }

    pub fn show(&mut self, amount: f32, sink: &mut dyn RenderSink) -> bool {
        if self.is_animating() {
            warn!("[TaxText] Already showing, request ignored");
            return false;
        }
        self.slot.clear(sink);

        let text = self.format(amount);
        let steps = vec![
            FadeStep::Delay(self.config.display_delay),
            FadeStep::FadeIn(self.config.fade_in_duration),
            FadeStep::Hold(self.config.display_duration),
            FadeStep::FadeOut(self.config.fade_out_duration),
        ];
        info!("[TaxText] Showing {:?}", text);
        self.slot.fade = Some(UiFade::new(Self::id(), Vec3::ZERO, steps, &text, sink));
        true
    }

    pub fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) -> Step {
        self.slot.update(dt, sink)
    }

    pub fn reset(&mut self, sink: &mut dyn RenderSink) {
        self.slot.clear(sink);
    }
}
