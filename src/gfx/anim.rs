use serde::{Deserialize, Serialize};

// Elapsed time this close to the duration counts as finished, so a run of
// deltas that sums to the duration in real arithmetic always lands on 1.0.
const COMPLETE_EPSILON: f32 = 1e-5;

pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

pub fn smooth_step(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Monotonic mapping of `[0, 1]` onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    SmoothStep,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => ease_in_out(t),
            Easing::SmoothStep => smooth_step(t),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Timeline {
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl Timeline {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing: Easing::Linear,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Moves the timeline forward and returns the eased progress.
    /// Negative deltas are ignored so progress never goes backwards.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if dt > 0.0 {
            self.elapsed += dt;
        }
        self.eased_progress()
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 || self.elapsed + COMPLETE_EPSILON >= self.duration {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn eased_progress(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn remaining(&self) -> f32 {
        if self.is_complete() {
            0.0
        } else {
            self.duration - self.elapsed
        }
    }

    /// Time past the end of the timeline, used to carry leftover delta into
    /// the next phase.
    pub fn overshoot(&self) -> f32 {
        (self.elapsed - self.duration).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::SmoothStep,
    ];

    #[test]
    fn easings_pin_endpoints() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn easings_are_monotonic() {
        for easing in ALL {
            let mut last = 0.0;
            for i in 0..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v + 1e-6 >= last, "{easing:?} dipped at step {i}");
                last = v;
            }
        }
    }

    #[test]
    fn cumulative_delta_reaching_duration_completes() {
        let mut tl = Timeline::new(1.0).with_easing(Easing::EaseInOut);
        for _ in 0..10 {
            tl.advance(0.1);
        }
        assert_eq!(tl.eased_progress(), 1.0);
        assert!(tl.is_complete());
    }

    #[test]
    fn progress_never_decreases() {
        let mut tl = Timeline::new(2.0).with_easing(Easing::SmoothStep);
        let mut last = tl.eased_progress();
        for dt in [0.0, 0.3, 0.0, 0.7, -1.0, 0.5, 2.0, 0.1] {
            let p = tl.advance(dt);
            assert!(p >= last);
            assert!((0.0..=1.0).contains(&p));
            last = p;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn zero_duration_is_instant() {
        let tl = Timeline::new(0.0);
        assert!(tl.is_complete());
        assert_eq!(tl.remaining(), 0.0);
    }

    #[test]
    fn reset_rewinds() {
        let mut tl = Timeline::new(1.0);
        tl.advance(0.75);
        tl.reset();
        assert_eq!(tl.progress(), 0.0);
        assert_eq!(tl.remaining(), 1.0);
    }

    #[test]
    fn overshoot_reports_leftover() {
        let mut tl = Timeline::new(0.5);
        tl.advance(0.75);
        assert!((tl.overshoot() - 0.25).abs() < 1e-6);
    }
}
