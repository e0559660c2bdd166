use std::collections::VecDeque;

const MAX_SAMPLES: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    pub x: f64,
    pub y: f64,
    pub t_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureUpdate {
    pub delta: (f64, f64),
    /// Pixels per second.
    pub velocity: (f64, f64),
}

/// Turns raw pointer samples into per-event deltas and a fling velocity.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    pointer_id: Option<i32>,
    origin: (f64, f64),
    applied: (f64, f64),
    samples: VecDeque<GestureSample>,
    live: bool,
    slop: f64,
    window_ms: f64,
}

impl GestureTracker {
    pub fn begin(pointer_id: Option<i32>, x: f64, y: f64, t_ms: f64, slop: f64, window_ms: f64) -> Self {
        let mut samples = VecDeque::with_capacity(MAX_SAMPLES);
        samples.push_back(GestureSample { x, y, t_ms });
        Self {
            pointer_id,
            origin: (x, y),
            applied: (x, y),
            samples,
            live: false,
            slop,
            window_ms,
        }
    }

    pub fn pointer_id(&self) -> Option<i32> {
        self.pointer_id
    }

    pub fn matches(&self, pointer_id: Option<i32>) -> bool {
        self.pointer_id.is_none() || pointer_id.is_none() || self.pointer_id == pointer_id
    }

    /// True once the pointer left the click slop; a gesture that never goes
    /// live is a tap.
    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn update(&mut self, x: f64, y: f64, t_ms: f64) -> Option<GestureUpdate> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        self.push_sample(GestureSample { x, y, t_ms });
        if !self.live {
            let moved = (x - self.origin.0).hypot(y - self.origin.1);
            if moved < self.slop {
                return None;
            }
            self.live = true;
        }
        let delta = (x - self.applied.0, y - self.applied.1);
        self.applied = (x, y);
        Some(GestureUpdate {
            delta,
            velocity: self.velocity_at(t_ms),
        })
    }

    /// Average velocity over the samples no older than the window, measured
    /// back from `now_ms`. A pointer that rested longer than the window
    /// reports zero.
    pub fn velocity_at(&self, now_ms: f64) -> (f64, f64) {
        let Some(newest) = self.samples.back() else {
            return (0.0, 0.0);
        };
        if now_ms - newest.t_ms > self.window_ms {
            return (0.0, 0.0);
        }
        let oldest = self
            .samples
            .iter()
            .find(|sample| now_ms - sample.t_ms <= self.window_ms)
            .unwrap_or(newest);
        let dt_ms = newest.t_ms - oldest.t_ms;
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return (0.0, 0.0);
        }
        let scale = 1000.0 / dt_ms;
        ((newest.x - oldest.x) * scale, (newest.y - oldest.y) * scale)
    }

    fn push_sample(&mut self, sample: GestureSample) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }
}

/// Detects two activations of the same item inside a time window.
#[derive(Clone, Debug)]
pub struct TapTracker {
    last: Option<(usize, f64)>,
    window_ms: f64,
}

impl TapTracker {
    pub fn new(window_ms: f64) -> Self {
        Self {
            last: None,
            window_ms,
        }
    }

    /// Returns true on the second tap; the pair is consumed.
    pub fn register(&mut self, index: usize, t_ms: f64) -> bool {
        match self.last {
            Some((last_index, last_ms))
                if last_index == index && t_ms - last_ms >= 0.0 && t_ms - last_ms <= self.window_ms =>
            {
                self.last = None;
                true
            }
            _ => {
                self.last = Some((index, t_ms));
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
