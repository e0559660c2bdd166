use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::physics::Body;
use crate::seed::{item_angle, item_size, item_velocity};

#[derive(Clone, Debug, PartialEq)]
pub struct PhotoItem {
    pub name: String,
    pub base_size: f64,
    pub angle_deg: f64,
    /// `None` until the first valid layout measurement places the item.
    pub pos: Option<(f64, f64)>,
    pub vel: (f64, f64),
    pub entry_elapsed: f64,
    pub retired: bool,
}

impl PhotoItem {
    pub fn new(index: usize, name: impl Into<String>, config: &EngineConfig) -> Self {
        Self {
            name: name.into(),
            base_size: item_size(index, config.size_min, config.size_range),
            angle_deg: item_angle(index, config.angle_range),
            pos: None,
            vel: item_velocity(index, config.initial_speed),
            entry_elapsed: 0.0,
            retired: false,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.pos.is_some()
    }

    pub fn body(&self) -> Option<Body> {
        self.pos.map(|pos| Body { pos, vel: self.vel })
    }

    pub fn set_body(&mut self, body: Body) {
        self.pos = Some(body.pos);
        self.vel = body.vel;
    }

    pub fn entry_progress(&self, duration: f64) -> f64 {
        if duration <= 0.0 {
            return 1.0;
        }
        ease_out_cubic((self.entry_elapsed / duration).clamp(0.0, 1.0))
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// What the rendering layer paints for one item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub index: usize,
    pub name: String,
    pub placed: bool,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle_deg: f64,
    pub opacity: f64,
    pub scale: f64,
    pub hovered: bool,
    pub dragging: bool,
}
