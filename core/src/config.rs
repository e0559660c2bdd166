use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const FRICTION_DEFAULT: f64 = 0.985;
pub const REPULSION_THRESHOLD_DEFAULT: f64 = 0.92;
pub const REPULSION_PUSH_DEFAULT: f64 = 0.6;
pub const REPULSION_DAMPING_DEFAULT: f64 = 0.9;
pub const BOUNCE_RESTITUTION_DEFAULT: f64 = 0.25;
pub const MIN_DISTANCE_DEFAULT: f64 = 0.0001;
pub const INITIAL_SPEED_DEFAULT: f64 = 40.0;
pub const JITTER_RATIO_DEFAULT: f64 = 0.04;
pub const SIZE_MIN_DEFAULT: f64 = 140.0;
pub const SIZE_RANGE_DEFAULT: f64 = 120.0;
pub const ANGLE_RANGE_DEFAULT: f64 = 12.0;
pub const PHOTO_ASPECT_DEFAULT: f64 = 4.0 / 3.0;
pub const PADDING_MIN_DEFAULT: f64 = 8.0;
pub const PADDING_BASE_DEFAULT: f64 = 16.0;
pub const ENTRY_DURATION_DEFAULT: f64 = 0.8;
pub const ENTRY_SCALE_FROM_DEFAULT: f64 = 0.95;
pub const HOVER_SCALE_DEFAULT: f64 = 1.06;
pub const DOUBLE_TAP_MS_DEFAULT: f64 = 300.0;
pub const CLICK_SLOP_PX_DEFAULT: f64 = 4.0;
pub const VELOCITY_WINDOW_MS_DEFAULT: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleBreakpoint {
    pub below_width: f64,
    pub scale: f64,
}

pub fn default_breakpoints() -> Vec<ScaleBreakpoint> {
    [(360.0, 0.5), (420.0, 0.6), (640.0, 0.7), (900.0, 0.85)]
        .into_iter()
        .map(|(below_width, scale)| ScaleBreakpoint { below_width, scale })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub friction: f64,
    pub repulsion_threshold: f64,
    pub repulsion_push: f64,
    pub repulsion_damping: f64,
    pub bounce_restitution: f64,
    pub min_distance: f64,
    pub initial_speed: f64,
    pub jitter_ratio: f64,
    pub size_min: f64,
    pub size_range: f64,
    pub angle_range: f64,
    pub photo_aspect: f64,
    pub padding_min: f64,
    pub padding_base: f64,
    pub entry_duration: f64,
    pub entry_scale_from: f64,
    pub hover_scale: f64,
    pub double_tap_ms: f64,
    pub click_slop_px: f64,
    pub velocity_window_ms: f64,
    pub full_scale: f64,
    pub breakpoints: Vec<ScaleBreakpoint>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            friction: FRICTION_DEFAULT,
            repulsion_threshold: REPULSION_THRESHOLD_DEFAULT,
            repulsion_push: REPULSION_PUSH_DEFAULT,
            repulsion_damping: REPULSION_DAMPING_DEFAULT,
            bounce_restitution: BOUNCE_RESTITUTION_DEFAULT,
            min_distance: MIN_DISTANCE_DEFAULT,
            initial_speed: INITIAL_SPEED_DEFAULT,
            jitter_ratio: JITTER_RATIO_DEFAULT,
            size_min: SIZE_MIN_DEFAULT,
            size_range: SIZE_RANGE_DEFAULT,
            angle_range: ANGLE_RANGE_DEFAULT,
            photo_aspect: PHOTO_ASPECT_DEFAULT,
            padding_min: PADDING_MIN_DEFAULT,
            padding_base: PADDING_BASE_DEFAULT,
            entry_duration: ENTRY_DURATION_DEFAULT,
            entry_scale_from: ENTRY_SCALE_FROM_DEFAULT,
            hover_scale: HOVER_SCALE_DEFAULT,
            double_tap_ms: DOUBLE_TAP_MS_DEFAULT,
            click_slop_px: CLICK_SLOP_PX_DEFAULT,
            velocity_window_ms: VELOCITY_WINDOW_MS_DEFAULT,
            full_scale: 1.0,
            breakpoints: default_breakpoints(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_interval("friction", self.friction)?;
        unit_interval("repulsion_damping", self.repulsion_damping)?;
        unit_interval("bounce_restitution", self.bounce_restitution)?;
        positive("repulsion_threshold", self.repulsion_threshold)?;
        non_negative("repulsion_push", self.repulsion_push)?;
        positive("min_distance", self.min_distance)?;
        non_negative("initial_speed", self.initial_speed)?;
        non_negative("jitter_ratio", self.jitter_ratio)?;
        if self.jitter_ratio > 0.5 {
            return Err(ConfigError::invalid("jitter_ratio", "must not exceed 0.5"));
        }
        positive("size_min", self.size_min)?;
        non_negative("size_range", self.size_range)?;
        non_negative("angle_range", self.angle_range)?;
        positive("photo_aspect", self.photo_aspect)?;
        non_negative("padding_min", self.padding_min)?;
        non_negative("padding_base", self.padding_base)?;
        positive("entry_duration", self.entry_duration)?;
        positive("entry_scale_from", self.entry_scale_from)?;
        positive("hover_scale", self.hover_scale)?;
        positive("double_tap_ms", self.double_tap_ms)?;
        non_negative("click_slop_px", self.click_slop_px)?;
        positive("velocity_window_ms", self.velocity_window_ms)?;
        positive("full_scale", self.full_scale)?;
        let mut last_width = f64::NEG_INFINITY;
        for breakpoint in &self.breakpoints {
            positive("breakpoints.scale", breakpoint.scale)?;
            if !breakpoint.below_width.is_finite() || breakpoint.below_width <= last_width {
                return Err(ConfigError::invalid(
                    "breakpoints",
                    "below_width must be finite and strictly increasing",
                ));
            }
            last_width = breakpoint.below_width;
        }
        Ok(())
    }

    /// Discrete display scale for a container width.
    pub fn scale_for_width(&self, width: f64) -> f64 {
        self.breakpoints
            .iter()
            .find(|breakpoint| width < breakpoint.below_width)
            .map(|breakpoint| breakpoint.scale)
            .unwrap_or(self.full_scale)
    }

    pub fn padding_for_scale(&self, scale: f64) -> f64 {
        self.padding_min.max(self.padding_base * scale)
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} is outside [0, 1]")))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must not be negative")))
    }
}
