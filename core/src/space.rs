use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpace {
    pub width: f64,
    pub height: f64,
}

impl LayoutSpace {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.is_measured() {
            self.width / self.height
        } else {
            1.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemSize {
    pub width: f64,
    pub height: f64,
}

impl ItemSize {
    /// Effective pixel size of a photo: `base * scale` wide, fixed aspect tall.
    pub fn scaled(base_size: f64, scale: f64, aspect: f64) -> Self {
        let width = base_size * scale;
        Self {
            width,
            height: (width * aspect).round(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.width.min(self.height) * 0.5
    }

    pub fn center_of(&self, pos: (f64, f64)) -> (f64, f64) {
        (pos.0 + self.width * 0.5, pos.1 + self.height * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Allowed top-left range for an item. Collapses to `pad` on an axis the
    /// item does not fit in.
    pub fn for_item(space: LayoutSpace, size: ItemSize, padding: f64) -> Self {
        Self {
            min_x: padding,
            max_x: padding.max(space.width - size.width - padding),
            min_y: padding,
            max_y: padding.max(space.height - size.height - padding),
        }
    }

    pub fn clamp(&self, pos: (f64, f64)) -> (f64, f64) {
        (
            pos.0.max(self.min_x).min(self.max_x),
            pos.1.max(self.min_y).min(self.max_y),
        )
    }

    pub fn contains(&self, pos: (f64, f64)) -> bool {
        pos.0 >= self.min_x && pos.0 <= self.max_x && pos.1 >= self.min_y && pos.1 <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmeasured_space_has_unit_aspect() {
        assert!(!LayoutSpace::default().is_measured());
        assert_eq!(LayoutSpace::new(0.0, 800.0).aspect_ratio(), 1.0);
        assert_eq!(LayoutSpace::new(1200.0, 800.0).aspect_ratio(), 1.5);
    }

    #[test]
    fn scaled_size_keeps_photo_aspect() {
        let size = ItemSize::scaled(150.0, 1.0, 4.0 / 3.0);
        assert_eq!(size.width, 150.0);
        assert_eq!(size.height, 200.0);
        let half = ItemSize::scaled(150.0, 0.5, 4.0 / 3.0);
        assert_eq!(half.width, 75.0);
        assert_eq!(half.height, 100.0);
        assert_eq!(half.radius(), 37.5);
    }

    #[test]
    fn bounds_clamp_into_padded_space() {
        let space = LayoutSpace::new(1200.0, 800.0);
        let size = ItemSize::scaled(150.0, 1.0, 4.0 / 3.0);
        let bounds = Bounds::for_item(space, size, 16.0);
        assert_eq!(bounds.max_x, 1034.0);
        assert_eq!(bounds.max_y, 584.0);
        assert_eq!(bounds.clamp((-50.0, 900.0)), (16.0, 584.0));
        assert!(bounds.contains((16.0, 584.0)));
        assert!(!bounds.contains((15.0, 100.0)));
    }

    #[test]
    fn bounds_collapse_when_item_is_larger_than_space() {
        let space = LayoutSpace::new(100.0, 100.0);
        let size = ItemSize::scaled(200.0, 1.0, 4.0 / 3.0);
        let bounds = Bounds::for_item(space, size, 8.0);
        assert_eq!(bounds.clamp((300.0, -20.0)), (8.0, 8.0));
    }
}
