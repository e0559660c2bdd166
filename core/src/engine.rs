use crate::action::CollageAction;
use crate::config::EngineConfig;
use crate::gesture::{GestureTracker, TapTracker};
use crate::grid::{initial_position, scatter_grid};
use crate::item::{ItemView, PhotoItem};
use crate::physics::{step_body, StepContext};
use crate::space::{Bounds, ItemSize, LayoutSpace};
use crate::table::SharedPositionTable;

#[derive(Clone, Debug)]
struct DragState {
    index: usize,
    gesture: Option<GestureTracker>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResizeOutcome {
    pub measured: bool,
    pub scale_changed: bool,
    pub placed: usize,
}

/// Floating photo layout engine.
///
/// Owns every item and the shared position table. Boundary policy is
/// clamp-with-bounce: after every frame, drag update and resize an item's
/// top-left corner lies in `[pad, W - w - pad] x [pad, H - h - pad]`, and an
/// item that hits an edge has its perpendicular velocity reflected and
/// attenuated by `bounce_restitution`.
#[derive(Clone, Debug)]
pub struct CollageEngine {
    config: EngineConfig,
    items: Vec<PhotoItem>,
    table: SharedPositionTable,
    space: LayoutSpace,
    scale: f64,
    padding: f64,
    drag: Option<DragState>,
    hovered: Option<usize>,
    lightbox: Option<usize>,
    taps: TapTracker,
}

impl CollageEngine {
    pub fn new<I, S>(photos: I, config: EngineConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<PhotoItem> = photos
            .into_iter()
            .enumerate()
            .map(|(index, name)| PhotoItem::new(index, name, &config))
            .collect();
        let table = SharedPositionTable::with_sizes(items.iter().map(|item| item.base_size));
        let scale = config.full_scale;
        let padding = config.padding_for_scale(scale);
        let taps = TapTracker::new(config.double_tap_ms);
        Self {
            config,
            items,
            table,
            space: LayoutSpace::default(),
            scale,
            padding,
            drag: None,
            hovered: None,
            lightbox: None,
            taps,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[PhotoItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&PhotoItem> {
        self.items.get(index)
    }

    pub fn table(&self) -> &SharedPositionTable {
        &self.table
    }

    pub fn space(&self) -> LayoutSpace {
        self.space
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn held(&self) -> Option<usize> {
        self.drag.as_ref().map(|drag| drag.index)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn item_size(&self, index: usize) -> Option<ItemSize> {
        let item = self.items.get(index)?;
        Some(ItemSize::scaled(item.base_size, self.scale, self.config.photo_aspect))
    }

    pub fn bounds_for(&self, index: usize) -> Option<Bounds> {
        let size = self.item_size(index)?;
        Some(Bounds::for_item(self.space, size, self.padding))
    }

    fn live_index(&self, index: usize) -> Option<usize> {
        self.items
            .get(index)
            .filter(|item| !item.retired)
            .map(|_| index)
    }

    /// Records a new container size. The first valid measurement places
    /// every item on the scatter grid; later ones rescale and re-clamp in
    /// place. Zero or non-finite sizes are ignored.
    pub fn resize(&mut self, width: f64, height: f64) -> ResizeOutcome {
        let space = LayoutSpace::new(width, height);
        if !space.is_measured() {
            return ResizeOutcome::default();
        }
        let scale = self.config.scale_for_width(width);
        let scale_changed = scale != self.scale;
        self.space = space;
        self.scale = scale;
        self.padding = self.config.padding_for_scale(scale);
        let placed = self.place_unplaced();
        self.reclamp_all();
        ResizeOutcome {
            measured: true,
            scale_changed,
            placed,
        }
    }

    fn place_unplaced(&mut self) -> usize {
        let Some(grid) = scatter_grid(self.items.len(), self.space.aspect_ratio()) else {
            return 0;
        };
        let mut placed = 0;
        for index in 0..self.items.len() {
            let item = &self.items[index];
            if item.retired || item.is_placed() {
                continue;
            }
            let size = ItemSize::scaled(item.base_size, self.scale, self.config.photo_aspect);
            let Some(pos) = initial_position(
                &grid,
                index,
                self.space,
                size,
                self.padding,
                self.config.jitter_ratio,
            ) else {
                continue;
            };
            self.items[index].pos = Some(pos);
            self.table.set_pos(index, pos);
            placed += 1;
        }
        placed
    }

    fn reclamp_all(&mut self) {
        for index in 0..self.items.len() {
            let Some(bounds) = self.bounds_for(index) else {
                continue;
            };
            let item = &mut self.items[index];
            if item.retired {
                continue;
            }
            let Some(pos) = item.pos else {
                continue;
            };
            let clamped = bounds.clamp(pos);
            item.pos = Some(clamped);
            self.table.set_pos(index, clamped);
        }
    }

    /// Advances every live, placed, not-held item by `dt` seconds in index
    /// order. Returns false when `dt` is not positive.
    pub fn step(&mut self, dt: f64) -> bool {
        if !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        let held = self.held();
        let ctx = StepContext {
            config: &self.config,
            space: self.space,
            scale: self.scale,
            padding: self.padding,
        };
        for index in 0..self.items.len() {
            let item = &mut self.items[index];
            if item.retired {
                continue;
            }
            let Some(mut body) = item.body() else {
                continue;
            };
            item.entry_elapsed += dt;
            if held == Some(index) {
                continue;
            }
            step_body(index, &mut body, item.base_size, &self.table, &ctx, dt);
            item.set_body(body);
            self.table.set_pos(index, body.pos);
        }
        true
    }

    /// Moves an item directly, clamped into its bounds.
    pub fn set_position(&mut self, index: usize, pos: (f64, f64)) -> Option<(f64, f64)> {
        let index = self.live_index(index)?;
        if !pos.0.is_finite() || !pos.1.is_finite() {
            return None;
        }
        let bounds = self.bounds_for(index)?;
        let clamped = bounds.clamp(pos);
        self.items[index].pos = Some(clamped);
        self.table.set_pos(index, clamped);
        Some(clamped)
    }

    /// Holds an item: the physics step skips it until `end_drag`.
    pub fn begin_drag(&mut self, index: usize) -> bool {
        self.start_drag(index, None)
    }

    fn start_drag(&mut self, index: usize, gesture: Option<GestureTracker>) -> bool {
        let Some(index) = self.live_index(index) else {
            return false;
        };
        if !self.items[index].is_placed() {
            return false;
        }
        if self.drag.is_some() {
            self.end_drag(None);
        }
        self.drag = Some(DragState { index, gesture });
        true
    }

    /// Applies one gesture event to the held item: `pos += delta` (clamped)
    /// and velocity replaced by the gesture velocity in px/s.
    pub fn drag_by(&mut self, delta: (f64, f64), velocity: (f64, f64)) -> Option<(f64, f64)> {
        let index = self.held()?;
        let pos = self.items[index].pos?;
        let target = (pos.0 + delta.0, pos.1 + delta.1);
        let next = self.set_position(index, target)?;
        if velocity.0.is_finite() && velocity.1.is_finite() {
            self.items[index].vel = velocity;
        }
        Some(next)
    }

    /// Releases the held item. With a release velocity the item is flung
    /// with it; without one it keeps the last gesture velocity.
    pub fn end_drag(&mut self, release_velocity: Option<(f64, f64)>) -> Option<usize> {
        let drag = self.drag.take()?;
        if let Some(vel) = release_velocity {
            if vel.0.is_finite() && vel.1.is_finite() {
                if let Some(item) = self.items.get_mut(drag.index) {
                    item.vel = vel;
                }
            }
        }
        Some(drag.index)
    }

    pub fn pointer_down(
        &mut self,
        index: usize,
        pointer_id: Option<i32>,
        x: f64,
        y: f64,
        t_ms: f64,
    ) -> bool {
        let gesture = GestureTracker::begin(
            pointer_id,
            x,
            y,
            t_ms,
            self.config.click_slop_px,
            self.config.velocity_window_ms,
        );
        self.start_drag(index, Some(gesture))
    }

    pub fn pointer_move(&mut self, pointer_id: Option<i32>, x: f64, y: f64, t_ms: f64) -> bool {
        let update = {
            let Some(drag) = self.drag.as_mut() else {
                return false;
            };
            let Some(gesture) = drag.gesture.as_mut() else {
                return false;
            };
            if !gesture.matches(pointer_id) {
                return false;
            }
            gesture.update(x, y, t_ms)
        };
        match update {
            Some(update) => self.drag_by(update.delta, update.velocity).is_some(),
            None => false,
        }
    }

    /// Ends a pointer gesture. A gesture that never left the click slop is
    /// an activation; two on the same item request the lightbox.
    pub fn pointer_up(&mut self, pointer_id: Option<i32>, t_ms: f64) -> bool {
        let Some(drag) = self.drag.as_ref() else {
            return false;
        };
        let Some(gesture) = drag.gesture.as_ref() else {
            return false;
        };
        if !gesture.matches(pointer_id) {
            return false;
        }
        let index = drag.index;
        if gesture.is_live() {
            let velocity = gesture.velocity_at(t_ms);
            self.end_drag(Some(velocity));
            true
        } else {
            self.end_drag(None);
            self.activate(index, t_ms)
        }
    }

    /// Single activation of an item; returns true when it completes a
    /// double activation and the lightbox was requested.
    pub fn activate(&mut self, index: usize, t_ms: f64) -> bool {
        if self.live_index(index).is_none() {
            return false;
        }
        if self.taps.register(index, t_ms) {
            self.request_lightbox(index)
        } else {
            false
        }
    }

    pub fn request_lightbox(&mut self, index: usize) -> bool {
        let Some(index) = self.live_index(index) else {
            return false;
        };
        self.lightbox = Some(index);
        true
    }

    pub fn lightbox(&self) -> Option<&str> {
        self.lightbox
            .and_then(|index| self.items.get(index))
            .map(|item| item.name.as_str())
    }

    pub fn lightbox_index(&self) -> Option<usize> {
        self.lightbox
    }

    pub fn clear_lightbox(&mut self) -> bool {
        self.lightbox.take().is_some()
    }

    pub fn set_hovered(&mut self, hovered: Option<usize>) -> bool {
        let hovered = hovered.and_then(|index| self.live_index(index));
        if self.hovered == hovered {
            return false;
        }
        self.hovered = hovered;
        true
    }

    /// Stops updating an item and drops it from the shared table. Indices of
    /// other items are unchanged.
    pub fn retire(&mut self, index: usize) -> bool {
        let Some(index) = self.live_index(index) else {
            return false;
        };
        self.items[index].retired = true;
        self.table.clear(index);
        if self.held() == Some(index) {
            self.drag = None;
        }
        if self.hovered == Some(index) {
            self.hovered = None;
        }
        if self.lightbox == Some(index) {
            self.lightbox = None;
        }
        true
    }

    pub fn view(&self, index: usize) -> Option<ItemView> {
        let item = self.items.get(index)?;
        if item.retired {
            return None;
        }
        let size = self.item_size(index)?;
        let hovered = self.hovered == Some(index);
        let dragging = self.held() == Some(index);
        let (placed, x, y, progress) = match item.pos {
            Some((x, y)) => (true, x, y, item.entry_progress(self.config.entry_duration)),
            None => (false, 0.0, 0.0, 0.0),
        };
        let from = self.config.entry_scale_from;
        let mut scale = from + (1.0 - from) * progress;
        if hovered {
            scale *= self.config.hover_scale;
        }
        Some(ItemView {
            index,
            name: item.name.clone(),
            placed,
            x,
            y,
            width: size.width,
            height: size.height,
            angle_deg: item.angle_deg,
            opacity: progress,
            scale,
            hovered,
            dragging,
        })
    }

    pub fn views(&self) -> Vec<ItemView> {
        (0..self.items.len())
            .filter_map(|index| self.view(index))
            .collect()
    }

    /// Single dispatch path for hosts. Returns whether anything visible may
    /// have changed.
    pub fn apply(&mut self, action: CollageAction) -> bool {
        match action {
            CollageAction::Resize { width, height } => self.resize(width, height).measured,
            CollageAction::Frame { dt } => self.step(dt),
            CollageAction::BeginDrag {
                index,
                pointer_id,
                x,
                y,
                t_ms,
            } => self.pointer_down(index, pointer_id, x, y, t_ms),
            CollageAction::DragMove {
                pointer_id,
                x,
                y,
                t_ms,
            } => self.pointer_move(pointer_id, x, y, t_ms),
            CollageAction::DragEnd { pointer_id, t_ms } => self.pointer_up(pointer_id, t_ms),
            CollageAction::SetHovered { hovered } => self.set_hovered(hovered),
            CollageAction::Activate { index, t_ms } => self.activate(index, t_ms),
            CollageAction::CloseLightbox => self.clear_lightbox(),
            CollageAction::Retire { index } => self.retire(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(count: usize) -> CollageEngine {
        let photos: Vec<String> = (0..count).map(|i| format!("photo-{i}.jpg")).collect();
        CollageEngine::new(photos, EngineConfig::default())
    }

    #[test]
    fn items_wait_for_a_valid_measurement() {
        let mut engine = engine(3);
        assert_eq!(engine.resize(0.0, 0.0), ResizeOutcome::default());
        assert!(engine.items().iter().all(|item| !item.is_placed()));
        assert!(engine.views().iter().all(|view| !view.placed && view.opacity == 0.0));
        assert!(engine.step(1.0 / 60.0));
        assert!(engine.items().iter().all(|item| !item.is_placed()));
        let outcome = engine.resize(1200.0, 800.0);
        assert!(outcome.measured);
        assert_eq!(outcome.placed, 3);
        assert_eq!(engine.table().neighbors(0).count(), 2);
    }

    #[test]
    fn placement_happens_once() {
        let mut engine = engine(4);
        engine.resize(1200.0, 800.0);
        let first: Vec<_> = engine.items().iter().map(|item| item.pos).collect();
        let outcome = engine.resize(1300.0, 900.0);
        assert_eq!(outcome.placed, 0);
        let second: Vec<_> = engine.items().iter().map(|item| item.pos).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn held_item_is_not_stepped() {
        let mut engine = engine(2);
        engine.resize(1200.0, 800.0);
        engine.set_position(0, (100.0, 100.0));
        assert!(engine.begin_drag(0));
        engine.drag_by((10.0, 0.0), (500.0, 0.0));
        for _ in 0..30 {
            engine.step(1.0 / 60.0);
        }
        assert_eq!(engine.item(0).and_then(|item| item.pos), Some((110.0, 100.0)));
        assert_eq!(engine.item(0).map(|item| item.vel), Some((500.0, 0.0)));
        assert_eq!(engine.end_drag(None), Some(0));
        engine.step(1.0 / 60.0);
        let pos = engine.item(0).and_then(|item| item.pos).expect("placed");
        assert!(pos.0 > 110.0);
    }

    #[test]
    fn tap_pairs_open_and_close_the_lightbox() {
        let mut engine = engine(3);
        engine.resize(1200.0, 800.0);
        assert!(engine.pointer_down(1, Some(7), 50.0, 50.0, 0.0));
        assert!(!engine.pointer_up(Some(7), 80.0));
        assert_eq!(engine.lightbox(), None);
        engine.pointer_down(1, Some(7), 51.0, 50.0, 150.0);
        assert!(engine.pointer_up(Some(7), 200.0));
        assert_eq!(engine.lightbox(), Some("photo-1.jpg"));
        assert_eq!(engine.lightbox_index(), Some(1));
        assert!(engine.apply(CollageAction::CloseLightbox));
        assert_eq!(engine.lightbox(), None);
        assert!(!engine.clear_lightbox());
    }

    #[test]
    fn pointer_drag_moves_item_and_flings_on_release() {
        let mut engine = engine(1);
        engine.resize(1200.0, 800.0);
        engine.set_position(0, (100.0, 100.0));
        engine.pointer_down(0, Some(1), 0.0, 0.0, 0.0);
        for step in 1..=4 {
            engine.pointer_move(Some(1), step as f64 * 20.0, 0.0, step as f64 * 16.0);
        }
        assert_eq!(engine.item(0).and_then(|item| item.pos), Some((180.0, 100.0)));
        assert!(engine.pointer_up(Some(1), 64.0));
        assert_eq!(engine.held(), None);
        let vel = engine.item(0).map(|item| item.vel).expect("item");
        assert!(vel.0 > 1000.0, "fling velocity {vel:?}");
    }

    #[test]
    fn foreign_pointer_cannot_move_held_item() {
        let mut engine = engine(1);
        engine.resize(1200.0, 800.0);
        engine.set_position(0, (100.0, 100.0));
        engine.pointer_down(0, Some(1), 0.0, 0.0, 0.0);
        assert!(!engine.pointer_move(Some(2), 100.0, 0.0, 16.0));
        assert_eq!(engine.item(0).and_then(|item| item.pos), Some((100.0, 100.0)));
    }

    #[test]
    fn retire_clears_slot_and_state() {
        let mut engine = engine(3);
        engine.resize(1200.0, 800.0);
        engine.begin_drag(2);
        engine.set_hovered(Some(2));
        engine.request_lightbox(2);
        assert!(engine.retire(2));
        assert_eq!(engine.held(), None);
        assert_eq!(engine.hovered(), None);
        assert_eq!(engine.lightbox(), None);
        assert!(engine.table().get(2).is_none());
        assert_eq!(engine.views().len(), 2);
        let before = engine.item(2).and_then(|item| item.pos);
        engine.step(1.0 / 60.0);
        assert_eq!(engine.item(2).and_then(|item| item.pos), before);
        assert!(!engine.retire(2));
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut engine = engine(2);
        engine.resize(1200.0, 800.0);
        assert!(!engine.begin_drag(9));
        assert!(!engine.set_hovered(Some(9)));
        assert!(!engine.request_lightbox(9));
        assert!(!engine.retire(9));
        assert_eq!(engine.drag_by((1.0, 1.0), (0.0, 0.0)), None);
    }

    #[test]
    fn hover_and_entry_shape_the_view() {
        let mut engine = engine(1);
        engine.resize(1200.0, 800.0);
        let fresh = engine.view(0).expect("view");
        assert_eq!(fresh.opacity, 0.0);
        assert_eq!(fresh.scale, 0.95);
        for _ in 0..60 {
            engine.step(1.0 / 60.0);
        }
        engine.set_hovered(Some(0));
        let settled = engine.view(0).expect("view");
        assert_eq!(settled.opacity, 1.0);
        assert!((settled.scale - 1.06).abs() < 1e-9);
        assert!(settled.hovered);
    }
}
