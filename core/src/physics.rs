use crate::config::EngineConfig;
use crate::space::{Bounds, ItemSize, LayoutSpace};
use crate::table::SharedPositionTable;

#[derive(Clone, Copy, Debug)]
pub struct StepContext<'a> {
    pub config: &'a EngineConfig,
    pub space: LayoutSpace,
    pub scale: f64,
    pub padding: f64,
}

impl StepContext<'_> {
    pub fn size_of(&self, base_size: f64) -> ItemSize {
        ItemSize::scaled(base_size, self.scale, self.config.photo_aspect)
    }

    pub fn bounds_for(&self, size: ItemSize) -> Bounds {
        Bounds::for_item(self.space, size, self.padding)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: (f64, f64),
    pub vel: (f64, f64),
}

/// Advances one item by `dt` seconds against the shared table and returns
/// whether anything changed. The caller commits `body.pos` to the table.
///
/// Friction is applied per call, not scaled by `dt`.
pub fn step_body(
    index: usize,
    body: &mut Body,
    base_size: f64,
    table: &SharedPositionTable,
    ctx: &StepContext<'_>,
    dt: f64,
) -> bool {
    if !dt.is_finite() || dt <= 0.0 {
        return false;
    }
    let config = ctx.config;
    let size = ctx.size_of(base_size);
    let mut vel = (body.vel.0 * config.friction, body.vel.1 * config.friction);
    if !vel.0.is_finite() || !vel.1.is_finite() {
        vel = (0.0, 0.0);
    }
    let next = (body.pos.0 + vel.0 * dt, body.pos.1 + vel.1 * dt);
    let next = repel(index, next, &mut vel, size, table, ctx);
    let bounds = ctx.bounds_for(size);
    let next = bounce_into(&bounds, next, &mut vel, config.bounce_restitution);
    if !next.0.is_finite() || !next.1.is_finite() {
        body.pos = bounds.clamp(body.pos);
        body.vel = (0.0, 0.0);
        return true;
    }
    body.pos = next;
    body.vel = vel;
    true
}

/// Soft single-pass separation from every placed neighbor. Only this item
/// moves; the neighbor gets the mirrored push when its own step runs.
pub fn repel(
    index: usize,
    pos: (f64, f64),
    vel: &mut (f64, f64),
    size: ItemSize,
    table: &SharedPositionTable,
    ctx: &StepContext<'_>,
) -> (f64, f64) {
    let config = ctx.config;
    let radius = size.radius();
    let (mut cx, mut cy) = size.center_of(pos);
    for (other_index, other_pos, other_base) in table.neighbors(index) {
        let other = ctx.size_of(other_base);
        let (ox, oy) = other.center_of(other_pos);
        let mut dx = cx - ox;
        let mut dy = cy - oy;
        let mut dist = dx.hypot(dy);
        if !dist.is_finite() || dist <= 0.0 {
            dist = config.min_distance;
            // coincident centers: split along x, lower index to the left
            dx = if index < other_index { -dist } else { dist };
            dy = 0.0;
        }
        let min_dist = (radius + other.radius()) * config.repulsion_threshold;
        if dist < min_dist {
            let push = (min_dist - dist) * config.repulsion_push;
            cx += dx / dist * push;
            cy += dy / dist * push;
            vel.0 *= config.repulsion_damping;
            vel.1 *= config.repulsion_damping;
        }
    }
    (cx - size.width * 0.5, cy - size.height * 0.5)
}

/// Clamp-with-bounce: on contact the perpendicular velocity is turned away
/// from the wall and attenuated.
pub fn bounce_into(
    bounds: &Bounds,
    pos: (f64, f64),
    vel: &mut (f64, f64),
    restitution: f64,
) -> (f64, f64) {
    let mut out = pos;
    if out.0 < bounds.min_x {
        out.0 = bounds.min_x;
        vel.0 = vel.0.abs() * restitution;
    } else if out.0 > bounds.max_x {
        out.0 = bounds.max_x;
        vel.0 = -vel.0.abs() * restitution;
    }
    if out.1 < bounds.min_y {
        out.1 = bounds.min_y;
        vel.1 = vel.1.abs() * restitution;
    } else if out.1 > bounds.max_y {
        out.1 = bounds.max_y;
        vel.1 = -vel.1.abs() * restitution;
    }
    out
}
