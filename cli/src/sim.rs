use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use shashin_core::{CollageAction, CollageEngine, EngineConfig, ItemView};

#[derive(Clone, Debug)]
pub(crate) struct SimulationPlan {
    pub(crate) photos: Vec<String>,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) frames: u32,
    pub(crate) fps: f64,
    pub(crate) resize: Option<ResizeStep>,
    pub(crate) drags: u32,
    pub(crate) seed: u64,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ResizeStep {
    pub(crate) at_frame: u32,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct SimulationReport {
    pub(crate) frames: u32,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) scale: f64,
    pub(crate) contained: bool,
    pub(crate) escapes: u32,
    pub(crate) items: Vec<ItemView>,
}

/// Scripted drag performed by the bot: grab an item, pull it for a few
/// frames, let go.
#[derive(Clone, Copy, Debug)]
struct BotDrag {
    index: usize,
    start_frame: u32,
    frames: u32,
    step: (f64, f64),
}

fn plan_drags(plan: &SimulationPlan) -> Vec<BotDrag> {
    if plan.photos.is_empty() || plan.frames < 2 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(plan.seed);
    let mut drags: Vec<BotDrag> = (0..plan.drags)
        .map(|_| BotDrag {
            index: rng.random_range(0..plan.photos.len()),
            start_frame: rng.random_range(0..plan.frames),
            frames: rng.random_range(3..=20),
            step: (rng.random_range(-30.0..30.0), rng.random_range(-30.0..30.0)),
        })
        .collect();
    drags.sort_by_key(|drag| drag.start_frame);
    drags
}

pub(crate) fn run(plan: &SimulationPlan, config: EngineConfig) -> SimulationReport {
    let dt = 1.0 / plan.fps;
    let mut engine = CollageEngine::new(plan.photos.iter().cloned(), config);
    engine.apply(CollageAction::Resize {
        width: plan.width,
        height: plan.height,
    });
    let drags = plan_drags(plan);
    let mut next_drag = 0;
    let mut active: Option<(BotDrag, u32, (f64, f64))> = None;
    let mut escapes = 0;
    for frame in 0..plan.frames {
        let t_ms = frame as f64 * dt * 1000.0;
        if let Some(resize) = plan.resize {
            if resize.at_frame == frame {
                engine.apply(CollageAction::Resize {
                    width: resize.width,
                    height: resize.height,
                });
            }
        }
        if active.is_none() {
            if let Some(drag) = drags.get(next_drag).copied() {
                if drag.start_frame <= frame {
                    next_drag += 1;
                    let grabbed = engine.apply(CollageAction::BeginDrag {
                        index: drag.index,
                        pointer_id: Some(1),
                        x: 0.0,
                        y: 0.0,
                        t_ms,
                    });
                    if grabbed {
                        active = Some((drag, 0, (0.0, 0.0)));
                    }
                }
            }
        }
        if let Some((drag, done, pointer)) = active.as_mut() {
            *done += 1;
            pointer.0 += drag.step.0;
            pointer.1 += drag.step.1;
            engine.apply(CollageAction::DragMove {
                pointer_id: Some(1),
                x: pointer.0,
                y: pointer.1,
                t_ms,
            });
            if *done >= drag.frames {
                engine.apply(CollageAction::DragEnd {
                    pointer_id: Some(1),
                    t_ms,
                });
                active = None;
            }
        }
        engine.apply(CollageAction::Frame { dt });
        escapes += count_escapes(&engine);
    }
    if active.is_some() {
        engine.end_drag(None);
    }
    let space = engine.space();
    SimulationReport {
        frames: plan.frames,
        width: space.width,
        height: space.height,
        scale: engine.scale(),
        contained: escapes == 0,
        escapes,
        items: engine.views(),
    }
}

fn count_escapes(engine: &CollageEngine) -> u32 {
    let mut escapes = 0;
    for (index, item) in engine.items().iter().enumerate() {
        let (Some(pos), Some(bounds)) = (item.pos, engine.bounds_for(index)) else {
            continue;
        };
        if item.retired {
            continue;
        }
        if !pos.0.is_finite() || !pos.1.is_finite() || !bounds.contains(pos) {
            escapes += 1;
        }
    }
    escapes
}
