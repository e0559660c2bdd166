use shashin_core::{CollageAction, CollageEngine, EngineConfig};

const DT: f64 = 1.0 / 60.0;

fn build_engine(count: usize) -> CollageEngine {
    let photos: Vec<String> = (0..count).map(|i| format!("photo-{i}.jpg")).collect();
    CollageEngine::new(photos, EngineConfig::default())
}

fn assert_contained(engine: &CollageEngine, context: &str) {
    for (index, item) in engine.items().iter().enumerate() {
        if item.retired {
            continue;
        }
        let pos = item.pos.expect("placed");
        assert!(pos.0.is_finite() && pos.1.is_finite(), "{context}: item {index} is NaN");
        let bounds = engine.bounds_for(index).expect("bounds");
        assert!(
            bounds.contains(pos),
            "{context}: item {index} at {pos:?} outside {bounds:?}"
        );
    }
}

#[test]
fn nine_items_stay_contained_for_ten_seconds() {
    let mut engine = build_engine(9);
    engine.resize(1200.0, 800.0);
    assert_contained(&engine, "initial");
    for frame in 0..600 {
        assert!(engine.step(DT));
        assert_contained(&engine, &format!("frame {frame}"));
    }
}

#[test]
fn drag_moves_by_gesture_deltas_and_keeps_fling_velocity() {
    let mut engine = build_engine(1);
    engine.resize(1200.0, 800.0);
    assert_eq!(engine.set_position(0, (100.0, 100.0)), Some((100.0, 100.0)));
    assert!(engine.begin_drag(0));
    let mut last_velocity = (0.0, 0.0);
    for event in 0..5 {
        last_velocity = (2400.0 - event as f64 * 100.0, 0.0);
        engine.drag_by((40.0, 0.0), last_velocity);
        engine.step(DT);
    }
    let item = engine.item(0).expect("item");
    assert_eq!(item.pos, Some((300.0, 100.0)));
    assert_eq!(item.vel, last_velocity);
    engine.end_drag(None);
    assert_eq!(engine.item(0).map(|item| item.vel), Some(last_velocity));
}

#[test]
fn narrow_resize_rescales_and_reclamps_in_the_same_call() {
    let mut engine = build_engine(9);
    engine.resize(1200.0, 800.0);
    for _ in 0..120 {
        engine.step(DT);
    }
    let wide_sizes: Vec<_> = (0..9).map(|i| engine.item_size(i).expect("size")).collect();
    let outcome = engine.resize(300.0, 800.0);
    assert!(outcome.scale_changed);
    assert_eq!(engine.scale(), 0.5);
    assert_eq!(engine.padding(), 8.0);
    for (index, wide) in wide_sizes.iter().enumerate() {
        let narrow = engine.item_size(index).expect("size");
        assert_eq!(narrow.width, wide.width * 0.5);
        assert_eq!(narrow.height, (narrow.width * 4.0 / 3.0).round());
        let slot = engine.table().get(index).expect("slot");
        assert_eq!(slot.pos, engine.item(index).and_then(|item| item.pos));
    }
    assert_contained(&engine, "after resize");
}

#[test]
fn non_positive_frames_change_nothing() {
    let mut engine = build_engine(5);
    engine.resize(1200.0, 800.0);
    engine.step(DT);
    let before: Vec<_> = engine.items().to_vec();
    assert!(!engine.step(0.0));
    assert!(!engine.step(-0.5));
    assert_eq!(engine.items(), before.as_slice());
}

#[test]
fn held_item_ignores_concurrent_frames() {
    let mut engine = build_engine(6);
    engine.resize(1200.0, 800.0);
    engine.set_position(2, (500.0, 300.0));
    engine.begin_drag(2);
    let after_drag = engine.drag_by((-25.0, 10.0), (-300.0, 120.0));
    assert_eq!(after_drag, Some((475.0, 310.0)));
    for _ in 0..90 {
        engine.step(DT);
        assert_eq!(engine.item(2).and_then(|item| item.pos), after_drag);
    }
    assert_eq!(engine.held(), Some(2));
}

#[test]
fn drag_is_clamped_to_bounds() {
    let mut engine = build_engine(1);
    engine.resize(1200.0, 800.0);
    engine.set_position(0, (100.0, 100.0));
    engine.begin_drag(0);
    let pos = engine.drag_by((-500.0, 5000.0), (0.0, 0.0)).expect("pos");
    let bounds = engine.bounds_for(0).expect("bounds");
    assert_eq!(pos, (bounds.min_x, bounds.max_y));
}

#[test]
fn identical_inputs_replay_bit_for_bit() {
    let run = || {
        let mut engine = build_engine(9);
        engine.resize(1200.0, 800.0);
        for _ in 0..300 {
            engine.step(DT);
        }
        engine
            .items()
            .iter()
            .map(|item| {
                let (x, y) = item.pos.expect("placed");
                (x.to_bits(), y.to_bits(), item.base_size.to_bits(), item.angle_deg.to_bits())
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn overlapping_items_drift_apart() {
    let mut engine = build_engine(2);
    engine.resize(1200.0, 800.0);
    engine.set_position(0, (500.0, 300.0));
    engine.set_position(1, (510.0, 300.0));
    let gap = |engine: &CollageEngine| {
        let a = engine.item(0).and_then(|item| item.pos).expect("placed");
        let b = engine.item(1).and_then(|item| item.pos).expect("placed");
        (a.0 - b.0).hypot(a.1 - b.1)
    };
    let start = gap(&engine);
    for _ in 0..30 {
        engine.step(DT);
    }
    assert!(gap(&engine) > start + 50.0);
}

#[test]
fn empty_collection_is_inert() {
    let mut engine = CollageEngine::new(Vec::<String>::new(), EngineConfig::default());
    let outcome = engine.resize(1200.0, 800.0);
    assert_eq!(outcome.placed, 0);
    assert!(engine.step(DT));
    assert!(engine.views().is_empty());
    assert_eq!(engine.lightbox(), None);
}

#[test]
fn actions_drive_a_full_session() {
    let mut engine = build_engine(4);
    assert!(!engine.apply(CollageAction::Resize {
        width: 0.0,
        height: 0.0
    }));
    assert!(engine.apply(CollageAction::Resize {
        width: 800.0,
        height: 600.0
    }));
    assert_eq!(engine.scale(), 0.85);
    assert!(engine.apply(CollageAction::Frame { dt: DT }));
    assert!(engine.apply(CollageAction::SetHovered { hovered: Some(3) }));
    assert!(!engine.apply(CollageAction::Activate { index: 3, t_ms: 1000.0 }));
    assert!(engine.apply(CollageAction::Activate { index: 3, t_ms: 1200.0 }));
    assert_eq!(engine.lightbox(), Some("photo-3.jpg"));
    assert!(engine.apply(CollageAction::CloseLightbox));
    let start = engine.item(1).and_then(|item| item.pos).expect("placed");
    assert!(engine.apply(CollageAction::BeginDrag {
        index: 1,
        pointer_id: Some(5),
        x: 10.0,
        y: 10.0,
        t_ms: 2000.0,
    }));
    assert!(engine.apply(CollageAction::DragMove {
        pointer_id: Some(5),
        x: 20.0,
        y: 15.0,
        t_ms: 2016.0,
    }));
    assert!(engine.apply(CollageAction::DragEnd {
        pointer_id: Some(5),
        t_ms: 2020.0,
    }));
    let moved = engine.item(1).and_then(|item| item.pos).expect("placed");
    let bounds = engine.bounds_for(1).expect("bounds");
    assert_eq!(moved, bounds.clamp((start.0 + 10.0, start.1 + 5.0)));
    assert!(engine.apply(CollageAction::Retire { index: 0 }));
    assert_eq!(engine.views().len(), 3);
    assert_contained(&engine, "end of session");
}
