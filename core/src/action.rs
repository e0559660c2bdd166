#[derive(Clone, Debug, PartialEq)]
pub enum CollageAction {
    Resize {
        width: f64,
        height: f64,
    },
    Frame {
        dt: f64,
    },
    BeginDrag {
        index: usize,
        pointer_id: Option<i32>,
        x: f64,
        y: f64,
        t_ms: f64,
    },
    DragMove {
        pointer_id: Option<i32>,
        x: f64,
        y: f64,
        t_ms: f64,
    },
    DragEnd {
        pointer_id: Option<i32>,
        t_ms: f64,
    },
    SetHovered {
        hovered: Option<usize>,
    },
    Activate {
        index: usize,
        t_ms: f64,
    },
    CloseLightbox,
    Retire {
        index: usize,
    },
}
