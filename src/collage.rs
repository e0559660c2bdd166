use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use shashin_core::{photo_src, CollageAction, CollageEngine, EngineConfig, ItemView};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, HtmlImageElement, PointerEvent, ResizeObserver};
use yew::prelude::*;

const CARD_CLASS: &str = "photo-card";
const INDEX_ATTR: &str = "data-index";
const MAX_FRAME_DT_MS: f64 = 50.0;

struct ResizeHandle {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, ResizeObserver)>,
}

/// Browser host for one engine instance: owns the card nodes, the frame
/// loop, pointer listeners and the container observer.
pub(crate) struct CollageView {
    root: HtmlElement,
    engine: RefCell<CollageEngine>,
    cards: Vec<HtmlImageElement>,
    listeners: RefCell<Vec<EventListener>>,
    resize: RefCell<Option<ResizeHandle>>,
    frame: RefCell<Option<AnimationFrame>>,
    last_tick_ms: Cell<Option<f64>>,
    lightbox_seen: Cell<Option<usize>>,
    on_lightbox: Callback<Option<String>>,
    stopped: Cell<bool>,
}

impl CollageView {
    pub(crate) fn mount(
        root: HtmlElement,
        photos: &[String],
        config: EngineConfig,
        base: &str,
        on_lightbox: Callback<Option<String>>,
    ) -> Option<Rc<Self>> {
        let document = web_sys::window()?.document()?;
        let mut cards = Vec::with_capacity(photos.len());
        for (index, name) in photos.iter().enumerate() {
            let card = create_card(&document, index, &photo_src(base, name))?;
            let _ = root.append_child(&card);
            cards.push(card);
        }
        let engine = CollageEngine::new(photos.iter().cloned(), config);
        gloo::console::log!("collage", format!("engine built with {} photos", engine.len()));
        let view = Rc::new(Self {
            root,
            engine: RefCell::new(engine),
            cards,
            listeners: RefCell::new(Vec::new()),
            resize: RefCell::new(None),
            frame: RefCell::new(None),
            last_tick_ms: Cell::new(None),
            lightbox_seen: Cell::new(None),
            on_lightbox,
            stopped: Cell::new(false),
        });
        view.install_listeners();
        view.install_resize_observer();
        view.measure();
        view.schedule_frame();
        Some(view)
    }

    /// Tears the instance down. The frame loop and every listener hold an
    /// `Rc` back to the view, so this is what releases it.
    pub(crate) fn shutdown(&self) {
        if self.stopped.replace(true) {
            return;
        }
        self.frame.borrow_mut().take();
        self.listeners.borrow_mut().clear();
        if let Some(handle) = self.resize.borrow_mut().take() {
            handle.observer.disconnect();
        }
        {
            let mut engine = self.engine.borrow_mut();
            for index in 0..engine.len() {
                engine.apply(CollageAction::Retire { index });
            }
        }
        for card in &self.cards {
            card.remove();
        }
        gloo::console::log!("collage", "engine dropped");
    }

    /// Lightbox was dismissed by the page; forget the request.
    pub(crate) fn close_lightbox(&self) {
        if self.engine.borrow_mut().apply(CollageAction::CloseLightbox) {
            gloo::console::log!("lightbox", "closed");
        }
        self.lightbox_seen.set(None);
    }

    fn dispatch(&self, action: CollageAction) -> bool {
        if self.stopped.get() {
            return false;
        }
        self.engine.borrow_mut().apply(action)
    }

    fn measure(&self) {
        let rect = self.root.get_bounding_client_rect();
        let outcome = self.engine.borrow_mut().resize(rect.width(), rect.height());
        if !outcome.measured {
            return;
        }
        if outcome.placed > 0 {
            gloo::console::log!(
                "collage",
                format!(
                    "placed {} photos in {:.0}x{:.0}",
                    outcome.placed,
                    rect.width(),
                    rect.height()
                )
            );
        }
        if outcome.scale_changed {
            let scale = self.engine.borrow().scale();
            gloo::console::log!("collage", format!("scale -> {scale}"));
        }
        self.render();
    }

    fn schedule_frame(self: &Rc<Self>) {
        if self.stopped.get() {
            return;
        }
        let view = Rc::clone(self);
        let handle = request_animation_frame(move |timestamp| {
            view.on_frame(timestamp);
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn on_frame(self: &Rc<Self>, timestamp: f64) {
        self.frame.borrow_mut().take();
        if self.stopped.get() {
            return;
        }
        let dt_ms = match self.last_tick_ms.replace(Some(timestamp)) {
            Some(prev) => (timestamp - prev).max(0.0),
            None => 0.0,
        };
        self.dispatch(CollageAction::Frame {
            dt: dt_ms.min(MAX_FRAME_DT_MS) / 1000.0,
        });
        self.render();
        self.schedule_frame();
    }

    fn render(&self) {
        let engine = self.engine.borrow();
        for (index, card) in self.cards.iter().enumerate() {
            match engine.view(index) {
                Some(view) => apply_card_style(card, &view),
                None => {
                    let _ = card.style().set_property("display", "none");
                }
            }
        }
        let requested = engine.lightbox_index();
        let name = engine.lightbox().map(str::to_string);
        drop(engine);
        if self.lightbox_seen.replace(requested) != requested {
            if let Some(name) = name.as_deref() {
                gloo::console::log!("lightbox", format!("open {name}"));
            }
            self.on_lightbox.emit(name);
        }
    }

    fn install_resize_observer(self: &Rc<Self>) {
        let view = Rc::clone(self);
        let callback = Closure::<dyn FnMut(js_sys::Array, ResizeObserver)>::new(
            move |_entries: js_sys::Array, _observer: ResizeObserver| {
                view.measure();
            },
        );
        match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&self.root);
                *self.resize.borrow_mut() = Some(ResizeHandle {
                    observer,
                    _callback: callback,
                });
            }
            Err(_) => {
                gloo::console::log!("collage", "ResizeObserver unavailable, using window resize");
                let Some(window) = web_sys::window() else {
                    return;
                };
                let view = Rc::clone(self);
                let listener = EventListener::new(&window, "resize", move |_event| {
                    view.measure();
                });
                self.listeners.borrow_mut().push(listener);
            }
        }
    }

    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::new();
        let active = EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        };

        let view = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &self.root,
            "pointerdown",
            active,
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if event.pointer_type() == "mouse" && event.button() != 0 {
                    return;
                }
                let Some((card, index)) = card_from_event(event) else {
                    return;
                };
                let grabbed = view.dispatch(CollageAction::BeginDrag {
                    index,
                    pointer_id: Some(event.pointer_id()),
                    x: f64::from(event.client_x()),
                    y: f64::from(event.client_y()),
                    t_ms: event.time_stamp(),
                });
                if grabbed {
                    let _ = card.set_pointer_capture(event.pointer_id());
                    event.prevent_default();
                    view.render();
                }
            },
        ));

        let Some(window) = web_sys::window() else {
            *self.listeners.borrow_mut() = listeners;
            return;
        };

        let view = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &window,
            "pointermove",
            active,
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let moved = view.dispatch(CollageAction::DragMove {
                    pointer_id: Some(event.pointer_id()),
                    x: f64::from(event.client_x()),
                    y: f64::from(event.client_y()),
                    t_ms: event.time_stamp(),
                });
                if moved {
                    event.prevent_default();
                    view.render();
                }
            },
        ));

        for kind in ["pointerup", "pointercancel"] {
            let view = Rc::clone(self);
            listeners.push(EventListener::new(&window, kind, move |event: &Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if view.dispatch(CollageAction::DragEnd {
                    pointer_id: Some(event.pointer_id()),
                    t_ms: event.time_stamp(),
                }) {
                    view.render();
                }
            }));
        }

        let view = Rc::clone(self);
        listeners.push(EventListener::new(
            &self.root,
            "pointerover",
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if event.pointer_type() != "mouse" {
                    return;
                }
                let hovered = card_from_event(event).map(|(_, index)| index);
                if view.dispatch(CollageAction::SetHovered { hovered }) {
                    view.render();
                }
            },
        ));

        let view = Rc::clone(self);
        listeners.push(EventListener::new(
            &self.root,
            "pointerleave",
            move |_event: &Event| {
                if view.dispatch(CollageAction::SetHovered { hovered: None }) {
                    view.render();
                }
            },
        ));

        *self.listeners.borrow_mut() = listeners;
    }
}

fn create_card(document: &web_sys::Document, index: usize, src: &str) -> Option<HtmlImageElement> {
    let card = document
        .create_element("img")
        .ok()?
        .dyn_into::<HtmlImageElement>()
        .ok()?;
    card.set_class_name(CARD_CLASS);
    card.set_src(src);
    card.set_alt("");
    card.set_draggable(false);
    let _ = card.set_attribute(INDEX_ATTR, &index.to_string());
    let style = card.style();
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("left", "0");
    let _ = style.set_property("top", "0");
    let _ = style.set_property("visibility", "hidden");
    let _ = style.set_property("touch-action", "none");
    Some(card)
}

fn card_from_event(event: &PointerEvent) -> Option<(Element, usize)> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let card = target.closest(&format!(".{CARD_CLASS}")).ok()??;
    let index = card.get_attribute(INDEX_ATTR)?.parse().ok()?;
    Some((card, index))
}

fn apply_card_style(card: &HtmlImageElement, view: &ItemView) {
    let style = card.style();
    let _ = style.set_property("display", "block");
    if !view.placed {
        let _ = style.set_property("visibility", "hidden");
        return;
    }
    let _ = style.set_property("visibility", "visible");
    let _ = style.set_property("width", &format!("{:.1}px", view.width));
    let _ = style.set_property("height", &format!("{:.0}px", view.height));
    let _ = style.set_property("opacity", &format!("{:.3}", view.opacity));
    let _ = style.set_property("transform", &card_transform(view));
    let layer = if view.dragging {
        "3"
    } else if view.hovered {
        "2"
    } else {
        "1"
    };
    let _ = style.set_property("z-index", layer);
    let _ = style.set_property("cursor", if view.dragging { "grabbing" } else { "grab" });
}

pub(crate) fn card_transform(view: &ItemView) -> String {
    format!(
        "translate3d({:.2}px, {:.2}px, 0) rotate({:.2}deg) scale({:.4})",
        view.x, view.y, view.angle_deg, view.scale
    )
}

#[derive(Properties, PartialEq)]
pub(crate) struct FloatingPhotosProps {
    pub(crate) photos: Rc<Vec<String>>,
    pub(crate) config: Rc<EngineConfig>,
    pub(crate) base: AttrValue,
    pub(crate) lightbox_open: bool,
    pub(crate) on_lightbox: Callback<Option<String>>,
}

#[function_component(FloatingPhotos)]
pub(crate) fn floating_photos(props: &FloatingPhotosProps) -> Html {
    let root_ref = use_node_ref();
    let view = use_mut_ref(|| None::<Rc<CollageView>>);
    {
        let root_ref = root_ref.clone();
        let view = view.clone();
        let config = props.config.clone();
        let base = props.base.clone();
        let on_lightbox = props.on_lightbox.clone();
        use_effect_with(props.photos.clone(), move |photos| {
            if let Some(root) = root_ref.cast::<HtmlElement>() {
                *view.borrow_mut() =
                    CollageView::mount(root, photos, (*config).clone(), &base, on_lightbox);
            }
            move || {
                if let Some(view) = view.borrow_mut().take() {
                    view.shutdown();
                }
            }
        });
    }
    {
        let view = view.clone();
        use_effect_with(props.lightbox_open, move |open| {
            if !*open {
                if let Some(view) = view.borrow().as_ref() {
                    view.close_lightbox();
                }
            }
            || ()
        });
    }
    html! {
        <div class="photos-layer" ref={root_ref}></div>
    }
}
