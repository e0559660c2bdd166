use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use shashin_core::photo_src;
use wasm_bindgen::JsCast;
use web_sys::{Event, KeyboardEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct PhotoLightboxProps {
    pub(crate) name: Option<AttrValue>,
    pub(crate) base: AttrValue,
    pub(crate) on_close: Callback<()>,
}

/// Enlarged photo over a backdrop. Closes on backdrop click, the close
/// button or Escape; page scrolling is locked while open.
#[function_component(PhotoLightbox)]
pub(crate) fn photo_lightbox(props: &PhotoLightboxProps) -> Html {
    let is_open = props.name.is_some();
    {
        let on_close = props.on_close.clone();
        use_effect_with(is_open, move |is_open| {
            let mut guard = None;
            if *is_open {
                guard = Some(LightboxGuard::install(on_close));
            }
            move || drop(guard)
        });
    }

    let Some(name) = props.name.as_ref() else {
        return html! {};
    };
    let src = photo_src(&props.base, name);
    let on_backdrop = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let on_close_button = {
        let on_close = props.on_close.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            on_close.emit(());
        })
    };
    let on_photo = Callback::from(|event: MouseEvent| event.stop_propagation());
    html! {
        <div class="modal-backdrop" onclick={on_backdrop}>
            <button
                class="modal-close"
                type="button"
                aria-label="Close"
                onclick={on_close_button}
            >
                { "×" }
            </button>
            <img class="modal-photo" src={src} alt="" onclick={on_photo} />
        </div>
    }
}

/// Escape listener plus the body overflow lock; both are undone on drop.
struct LightboxGuard {
    _keydown: Option<EventListener>,
    previous_overflow: Option<String>,
}

impl LightboxGuard {
    fn install(on_close: Callback<()>) -> Self {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return Self {
                _keydown: None,
                previous_overflow: None,
            };
        };
        let keydown = EventListener::new_with_options(
            &document,
            "keydown",
            EventListenerOptions {
                phase: EventListenerPhase::Bubble,
                passive: false,
            },
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if event.key() == "Escape" {
                    event.prevent_default();
                    on_close.emit(());
                }
            },
        );
        let previous_overflow = document.body().map(|body| {
            let style = body.style();
            let previous = style.get_property_value("overflow").unwrap_or_default();
            let _ = style.set_property("overflow", "hidden");
            previous
        });
        Self {
            _keydown: Some(keydown),
            previous_overflow,
        }
    }
}

impl Drop for LightboxGuard {
    fn drop(&mut self) {
        let Some(previous) = self.previous_overflow.take() else {
            return;
        };
        let Some(body) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.body())
        else {
            return;
        };
        let style = body.style();
        if previous.is_empty() {
            let _ = style.remove_property("overflow");
        } else {
            let _ = style.set_property("overflow", &previous);
        }
    }
}
