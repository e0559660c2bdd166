use std::rc::Rc;

use yew::prelude::*;

use crate::app_config::PageConfig;
use crate::collage::FloatingPhotos;
use crate::lightbox::PhotoLightbox;

const HEART_SYMBOLS: [&str; 5] = ["💖", "💛", "💙", "💜", "❤️"];
const HEART_COUNT: usize = 16;

#[derive(Properties, PartialEq)]
pub(crate) struct AppProps {
    pub(crate) config: Rc<PageConfig>,
}

#[function_component(App)]
pub(crate) fn app(props: &AppProps) -> Html {
    let lightbox = use_state(|| None::<AttrValue>);
    let photos = use_memo(props.config.clone(), |config| config.photos.clone());
    let engine_config = use_memo(props.config.clone(), |config| config.engine.clone());
    let base = AttrValue::from(props.config.base.clone());

    let on_lightbox = {
        let lightbox = lightbox.clone();
        Callback::from(move |name: Option<String>| {
            lightbox.set(name.map(AttrValue::from));
        })
    };
    let on_close = {
        let lightbox = lightbox.clone();
        Callback::from(move |_: ()| lightbox.set(None))
    };

    let hearts = (0..HEART_COUNT).map(|index| {
        let style = heart_style(index);
        html! {
            <span key={index} class="heart" style={style}>
                { HEART_SYMBOLS[index % HEART_SYMBOLS.len()] }
            </span>
        }
    });

    html! {
        <div class="page">
            <div class="content">
                <h1 class="title fade-up">
                    <span class="accent">{ "You're" }</span>
                    { " Cute " }
                    <span class="accent">{ "Phil" }</span>
                </h1>
                <p class="subtitle fade-in">{ "For an evil person with a crusty phone" }</p>
                <div class="hearts">{ for hearts }</div>
            </div>
            <section class="photos-section">
                <FloatingPhotos
                    photos={photos.clone()}
                    config={engine_config.clone()}
                    base={base.clone()}
                    lightbox_open={lightbox.is_some()}
                    on_lightbox={on_lightbox}
                />
            </section>
            <PhotoLightbox name={(*lightbox).clone()} base={base} on_close={on_close} />
        </div>
    }
}

/// Pulse timing per heart so neighbours drift out of phase.
fn heart_style(index: usize) -> String {
    let duration = 3.0 + (index % 5) as f64 * 0.3;
    let delay = (index % 8) as f64 * 0.2;
    format!("animation-duration: {duration:.1}s; animation-delay: {delay:.1}s;")
}
