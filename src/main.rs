mod app;
mod app_config;
mod collage;
mod lightbox;

use std::rc::Rc;

use app::{App, AppProps};

fn main() {
    let config = Rc::new(app_config::load_page_config());
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let props = AppProps { config };
    match document.get_element_by_id("app") {
        Some(root) => {
            yew::Renderer::<App>::with_root_and_props(root, props).render();
        }
        None => {
            yew::Renderer::<App>::with_props(props).render();
        }
    }
}
