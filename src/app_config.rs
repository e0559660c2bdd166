use shashin_core::{resolve_photos, EngineConfig};
use web_sys::UrlSearchParams;

const COLLAGE_TOML: &str = include_str!("../collage.toml");
const PHOTOS_PARAM: &str = "photos";

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PageConfig {
    pub(crate) engine: EngineConfig,
    pub(crate) photos: Vec<String>,
    pub(crate) base: String,
}

pub(crate) fn load_page_config() -> PageConfig {
    let engine = load_engine_config();
    let photos = resolve_photos(load_photo_override());
    let base = web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .map(|path| base_from_pathname(&path))
        .unwrap_or_else(|| "/".to_string());
    gloo::console::log!(
        "config",
        format!("{} photos, base {}", photos.len(), base)
    );
    PageConfig {
        engine,
        photos,
        base,
    }
}

fn load_engine_config() -> EngineConfig {
    match EngineConfig::from_toml_str(COLLAGE_TOML) {
        Ok(config) => config,
        Err(err) => {
            gloo::console::log!("config", format!("using defaults: {err}"));
            EngineConfig::default()
        }
    }
}

fn load_photo_override() -> Option<Vec<String>> {
    let window = web_sys::window()?;
    let search = window.location().search().ok()?;
    parse_photo_query(&search)
}

fn parse_photo_query(search: &str) -> Option<Vec<String>> {
    let search = search.trim();
    if search.is_empty() {
        return None;
    }
    let params = UrlSearchParams::new_with_str(search).ok()?;
    let raw = params.get(PHOTOS_PARAM)?;
    split_photo_list(&raw)
}

/// Comma separated photo names; a blank value means "no override".
pub(crate) fn split_photo_list(raw: &str) -> Option<Vec<String>> {
    let photos: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();
    if photos.is_empty() {
        None
    } else {
        Some(photos)
    }
}

/// Directory part of the page path, so photos resolve next to the page.
pub(crate) fn base_from_pathname(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..=idx].to_string(),
        None => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_collage_config_is_valid() {
        let config = EngineConfig::from_toml_str(COLLAGE_TOML).expect("collage.toml parses");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn photo_list_splits_on_commas() {
        assert_eq!(
            split_photo_list("a.jpg, b.jpg,,c.jpg "),
            Some(vec!["a.jpg".to_string(), "b.jpg".to_string(), "c.jpg".to_string()])
        );
        assert_eq!(split_photo_list(" , "), None);
        assert_eq!(split_photo_list(""), None);
    }

    #[test]
    fn base_is_directory_of_page() {
        assert_eq!(base_from_pathname("/"), "/");
        assert_eq!(base_from_pathname("/index.html"), "/");
        assert_eq!(base_from_pathname("/greeting/index.html"), "/greeting/");
        assert_eq!(base_from_pathname("/greeting/"), "/greeting/");
        assert_eq!(base_from_pathname(""), "/");
    }
}
