pub const PHOTO_DIR: &str = "photos";

pub const DEFAULT_PHOTOS: &[&str] = &[
    "9DWT7Ujat2ZWZA29BMwPW.1020.jpg",
    "09gl55piO8wtiaQFoia7m.1020.jpg",
    "AQNaXtRaOgb9nCC1vDmW9.1020.jpg",
    "D9gfhDJ3ddZ1NiKUO6brF.1020.jpg",
    "jopbokehXCNZ4lgzncPd1.1020.jpg",
    "oYXOwvboRKpkDNx7uL2ry.1020.jpg",
    "UIc4bas9W3ld2DZyl1Jx8.1020 (1).jpg",
    "y6rZUQGzeGt3Ax7SjzfLw.1020.jpg",
    "yGh1Z7GThsHIYEaPvJzM5.1020.jpg",
];

pub fn default_photos() -> Vec<String> {
    DEFAULT_PHOTOS.iter().map(|name| name.to_string()).collect()
}

/// The supplied collection, or the bundled one when none was given. An empty
/// supplied list stays empty.
pub fn resolve_photos(supplied: Option<Vec<String>>) -> Vec<String> {
    match supplied {
        Some(list) => list
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect(),
        None => default_photos(),
    }
}

pub fn is_absolute_src(name: &str) -> bool {
    let lower = name.trim_start().to_ascii_lowercase();
    lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("data:")
        || lower.starts_with('/')
}

/// Image URL for a photo name: absolute names pass through, bare names live
/// under `photos/` next to the page base.
pub fn photo_src(base: &str, name: &str) -> String {
    if is_absolute_src(name) {
        return name.to_string();
    }
    let base = base.trim_end_matches('/');
    let encoded = urlencoding::encode(name);
    format!("{base}/{PHOTO_DIR}/{encoded}")
}
