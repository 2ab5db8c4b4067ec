use std::fmt::Display;

use serde::{Deserialize, Serialize};

const TRAILER_EMBED_URL: &str = "https://www.youtube-nocookie.com/embed";

/// Image CDN size buckets used by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    /// Suggestion dropdown thumbnails
    W92,
    /// Poster cards
    W500,
    /// Backdrops
    #[default]
    Original,
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSize::W92 => write!(f, "w92"),
            ImageSize::W500 => write!(f, "w500"),
            ImageSize::Original => write!(f, "original"),
        }
    }
}

/// Builds an image URL from the CDN base, a size bucket and a catalog path (`/abc.jpg`)
pub fn image_url(base: &str, path: &str, size: ImageSize) -> String {
    format!("{}/{}{}", base.trim_end_matches('/'), size, path)
}

/// Video attached to a movie, from `/movie/{id}/videos`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
    #[serde(default)]
    pub site: String,
}

impl Video {
    /// YouTube trailers and teasers with a playable key
    pub fn is_trailer(&self) -> bool {
        self.site == "YouTube"
            && matches!(self.video_type.as_str(), "Trailer" | "Teaser")
            && !self.key.is_empty()
    }

    pub fn embed_url(&self) -> String {
        trailer_embed_url(&self.key)
    }
}

/// Privacy-enhanced YouTube embed URL for a trailer key
pub fn trailer_embed_url(key: &str) -> String {
    format!("{}/{}?autoplay=1&rel=0", TRAILER_EMBED_URL, key)
}
