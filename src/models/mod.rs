use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub mod media;

pub use media::{image_url, trailer_embed_url, ImageSize, Video};

/// Kind of catalog entry, as tagged by mixed listings such as trending
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Person,
}

/// A movie or TV show as returned by catalog search and listing endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: u64,
    /// Movies carry `title`, TV shows carry `name`
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, alias = "first_air_date")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
}

impl Entry {
    /// Creates an entry with only the fields search results always carry
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            overview: None,
            media_type: None,
        }
    }

    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    pub fn with_release_date(mut self, release_date: impl Into<String>) -> Self {
        self.release_date = Some(release_date.into());
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    /// True when the entry has a usable poster reference
    pub fn has_poster(&self) -> bool {
        self.poster_path
            .as_deref()
            .is_some_and(|path| !path.trim().is_empty())
    }

    /// Year parsed from `release_date` (`YYYY-MM-DD`), if present and well formed
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .map(|date| date.year())
    }
}

/// Keeps entries that have a poster, preserving order
pub fn with_posters(entries: Vec<Entry>) -> Vec<Entry> {
    entries.into_iter().filter(Entry::has_poster).collect()
}

/// Full movie record from `/movie/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub runtime: Option<u32>,
}

impl MovieDetails {
    /// Rating formatted the way the detail page shows it, e.g. `8.4/10`
    pub fn rating_label(&self) -> String {
        format!("{:.1}/10", self.vote_average)
    }
}
