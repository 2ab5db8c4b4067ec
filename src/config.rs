use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::services::search::SearchSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Quiet period before a typed query triggers a suggestion lookup
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum number of suggestions shown in the dropdown
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Home slideshow rotation interval
    #[serde(default = "default_slide_interval_ms")]
    pub slide_interval_ms: u64,

    /// Embed player URL prefixes, comma separated. The movie id is appended.
    #[serde(default, deserialize_with = "comma_separated")]
    pub embed_sources: Vec<String>,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_slide_interval_ms() -> u64 {
    5000
}

fn comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Settings for the search coordinator and its debounce timer
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            suggestion_limit: self.suggestion_limit,
        }
    }

    pub fn slide_interval(&self) -> Duration {
        Duration::from_millis(self.slide_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config: Config = envy::from_iter(vars(&[("TMDB_API_KEY", "abc")])).unwrap();
        assert_eq!(config.tmdb_api_key, "abc");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_image_url, "https://image.tmdb.org/t/p");
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(config.slide_interval(), Duration::from_millis(5000));
        assert!(config.embed_sources.is_empty());
    }

    #[test]
    fn test_missing_api_key_fails() {
        let result = envy::from_iter::<_, Config>(vars(&[("DEBOUNCE_MS", "100")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_embed_sources_split() {
        let config: Config = envy::from_iter(vars(&[
            ("TMDB_API_KEY", "abc"),
            ("EMBED_SOURCES", "https://a.example/movie/, ,https://b.example/embed/"),
        ]))
        .unwrap();
        assert_eq!(
            config.embed_sources,
            vec!["https://a.example/movie/", "https://b.example/embed/"]
        );
    }

    #[test]
    fn test_search_settings() {
        let config: Config = envy::from_iter(vars(&[
            ("TMDB_API_KEY", "abc"),
            ("DEBOUNCE_MS", "150"),
            ("SUGGESTION_LIMIT", "3"),
        ]))
        .unwrap();
        let settings = config.search_settings();
        assert_eq!(settings.debounce, Duration::from_millis(150));
        assert_eq!(settings.suggestion_limit, 3);
    }
}
