use crate::{
    error::{AppError, AppResult},
    models::{MovieDetails, Video},
    services::providers::CatalogBrowse,
};

pub const MOVIE_FAILED_MESSAGE: &str = "Failed to load movie data. Please try again later.";

/// Everything the movie detail page renders
#[derive(Debug, Clone, PartialEq)]
pub struct MovieView {
    pub details: MovieDetails,
    /// YouTube trailers and teasers, in upstream order
    pub trailers: Vec<Video>,
}

impl MovieView {
    /// Fetches details and videos for a movie concurrently
    pub async fn load(catalog: &dyn CatalogBrowse, id: &str) -> AppResult<Self> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::InvalidInput("Movie ID is missing".to_string()));
        }

        let (details, videos) =
            tokio::try_join!(catalog.movie_details(id), catalog.movie_videos(id)).map_err(|e| {
                tracing::error!(error = %e, movie_id = %id, "Movie fetch failed");
                AppError::ExternalApi(MOVIE_FAILED_MESSAGE.to_string())
            })?;

        let trailers: Vec<Video> = videos.into_iter().filter(Video::is_trailer).collect();

        tracing::info!(movie_id = %id, trailers = trailers.len(), "Movie loaded");

        Ok(Self { details, trailers })
    }

    /// Trailer opened by the primary "Watch Trailer" action
    pub fn featured_trailer(&self) -> Option<&Video> {
        self.trailers.first()
    }
}

/// Cycles through third-party embed players for a movie
///
/// Each source is a URL prefix; the movie id is appended to build the
/// player URL.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCarousel {
    sources: Vec<String>,
    index: usize,
}

impl SourceCarousel {
    pub fn new(sources: Vec<String>) -> Self {
        Self { sources, index: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) {
        if !self.sources.is_empty() {
            self.index = (self.index + 1) % self.sources.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.sources.is_empty() {
            self.index = self
                .index
                .checked_sub(1)
                .unwrap_or(self.sources.len() - 1);
        }
    }

    /// Player URL of the current source for `movie_id`
    pub fn embed_url(&self, movie_id: &str) -> Option<String> {
        self.sources
            .get(self.index)
            .map(|prefix| format!("{}{}", prefix, movie_id))
    }

    /// e.g. "Source 2 of 9"
    pub fn label(&self) -> String {
        format!("Source {} of {}", self.index + 1, self.sources.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel() -> SourceCarousel {
        SourceCarousel::new(vec![
            "https://a.example/movie/".to_string(),
            "https://b.example/embed/".to_string(),
            "https://c.example/v2/".to_string(),
        ])
    }

    #[test]
    fn test_next_wraps() {
        let mut carousel = carousel();
        carousel.next();
        carousel.next();
        assert_eq!(carousel.label(), "Source 3 of 3");
        carousel.next();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_previous_wraps() {
        let mut carousel = carousel();
        carousel.previous();
        assert_eq!(carousel.index(), 2);
        assert_eq!(
            carousel.embed_url("27205").as_deref(),
            Some("https://c.example/v2/27205")
        );
    }

    #[test]
    fn test_empty_carousel() {
        let mut carousel = SourceCarousel::new(Vec::new());
        carousel.next();
        carousel.previous();
        assert!(carousel.is_empty());
        assert_eq!(carousel.embed_url("1"), None);
    }
}
